use crate::{
    auth::RegistrarSession,
    config::RuntimeConfiguration,
    error::{MakeQuerySnafu, OpenDatabaseSnafu, RegistrarResult},
    flash::FlashMessage,
    maud_conveniences::{flash_banners, render_breadcrumbs, render_nav},
};
use maud::{DOCTYPE, Markup, html};
use mongodb::{Client, Database, bson::doc};
use snafu::ResultExt;

#[derive(Clone, Debug)]
pub struct RegistrarState {
    client: Client,
    db: Database,
    config: RuntimeConfiguration,
}

impl RegistrarState {
    pub async fn new(config: RuntimeConfiguration) -> RegistrarResult<Self> {
        let client = Client::with_uri_str(config.db_config().url())
            .await
            .context(OpenDatabaseSnafu)?;
        let db = client.database(config.db_config().database_name());

        Ok(Self { client, db, config })
    }

    /// Initial connectivity probe. The driver connects lazily, so a failure
    /// here means later operations will fail too — the caller logs it and
    /// the app keeps serving regardless.
    pub async fn ping(&self) -> RegistrarResult<()> {
        self.db
            .run_command(doc! {"ping": 1})
            .await
            .context(MakeQuerySnafu)?;
        Ok(())
    }

    pub const fn db(&self) -> &Database {
        &self.db
    }

    pub const fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    #[allow(clippy::unused_self, clippy::needless_pass_by_value)] //in case self is ever needed :), and to allow direct html! usage
    pub fn render(
        &self,
        session: RegistrarSession,
        path: &str,
        flashes: &[FlashMessage],
        markup: Markup,
    ) -> Markup {
        let nav = render_nav(session.user);
        let breadcrumbs = render_breadcrumbs(path);

        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    link rel="stylesheet" href="/public/styles.css" {}
                    title { "Student Management" }
                }
                body class="bg-gray-900 min-h-screen flex flex-col items-center text-white" {
                    (nav)
                    div class="w-full max-w-5xl px-4" {
                        (breadcrumbs)
                        (flash_banners(flashes))
                    }
                    div class="flex-1 w-full flex flex-col items-center justify-center" {
                        (markup)
                    }
                }
            }
        }
    }

    pub async fn sensible_shutdown(&self) -> RegistrarResult<()> {
        self.client.clone().shutdown().await;
        Ok(())
    }
}
