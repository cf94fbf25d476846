use crate::{
    auth::RegistrarSession, error::RegistrarResult, flash::take_flashes,
    maud_conveniences::title, state::RegistrarState,
};
use axum::{extract::State, http::Uri};
use axum_login::tower_sessions::Session;
use maud::{Markup, html};

/// An ordinary page, not an error handler — it only renders when a user
/// navigates here.
pub async fn get_errors_page(
    State(state): State<RegistrarState>,
    auth_session: RegistrarSession,
    session: Session,
    uri: Uri,
) -> RegistrarResult<Markup> {
    let flashes = take_flashes(&session).await?;

    Ok(state.render(auth_session, uri.path(), &flashes, html! {
        div class="bg-gray-800 p-8 rounded shadow-md max-w-md w-full text-center" {
            (title("404 - Page Not Found."))
            a href="/" class="text-blue-400 underline" {"Back to the home page"}
        }
    }))
}
