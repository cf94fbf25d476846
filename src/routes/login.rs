use crate::{
    auth::{AuthUtilities, RegistrarSession, backend::RegistrarAuthCredentials},
    data::user::User,
    error::RegistrarResult,
    flash::{FlashLevel, push_flash, take_flashes},
    maud_conveniences::{form_submit_button, simple_form_element, title},
    state::RegistrarState,
};
use axum::{
    Form,
    body::Body,
    extract::{Query, State},
    http::{Response, Uri},
    response::{IntoResponse, Redirect},
};
use axum_login::tower_sessions::Session;
use maud::html;
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginOptions {
    pub to: Option<String>,
}

pub async fn get_login(
    State(state): State<RegistrarState>,
    auth_session: RegistrarSession,
    session: Session,
    uri: Uri,
    Query(LoginOptions { to }): Query<LoginOptions>,
) -> RegistrarResult<Response<Body>> {
    if !User::any_exist(state.db()).await? {
        return Ok(Redirect::to("/onboarding").into_response());
    }

    if auth_session.logged_in() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let flashes = take_flashes(&session).await?;

    Ok(state.render(auth_session, uri.path(), &flashes, html! {
        div class="bg-gray-800 shadow-md rounded px-8 pt-6 pb-8 mb-4 w-full max-w-sm" {
            (title("Login"))

            form method="post" {
                @if let Some(to) = to {
                    input type="hidden" name="next" value=(to) {}
                }
                (simple_form_element("email", "Email", true, Some("email"), None))
                (simple_form_element("password", "Password", true, Some("password"), None))
                (form_submit_button(Some("Login")))
            }
        }
    }).into_response())
}

#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    password: SecretString,
    next: Option<String>,
}

pub async fn post_login(
    mut auth_session: RegistrarSession,
    session: Session,
    Form(LoginForm {
        email,
        password,
        next,
    }): Form<LoginForm>,
) -> RegistrarResult<Redirect> {
    match auth_session
        .authenticate(RegistrarAuthCredentials::EmailPassword { email, password })
        .await
    {
        Err(e) => Err(e.into()),
        Ok(Some(user)) => match auth_session.login(&user).await {
            Ok(()) => {
                push_flash(&session, FlashLevel::Success, "You are now logged in").await?;
                Ok(Redirect::to(next.as_deref().unwrap_or("/dashboard")))
            }
            Err(e) => Err(e.into()),
        },
        Ok(None) => {
            // avoid giving extra details for security reasons :)
            push_flash(
                &session,
                FlashLevel::Error,
                "Email/Password not found or password incorrect",
            )
            .await?;

            let mut redirect = "/login".to_string();
            if let Some(next) = next {
                redirect += format!("?to={next}").as_str();
            }
            Ok(Redirect::to(redirect.as_ref()))
        }
    }
}

pub async fn post_logout(
    mut auth_session: RegistrarSession,
    session: Session,
) -> RegistrarResult<impl IntoResponse> {
    auth_session.logout().await?;
    push_flash(&session, FlashLevel::Success, "You are logged out").await?;
    Ok(Redirect::to("/"))
}
