use crate::{
    auth::{AuthUtilities, RegistrarSession},
    error::RegistrarResult,
    flash::take_flashes,
    state::RegistrarState,
};
use axum::{
    body::Body,
    extract::State,
    http::{Response, Uri},
    response::{IntoResponse, Redirect},
};
use axum_login::tower_sessions::Session;
use maud::html;

/// Landing page. Anyone already logged in is sent straight to the dashboard.
pub async fn get_index_route(
    State(state): State<RegistrarState>,
    auth_session: RegistrarSession,
    session: Session,
    uri: Uri,
) -> RegistrarResult<Response<Body>> {
    if auth_session.logged_in() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let flashes = take_flashes(&session).await?;

    Ok(state.render(auth_session, uri.path(), &flashes, html! {
        div class="bg-gray-800 p-8 rounded shadow-md max-w-md w-full" {
            h1 class="text-2xl font-semibold mb-6 text-center" {
                "Welcome"
            }
            p class="text-gray-300 mb-6 text-center" {
                "Students, roll numbers and records, in one place."
            }

            div class="flex flex-row space-x-4 justify-center" {
                a href="/login" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded" {
                    "Login"
                }
            }
        }
    }).into_response())
}
