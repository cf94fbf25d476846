use crate::{
    auth::{AuthUtilities, RegistrarSession},
    error::RegistrarResult,
    flash::{FlashLevel, push_flash, take_flashes},
    data::{student::Student, student_id::StudentId},
    maud_conveniences::title,
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

pub async fn get_dashboard(
    State(state): State<RegistrarState>,
    auth_session: RegistrarSession,
    session: Session,
    uri: Uri,
) -> RegistrarResult<Response<Body>> {
    if !auth_session.logged_in() {
        push_flash(&session, FlashLevel::Error, "Not Authorized").await?;
        return Ok(Redirect::to("/login?to=/dashboard").into_response());
    }

    let students = Student::count(state.db()).await?;
    let roll_numbers = StudentId::count(state.db()).await?;
    let flashes = take_flashes(&session).await?;

    Ok(state.render(auth_session, uri.path(), &flashes, html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-2xl w-full" {
            (title("Dashboard"))

            div class="grid grid-cols-1 sm:grid-cols-2 gap-4" {
                a href="/students" class="block rounded-lg shadow-md p-6 text-center bg-gray-700 hover:bg-gray-600" {
                    p class="text-3xl font-bold" {(students)}
                    p class="text-gray-300" {"Students"}
                }
                a href="/roll_numbers" class="block rounded-lg shadow-md p-6 text-center bg-gray-700 hover:bg-gray-600" {
                    p class="text-3xl font-bold" {(roll_numbers)}
                    p class="text-gray-300" {"Roll Numbers"}
                }
            }
        }
    }).into_response())
}
