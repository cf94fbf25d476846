use crate::{
    auth::{AuthUtilities, RegistrarSession},
    data::{
        DataType, IdForm,
        student_id::{AddStudentIdForm, StudentId},
    },
    error::{RegistrarError, RegistrarResult},
    flash::{FlashLevel, push_flash, take_flashes},
    maud_conveniences::{errors_list, form_submit_button, render_table, simple_form_element, title},
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
use maud::{Markup, html};
use mongodb::Database;

pub async fn get_roll_numbers(
    State(state): State<RegistrarState>,
    auth_session: RegistrarSession,
    session: Session,
    uri: Uri,
) -> RegistrarResult<Response<Body>> {
    if !auth_session.logged_in() {
        push_flash(&session, FlashLevel::Error, "Not Authorized").await?;
        return Ok(Redirect::to("/login?to=/roll_numbers").into_response());
    }

    let flashes = take_flashes(&session).await?;

    Ok(state.render(auth_session, uri.path(), &flashes, html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-4xl w-full flex flex-col space-y-4" {
            div class="container flex flex-row justify-center space-x-4" {
                div id="all_roll_numbers" hx-get="/internal/get_roll_numbers" hx-trigger="load" {}
                div id="in_focus" {}
            }
            button class="bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded" hx-get="/internal/roll_numbers/new_roll_number_form" hx-target="#in_focus" {
                "Add new Roll Number"
            }
        }
    }).into_response())
}

async fn roll_numbers_table(db: &Database) -> RegistrarResult<Markup> {
    let records = StudentId::get_all(db).await?;

    let rows = records
        .into_iter()
        .map(|record| {
            let id = record.id.map_or_else(String::new, |id| id.to_hex());
            [
                html! { (record.class_roll_no) },
                html! { (record.registration_no.as_deref().unwrap_or("-")) },
                html! {
                    button class="bg-red-600 hover:bg-red-800 font-bold py-1 px-3 rounded" hx-delete="/roll_numbers" hx-vals={"{\"id\": \"" (id) "\"}" } hx-target="#in_focus" {
                        "Delete"
                    }
                },
            ]
        })
        .collect();

    Ok(render_table(
        "Roll Numbers",
        ["Class Roll No", "Registration No", ""],
        rows,
    ))
}

pub async fn internal_get_roll_numbers(
    State(state): State<RegistrarState>,
    auth_session: RegistrarSession,
) -> RegistrarResult<Markup> {
    auth_session.ensure_authenticated()?;

    roll_numbers_table(state.db()).await
}

fn value(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

fn add_roll_number_form(form: &AddStudentIdForm, error: Option<&str>) -> Markup {
    html! {
        (title("Add New Roll Number"))

        @if let Some(error) = error {
            (errors_list(Some("Please fix the following:"), [error]))
        }

        form hx-put="/internal/roll_numbers/new_roll_number_form" hx-trigger="submit" hx-target="#in_focus" class="p-4" {
            (simple_form_element("class_roll_no", "Class Roll No", true, None, value(&form.class_roll_no)))
            (simple_form_element("registration_no", "Registration No (optional)", false, None, value(&form.registration_no)))
            (form_submit_button(Some("Add Roll Number")))
        }
    }
}

pub async fn internal_get_add_roll_number_form(
    auth_session: RegistrarSession,
) -> RegistrarResult<Markup> {
    auth_session.ensure_authenticated()?;

    Ok(add_roll_number_form(&AddStudentIdForm::default(), None))
}

pub async fn internal_put_new_roll_number(
    State(state): State<RegistrarState>,
    auth_session: RegistrarSession,
    Form(form): Form<AddStudentIdForm>,
) -> RegistrarResult<Markup> {
    auth_session.ensure_authenticated()?;

    match StudentId::insert_into_database(form.clone(), state.db()).await {
        Ok(_id) => {
            let all_roll_numbers = roll_numbers_table(state.db()).await?;
            Ok(html! {
                (add_roll_number_form(&AddStudentIdForm::default(), None))
                div hx-swap-oob="outerHTML:#all_roll_numbers" id="all_roll_numbers" {
                    (all_roll_numbers)
                }
            })
        }
        // the save gate rejecting a short roll is form feedback, not a failure
        Err(error @ RegistrarError::InvalidClassRollNo { .. }) => {
            Ok(add_roll_number_form(&form, Some(&error.to_string())))
        }
        Err(error) => Err(error),
    }
}

pub async fn delete_roll_number(
    State(state): State<RegistrarState>,
    auth_session: RegistrarSession,
    Query(id_form): Query<IdForm>,
) -> RegistrarResult<Markup> {
    auth_session.ensure_authenticated()?;

    let id = id_form.parse()?;
    StudentId::remove_from_database(id, state.db()).await?;

    let all_roll_numbers = roll_numbers_table(state.db()).await?;
    Ok(html! {
        div hx-swap-oob="outerHTML:#all_roll_numbers" id="all_roll_numbers" {
            (all_roll_numbers)
        }
    })
}
