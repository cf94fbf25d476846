use crate::{
    auth::{AuthUtilities, RegistrarSession},
    data::{
        DataType, IdForm,
        student::{Category, Gender, Religion, Student, StudentForm},
    },
    error::{MissingStudentSnafu, RegistrarResult},
    flash::{FlashLevel, push_flash, take_flashes},
    maud_conveniences::{
        errors_list, form_submit_button, render_table, select_form_element, simple_form_element,
        title,
    },
    state::RegistrarState,
    validation::{SelectOption, ValidationErrors},
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

#[axum::debug_handler]
pub async fn get_students(
    State(state): State<RegistrarState>,
    auth_session: RegistrarSession,
    session: Session,
    uri: Uri,
) -> RegistrarResult<Response<Body>> {
    if !auth_session.logged_in() {
        push_flash(&session, FlashLevel::Error, "Not Authorized").await?;
        return Ok(Redirect::to("/login?to=/students").into_response());
    }

    let flashes = take_flashes(&session).await?;

    Ok(state.render(auth_session, uri.path(), &flashes, html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-6xl w-full flex flex-col space-y-4" {
            div class="container flex flex-row justify-center space-x-4" {
                div id="all_students" hx-get="/internal/get_students" hx-trigger="load" {}
                div id="in_focus" {}
            }
            button class="bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded" hx-get="/internal/students/new_student_form" hx-target="#in_focus" {
                "Add new Student"
            }
        }
    }).into_response())
}

async fn students_table(db: &Database) -> RegistrarResult<Markup> {
    let students = Student::get_all(db).await?;

    let rows = students
        .into_iter()
        .map(|student| {
            let id = student.id.map_or_else(String::new, |id| id.to_hex());
            [
                html! {
                    a class="text-blue-400 hover:underline cursor-pointer" hx-get="/internal/get_student" hx-target="#in_focus" hx-vals={"{\"id\": \"" (id) "\"}" } {
                        (student)
                    }
                },
                html! { (student.gender.as_str()) },
                html! { (student.category.as_str()) },
                html! { (student.email) },
                html! { (student.phone_number) },
            ]
        })
        .collect();

    Ok(render_table(
        "Students",
        ["Name", "Gender", "Category", "Email", "Phone"],
        rows,
    ))
}

pub async fn internal_get_students(
    State(state): State<RegistrarState>,
    auth_session: RegistrarSession,
) -> RegistrarResult<Markup> {
    auth_session.ensure_authenticated()?;

    students_table(state.db()).await
}

fn render_student_detail(student: &Student) -> Markup {
    let id = student.id.map_or_else(String::new, |id| id.to_hex());

    let labelled = |label: &'static str, value: &str| {
        html! {
            p class="text-gray-200 font-semibold" {
                (label)
                ": "
                span class="font-medium" {(value)}
            }
        }
    };

    html! {
        div class="container mx-auto" {
            (title(student.clone()))

            div class="rounded-lg shadow-md overflow-hidden bg-gray-800 max-w-md mx-auto" {
                div class="p-4" {
                    (labelled("Gender", student.gender.as_str()))
                    (labelled("Date of Birth", &student.date_of_birth))
                    (labelled("Date of Admission", &student.date_of_admission))
                    (labelled("Category", student.category.as_str()))
                    (labelled("Religion", student.religion.as_str()))
                    (labelled("Phone", &student.phone_number))
                    p {
                        a href={"mailto:" (student.email)} class="text-blue-500" {(student.email)}
                    }

                    div class="py-2" {
                        p class="text-gray-200 font-semibold" {"Address:"}
                        p class="font-medium" {(student.address.address_line_1)}
                        p class="font-medium" {
                            (student.address.city)
                            ", "
                            (student.address.state)
                            " "
                            (student.address.postal_code)
                        }
                        p class="font-medium" {(student.address.country)}
                    }

                    br;
                    div class="flex flex-row space-x-2" {
                        button class="bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded" hx-get="/internal/students/edit_student_form" hx-vals={"{\"id\": \"" (id) "\"}" } hx-target="#in_focus" {
                            "Edit student"
                        }
                        button class="bg-red-600 hover:bg-red-800 font-bold py-2 px-4 rounded" hx-delete="/students" hx-vals={"{\"id\": \"" (id) "\"}" } hx-target="#in_focus" {
                            "Delete student"
                        }
                    }
                }
            }
        }
    }
}

pub async fn internal_get_student_in_detail(
    State(state): State<RegistrarState>,
    auth_session: RegistrarSession,
    Query(id_form): Query<IdForm>,
) -> RegistrarResult<Markup> {
    auth_session.ensure_authenticated()?;

    let id = id_form.parse()?;
    let student = Student::get_from_db_by_id(id, state.db())
        .await?
        .ok_or_else(|| MissingStudentSnafu { id }.build())?;

    Ok(render_student_detail(&student))
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

fn student_form_fields(form: &StudentForm) -> Markup {
    html! {
        (simple_form_element("first_name", "First Name", true, None, non_empty(&form.first_name)))
        (simple_form_element("last_name", "Last Name", true, None, non_empty(&form.last_name)))
        (select_form_element::<Gender>("gender", "Gender", Gender::parse(&form.gender)))
        (simple_form_element("date_of_birth", "Date of Birth", true, None, non_empty(&form.date_of_birth)))
        (simple_form_element("date_of_admission", "Date of Admission", true, None, non_empty(&form.date_of_admission)))
        (select_form_element::<Category>("category", "Category", Category::parse(&form.category)))
        (select_form_element::<Religion>("religion", "Religion", Religion::parse(&form.religion)))
        (simple_form_element("email", "Email", true, Some("email"), non_empty(&form.email)))
        (simple_form_element("phone_number", "Phone Number", true, None, non_empty(&form.phone_number)))
        (simple_form_element("address", "Address Line 1", true, None, non_empty(&form.address)))
        (simple_form_element("city", "City", true, None, non_empty(&form.city)))
        (simple_form_element("state", "State", true, None, non_empty(&form.state)))
        (simple_form_element("postal_code", "Postal Code", true, None, non_empty(&form.postal_code)))
        (simple_form_element("country", "Country", true, None, non_empty(&form.country)))
    }
}

fn add_student_form(form: &StudentForm, errors: Option<&ValidationErrors>) -> Markup {
    html! {
        (title("Add New Student"))

        @if let Some(errors) = errors {
            (errors_list(Some("Please fix the following:"), errors.messages()))
        }

        form hx-put="/internal/students/new_student_form" hx-trigger="submit" hx-target="#in_focus" class="p-4" {
            (student_form_fields(form))
            (form_submit_button(Some("Add Student")))
        }
    }
}

pub async fn internal_get_add_student_form(
    auth_session: RegistrarSession,
) -> RegistrarResult<Markup> {
    auth_session.ensure_authenticated()?;

    Ok(add_student_form(&StudentForm::default(), None))
}

pub async fn internal_put_new_student(
    State(state): State<RegistrarState>,
    auth_session: RegistrarSession,
    Form(form): Form<StudentForm>,
) -> RegistrarResult<Markup> {
    auth_session.ensure_authenticated()?;

    // a failing validation is data for the form, not an error response
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => return Ok(add_student_form(&form, Some(&errors))),
    };

    let id = Student::insert_into_database(valid, state.db()).await?;
    let student = Student::get_from_db_by_id(id, state.db())
        .await?
        .ok_or_else(|| MissingStudentSnafu { id }.build())?;

    let all_students = students_table(state.db()).await?;
    Ok(html! {
        (render_student_detail(&student))
        div hx-swap-oob="outerHTML:#all_students" id="all_students" {
            (all_students)
        }
    })
}

fn edit_student_form(id: &str, form: &StudentForm, errors: Option<&ValidationErrors>) -> Markup {
    html! {
        (title("Edit Student"))

        @if let Some(errors) = errors {
            (errors_list(Some("Please fix the following:"), errors.messages()))
        }

        form hx-post={"/internal/students/edit_student_form?id=" (id)} hx-trigger="submit" hx-target="#in_focus" class="p-4" {
            (student_form_fields(form))
            (form_submit_button(Some("Save Student")))
        }
    }
}

pub async fn internal_get_edit_student_form(
    State(state): State<RegistrarState>,
    auth_session: RegistrarSession,
    Query(id_form): Query<IdForm>,
) -> RegistrarResult<Markup> {
    auth_session.ensure_authenticated()?;

    let id = id_form.parse()?;
    let student = Student::get_from_db_by_id(id, state.db())
        .await?
        .ok_or_else(|| MissingStudentSnafu { id }.build())?;

    Ok(edit_student_form(
        &id_form.id,
        &StudentForm::from(&student),
        None,
    ))
}

pub async fn internal_post_edit_student(
    State(state): State<RegistrarState>,
    auth_session: RegistrarSession,
    Query(id_form): Query<IdForm>,
    Form(form): Form<StudentForm>,
) -> RegistrarResult<Markup> {
    auth_session.ensure_authenticated()?;

    let id = id_form.parse()?;
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => return Ok(edit_student_form(&id_form.id, &form, Some(&errors))),
    };

    Student::update_in_database(id, valid, state.db()).await?;
    let student = Student::get_from_db_by_id(id, state.db())
        .await?
        .ok_or_else(|| MissingStudentSnafu { id }.build())?;

    let all_students = students_table(state.db()).await?;
    Ok(html! {
        (render_student_detail(&student))
        div hx-swap-oob="outerHTML:#all_students" id="all_students" {
            (all_students)
        }
    })
}

pub async fn delete_student(
    State(state): State<RegistrarState>,
    auth_session: RegistrarSession,
    Query(id_form): Query<IdForm>,
) -> RegistrarResult<Markup> {
    auth_session.ensure_authenticated()?;

    let id = id_form.parse()?;
    Student::remove_from_database(id, state.db()).await?;

    let all_students = students_table(state.db()).await?;
    Ok(html! {
        div hx-swap-oob="outerHTML:#all_students" id="all_students" {
            (all_students)
        }
    })
}
