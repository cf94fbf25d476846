use crate::auth::backend::RegistrarAuthBackend;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_login::tower_sessions::cookie::time::error::ComponentRange;
use maud::html;
use mongodb::bson::oid::ObjectId;
use snafu::Snafu;
use std::num::ParseIntError;

pub type RegistrarResult<T> = Result<T, RegistrarError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RegistrarError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: mongodb::error::Error },
    #[snafu(display("Error making database query"))]
    MakeQuery { source: mongodb::error::Error },
    #[snafu(display("Database did not return an ObjectId for an inserted document"))]
    InvalidInsertedId,
    #[snafu(display("Error serialising with rmp_serde"))]
    RmpSerdeEncode { source: rmp_serde::encode::Error },
    #[snafu(display("Error deserialising with rmp_serde"))]
    RmpSerdeDecode { source: rmp_serde::decode::Error },
    #[snafu(display("Unable to parse IP port"))]
    ParsePort { source: ParseIntError },
    #[snafu(display("Unable to parse ObjectId {:?}", original))]
    ParseObjectId {
        source: mongodb::bson::oid::Error,
        original: String,
    },
    #[snafu(display("Stored session expiry out of range"))]
    InvalidExpiry { source: ComponentRange },
    #[snafu(display("Unable to find student with id: {}", id))]
    MissingStudent { id: ObjectId },
    #[snafu(display("Roll must be greater than 3"))]
    InvalidClassRollNo { length: usize },
    #[snafu(display("Error with hashing/password verification"))]
    Bcrypt { source: bcrypt::BcryptError },
    #[snafu(display("Error with sessions"))]
    TowerSession {
        source: axum_login::tower_sessions::session::Error,
    },
    #[snafu(display("Error parsing email address"))]
    Email { source: email_address::Error },
    #[snafu(display("Tried to access a protected page without being logged in"))]
    NotAuthenticated,
}

impl From<axum_login::Error<RegistrarAuthBackend>> for RegistrarError {
    fn from(value: axum_login::Error<RegistrarAuthBackend>) -> Self {
        match value {
            axum_login::Error::Session(source) => Self::TowerSession { source },
            axum_login::Error::Backend(backend) => backend,
        }
    }
}

impl IntoResponse for RegistrarError {
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const NA: StatusCode = StatusCode::UNAUTHORIZED; //not authenticated
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        let basic_error = |desc| {
            html! {
                div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
                    strong class="font-bold" {"Registrar Error"}
                    span {(desc)}
                }
            }
        };

        let status_code = match &self {
            Self::OpenDatabase { .. } | Self::MakeQuery { .. } => ISE,
            Self::InvalidInsertedId => ISE,
            Self::RmpSerdeEncode { .. } => ISE,
            Self::RmpSerdeDecode { .. } => BI,
            Self::ParsePort { .. } => ISE,
            Self::ParseObjectId { .. } => BI,
            Self::InvalidExpiry { .. } => ISE,
            Self::MissingStudent { .. } => NF,
            Self::InvalidClassRollNo { .. } => BI,
            Self::Bcrypt { .. } => ISE,
            Self::TowerSession { .. } => ISE,
            Self::Email { .. } => ISE,
            Self::NotAuthenticated => NA,
        };

        error!(?self, "Error!");
        (status_code, Html(basic_error(self.to_string()))).into_response()
    }
}
