#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else)]

use crate::{
    auth::{backend::RegistrarAuthBackend, mongo_store::MongoSessionStore},
    config::RuntimeConfiguration,
    routes::{
        dashboard::get_dashboard,
        errors::get_errors_page,
        index::get_index_route,
        login::{get_login, post_login, post_logout},
        onboarding::{get_onboarding, post_onboarding},
        roll_numbers::{
            delete_roll_number, get_roll_numbers, internal_get_add_roll_number_form,
            internal_get_roll_numbers, internal_put_new_roll_number,
        },
        students::{
            delete_student, get_students, internal_get_add_student_form,
            internal_get_edit_student_form, internal_get_student_in_detail, internal_get_students,
            internal_post_edit_student, internal_put_new_student,
        },
    },
    state::RegistrarState,
};
use axum::{
    Router,
    routing::{get, post},
};
use axum_login::{
    AuthManagerLayerBuilder,
    tower_sessions::{Expiry, SessionManagerLayer, cookie::time::Duration},
};
use tokio::{net::TcpListener, signal};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

mod auth;
mod config;
mod data;
mod error;
mod flash;
mod maud_conveniences;
mod routes;
mod state;
mod validation;

async fn shutdown_signal(state: RegistrarState) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    if let Err(e) = state.sensible_shutdown().await {
        error!(?e, "Error sensibly shutting down");
    }
    warn!("signal received, starting graceful shutdown");
}

#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() {
    dotenvy::dotenv().ok();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");

    let config = RuntimeConfiguration::new().expect("unable to create config");
    let state = RegistrarState::new(config)
        .await
        .expect("unable to create state");

    // the driver connects lazily, so a dead database is logged rather than
    // fatal and data operations fail individually until it comes back
    match state.ping().await {
        Ok(()) => info!("Connected to MongoDB Server..."),
        Err(e) => error!(?e, "Error occurred connecting to MongoDB..."),
    }

    let session_store = MongoSessionStore::new(state.clone());
    let session_layer = SessionManagerLayer::new(session_store)
        .with_expiry(Expiry::OnInactivity(Duration::days(5)));
    let auth_backend = RegistrarAuthBackend::new(state.clone());
    let auth_layer = AuthManagerLayerBuilder::new(auth_backend, session_layer).build();

    let trace_layer = TraceLayer::new_for_http();

    let app = Router::new()
        .route("/", get(get_index_route))
        .route("/dashboard", get(get_dashboard))
        .route("/errors", get(get_errors_page))
        .route("/login", get(get_login).post(post_login))
        .route("/logout", post(post_logout))
        .route("/onboarding", get(get_onboarding).post(post_onboarding))
        .route("/students", get(get_students).delete(delete_student))
        .route(
            "/roll_numbers",
            get(get_roll_numbers).delete(delete_roll_number),
        )
        .route("/internal/get_students", get(internal_get_students))
        .route("/internal/get_student", get(internal_get_student_in_detail))
        .route(
            "/internal/students/new_student_form",
            get(internal_get_add_student_form).put(internal_put_new_student),
        )
        .route(
            "/internal/students/edit_student_form",
            get(internal_get_edit_student_form).post(internal_post_edit_student),
        )
        .route("/internal/get_roll_numbers", get(internal_get_roll_numbers))
        .route(
            "/internal/roll_numbers/new_roll_number_form",
            get(internal_get_add_roll_number_form).put(internal_put_new_roll_number),
        )
        .nest_service("/public", ServeDir::new("public"))
        .layer(auth_layer)
        .layer(trace_layer)
        .with_state(state.clone());

    let bind_address = state.config().bind_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .expect("unable to listen on server address");

    info!(?bind_address, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .expect("unable to serve app");
}
