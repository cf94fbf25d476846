use crate::{auth::backend::RegistrarAuthBackend, error::RegistrarResult};
use axum_login::AuthSession;
use snafu::ensure;

pub mod backend;
pub mod mongo_store;

pub type RegistrarSession = AuthSession<RegistrarAuthBackend>;

/// The original gates purely on logged-in-ness, so there is a single
/// authenticated tier rather than a permissions model.
pub trait AuthUtilities {
    fn logged_in(&self) -> bool;
    fn ensure_authenticated(&self) -> RegistrarResult<()>;
}

impl AuthUtilities for RegistrarSession {
    fn logged_in(&self) -> bool {
        self.user.is_some()
    }

    fn ensure_authenticated(&self) -> RegistrarResult<()> {
        ensure!(self.user.is_some(), crate::error::NotAuthenticatedSnafu);
        Ok(())
    }
}
