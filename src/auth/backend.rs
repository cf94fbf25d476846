use crate::{
    data::{DataType, user::User},
    error::{BcryptSnafu, RegistrarError},
    state::RegistrarState,
};
use async_trait::async_trait;
use axum_login::{AuthnBackend, UserId};
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;

#[derive(Clone)]
pub struct RegistrarAuthBackend {
    state: RegistrarState,
}

impl RegistrarAuthBackend {
    pub const fn new(state: RegistrarState) -> Self {
        Self { state }
    }
}

#[derive(Clone)]
pub enum RegistrarAuthCredentials {
    EmailPassword {
        email: String,
        password: SecretString,
    },
}

#[async_trait]
impl AuthnBackend for RegistrarAuthBackend {
    type User = User;
    type Credentials = RegistrarAuthCredentials;
    type Error = RegistrarError;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        match creds {
            RegistrarAuthCredentials::EmailPassword { email, password } => {
                let Some(user) = User::get_by_email(&email, self.state.db()).await? else {
                    return Ok(None);
                };
                let Some(hash) = user.bcrypt_hashed_password.clone() else {
                    return Ok(None);
                };

                let password_verification_result = tokio::task::spawn_blocking(move || {
                    bcrypt::verify(password.expose_secret(), hash.expose_secret())
                })
                .await
                .expect("unable to join tokio task")
                .context(BcryptSnafu)?;

                Ok(if password_verification_result {
                    Some(user)
                } else {
                    None
                })
            }
        }
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        User::get_from_db_by_id(*user_id, self.state.db()).await
    }
}
