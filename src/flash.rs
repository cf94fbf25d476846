use crate::error::{RegistrarResult, TowerSessionSnafu};
use axum_login::tower_sessions::Session;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

const FLASH_KEY: &str = "_flash";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashLevel {
    Success,
    Error,
}

/// A one-time notification shown on the next full page render after a
/// redirect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

pub async fn push_flash(
    session: &Session,
    level: FlashLevel,
    message: impl Into<String>,
) -> RegistrarResult<()> {
    let mut queued: Vec<FlashMessage> = session
        .get(FLASH_KEY)
        .await
        .context(TowerSessionSnafu)?
        .unwrap_or_default();
    queued.push(FlashMessage {
        level,
        message: message.into(),
    });

    session
        .insert(FLASH_KEY, queued)
        .await
        .context(TowerSessionSnafu)
}

pub async fn take_flashes(session: &Session) -> RegistrarResult<Vec<FlashMessage>> {
    Ok(session
        .remove(FLASH_KEY)
        .await
        .context(TowerSessionSnafu)?
        .unwrap_or_default())
}
