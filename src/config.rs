use crate::error::{ParsePortSnafu, RegistrarResult};
use dotenvy::var;
use snafu::ResultExt;
use std::sync::Arc;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MONGO_URL: &str = "mongodb://localhost:27017";
const DATABASE_NAME: &str = "student-mgmt-sys";

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    db_config: Arc<DbConfig>,
    port: u16,
}

impl RuntimeConfiguration {
    pub fn new() -> RegistrarResult<Self> {
        let port = match var("PORT") {
            Ok(raw) => raw.parse().context(ParsePortSnafu)?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            db_config: Arc::new(DbConfig::new()),
            port,
        })
    }

    pub fn db_config(&self) -> Arc<DbConfig> {
        self.db_config.clone()
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[derive(Debug)]
pub struct DbConfig {
    url: String,
    database: String,
}

impl DbConfig {
    pub fn new() -> Self {
        Self {
            url: var("MONGO_URL").unwrap_or_else(|_| DEFAULT_MONGO_URL.to_string()),
            database: DATABASE_NAME.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database_name(&self) -> &str {
        &self.database
    }
}
