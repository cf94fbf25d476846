use crate::{
    error::{
        InvalidExpirySnafu, MakeQuerySnafu, RegistrarError, RmpSerdeDecodeSnafu,
        RmpSerdeEncodeSnafu,
    },
    state::RegistrarState,
};
use async_trait::async_trait;
use axum_login::tower_sessions::{
    ExpiredDeletion, SessionStore,
    cookie::time::OffsetDateTime,
    session::{Id, Record},
    session_store::Error as SSError,
};
use mongodb::{
    Collection,
    bson::{Binary, DateTime as BsonDateTime, doc, spec::BinarySubtype},
};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

/// Session data is MessagePack-encoded into a binary field; only the expiry
/// lives alongside it so expired sessions can be swept with one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionDocument {
    #[serde(rename = "_id")]
    id: String,
    data: Binary,
    expiry_date: BsonDateTime,
}

#[derive(Debug, Clone)]
pub struct MongoSessionStore {
    state: RegistrarState,
}

impl MongoSessionStore {
    pub const COLLECTION: &'static str = "sessions";

    pub const fn new(state: RegistrarState) -> Self {
        Self { state }
    }

    fn collection(&self) -> Collection<SessionDocument> {
        self.state.db().collection(Self::COLLECTION)
    }

    async fn id_exists(&self, id: Id) -> Result<bool, RegistrarError> {
        Ok(self
            .collection()
            .find_one(doc! {"_id": id.to_string()})
            .await
            .context(MakeQuerySnafu)?
            .is_some())
    }

    async fn save_session(&self, record: &Record) -> Result<(), RegistrarError> {
        let serialised_data = rmp_serde::to_vec(&record.data).context(RmpSerdeEncodeSnafu)?;

        let document = SessionDocument {
            id: record.id.to_string(),
            data: Binary {
                subtype: BinarySubtype::Generic,
                bytes: serialised_data,
            },
            expiry_date: BsonDateTime::from_millis(record.expiry_date.unix_timestamp() * 1000),
        };

        self.collection()
            .replace_one(doc! {"_id": &document.id}, &document)
            .upsert(true)
            .await
            .context(MakeQuerySnafu)?;

        Ok(())
    }
}

#[async_trait]
impl SessionStore for MongoSessionStore {
    async fn create(&self, session_record: &mut Record) -> Result<(), SSError> {
        while self
            .id_exists(session_record.id)
            .await
            .map_err(|e| SSError::Backend(e.to_string()))?
        {
            session_record.id = Id::default();
        }

        self.save_session(session_record)
            .await
            .map_err(|e| SSError::Encode(e.to_string()))?;

        Ok(())
    }

    async fn save(&self, session_record: &Record) -> Result<(), SSError> {
        self.save_session(session_record)
            .await
            .map_err(|e| SSError::Encode(e.to_string()))?;

        Ok(())
    }

    async fn load(&self, session_id: &Id) -> Result<Option<Record>, SSError> {
        let Some(document) = self
            .collection()
            .find_one(doc! {"_id": session_id.to_string()})
            .await
            .context(MakeQuerySnafu)
            .map_err(|e| SSError::Backend(e.to_string()))?
        else {
            return Ok(None);
        };

        let data = rmp_serde::from_slice(&document.data.bytes)
            .context(RmpSerdeDecodeSnafu)
            .map_err(|e| SSError::Decode(e.to_string()))?;

        let expiry_date =
            OffsetDateTime::from_unix_timestamp(document.expiry_date.timestamp_millis() / 1000)
                .context(InvalidExpirySnafu)
                .map_err(|e| SSError::Decode(e.to_string()))?;

        Ok(Some(Record {
            id: *session_id,
            data,
            expiry_date,
        }))
    }

    async fn delete(&self, session_id: &Id) -> Result<(), SSError> {
        self.collection()
            .delete_one(doc! {"_id": session_id.to_string()})
            .await
            .context(MakeQuerySnafu)
            .map_err(|e| SSError::Backend(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for MongoSessionStore {
    async fn delete_expired(&self) -> Result<(), SSError> {
        self.collection()
            .delete_many(doc! {"expiry_date": doc! {"$lt": BsonDateTime::now()}})
            .await
            .context(MakeQuerySnafu)
            .map_err(|e| SSError::Backend(e.to_string()))?;

        Ok(())
    }
}
