use crate::error::{ParseObjectIdSnafu, RegistrarResult};
use mongodb::{Database, bson::oid::ObjectId};
use serde::Deserialize;
use snafu::ResultExt;

pub mod student;
pub mod student_id;
pub mod user;

/// Query/form carrying a document id as the hex string the browser submits.
#[derive(Deserialize)]
pub struct IdForm {
    pub id: String,
}

impl IdForm {
    pub fn parse(&self) -> RegistrarResult<ObjectId> {
        ObjectId::parse_str(&self.id).context(ParseObjectIdSnafu {
            original: self.id.clone(),
        })
    }
}

pub trait DataType: Sized {
    type Id;
    type FormForAdding;

    async fn get_from_db_by_id(id: Self::Id, db: &Database) -> RegistrarResult<Option<Self>>;
    async fn get_all(db: &Database) -> RegistrarResult<Vec<Self>>;
    async fn insert_into_database(
        to_be_added: Self::FormForAdding,
        db: &Database,
    ) -> RegistrarResult<Self::Id>;
    async fn remove_from_database(id: Self::Id, db: &Database) -> RegistrarResult<()>;
}
