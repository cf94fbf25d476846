use crate::{
    data::DataType,
    error::{
        InvalidClassRollNoSnafu, InvalidInsertedIdSnafu, MakeQuerySnafu, RegistrarResult,
    },
};
use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{doc, oid::ObjectId},
};
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt, ensure};

/// A roll-number record. Despite the name there is no declared link to
/// `Student` — the two collections are independent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StudentId {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub class_roll_no: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_no: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddStudentIdForm {
    pub class_roll_no: String,
    pub registration_no: String,
}

fn ensure_valid_roll(class_roll_no: &str) -> RegistrarResult<()> {
    ensure!(
        class_roll_no.len() > 3,
        InvalidClassRollNoSnafu {
            length: class_roll_no.len()
        }
    );
    Ok(())
}

impl StudentId {
    pub const COLLECTION: &'static str = "StudentId";

    fn collection(db: &Database) -> Collection<Self> {
        db.collection(Self::COLLECTION)
    }

    pub async fn count(db: &Database) -> RegistrarResult<u64> {
        Self::collection(db)
            .count_documents(doc! {})
            .await
            .context(MakeQuerySnafu)
    }
}

impl DataType for StudentId {
    type Id = ObjectId;
    type FormForAdding = AddStudentIdForm;

    async fn get_from_db_by_id(id: Self::Id, db: &Database) -> RegistrarResult<Option<Self>> {
        Self::collection(db)
            .find_one(doc! {"_id": id})
            .await
            .context(MakeQuerySnafu)
    }

    async fn get_all(db: &Database) -> RegistrarResult<Vec<Self>> {
        let mut cursor = Self::collection(db)
            .find(doc! {})
            .await
            .context(MakeQuerySnafu)?;

        let mut records = Vec::new();
        while let Some(record) = cursor.try_next().await.context(MakeQuerySnafu)? {
            records.push(record);
        }
        Ok(records)
    }

    async fn insert_into_database(
        to_be_added: Self::FormForAdding,
        db: &Database,
    ) -> RegistrarResult<Self::Id> {
        let AddStudentIdForm {
            class_roll_no,
            registration_no,
        } = to_be_added;

        ensure_valid_roll(&class_roll_no)?;

        let registration_no = if registration_no.is_empty() {
            None
        } else {
            Some(registration_no)
        };

        let document = Self {
            id: None,
            class_roll_no,
            registration_no,
        };

        Self::collection(db)
            .insert_one(&document)
            .await
            .context(MakeQuerySnafu)?
            .inserted_id
            .as_object_id()
            .context(InvalidInsertedIdSnafu)
    }

    async fn remove_from_database(id: Self::Id, db: &Database) -> RegistrarResult<()> {
        Self::collection(db)
            .delete_one(doc! {"_id": id})
            .await
            .context(MakeQuerySnafu)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    #[test]
    fn test_roll_no_of_three_or_fewer_characters_is_rejected() {
        for too_short in ["", "1", "12", "123"] {
            let error = ensure_valid_roll(too_short).unwrap_err();
            assert_eq!(error.to_string(), "Roll must be greater than 3");
        }
    }

    #[test]
    fn test_roll_no_longer_than_three_characters_passes() {
        assert!(ensure_valid_roll("1234").is_ok());
        assert!(ensure_valid_roll("A-2019-042").is_ok());
    }

    #[test]
    fn test_persisted_key_layout_matches_the_original() {
        let with_registration = StudentId {
            id: None,
            class_roll_no: "2019042".to_string(),
            registration_no: Some("REG-77".to_string()),
        };
        let document = bson::to_document(&with_registration).unwrap();
        assert_eq!(document.get_str("ClassRollNo").unwrap(), "2019042");
        assert_eq!(document.get_str("RegistrationNo").unwrap(), "REG-77");

        let without_registration = StudentId {
            id: None,
            class_roll_no: "2019042".to_string(),
            registration_no: None,
        };
        let document = bson::to_document(&without_registration).unwrap();
        assert!(!document.contains_key("RegistrationNo"));
        assert!(!document.contains_key("_id"));
    }
}
