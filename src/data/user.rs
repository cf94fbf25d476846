use crate::{
    data::DataType,
    error::{
        BcryptSnafu, EmailSnafu, InvalidInsertedIdSnafu, MakeQuerySnafu, RegistrarResult,
    },
};
use axum_login::AuthUser;
use bcrypt::DEFAULT_COST;
use email_address::EmailAddress;
use futures::TryStreamExt;
use maud::Render;
use mongodb::{
    Collection, Database,
    bson::{doc, oid::ObjectId},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};
use std::{str::FromStr, sync::LazyLock};

/// The shape stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    first_name: String,
    surname: String,
    email: String,
    bcrypt_hashed_password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: ObjectId,
    pub first_name: String,
    pub surname: String,
    pub email: EmailAddress,
    pub bcrypt_hashed_password: Option<SecretString>,
}

impl TryFrom<UserDocument> for User {
    type Error = crate::error::RegistrarError;

    fn try_from(document: UserDocument) -> Result<Self, Self::Error> {
        let email = EmailAddress::from_str(&document.email).context(EmailSnafu)?;

        Ok(Self {
            id: document.id,
            first_name: document.first_name,
            surname: document.surname,
            email,
            bcrypt_hashed_password: document.bcrypt_hashed_password.map(SecretString::from),
        })
    }
}

pub struct AddUser {
    pub first_name: String,
    pub surname: String,
    pub email: EmailAddress,
    pub password: Option<SecretString>,
}

impl User {
    pub const COLLECTION: &'static str = "users";

    fn collection(db: &Database) -> Collection<UserDocument> {
        db.collection(Self::COLLECTION)
    }

    pub async fn any_exist(db: &Database) -> RegistrarResult<bool> {
        Ok(Self::collection(db)
            .find_one(doc! {})
            .await
            .context(MakeQuerySnafu)?
            .is_some())
    }

    pub async fn get_by_email(email: &str, db: &Database) -> RegistrarResult<Option<Self>> {
        let Some(document) = Self::collection(db)
            .find_one(doc! {"email": email})
            .await
            .context(MakeQuerySnafu)?
        else {
            return Ok(None);
        };

        Ok(Some(Self::try_from(document)?))
    }
}

impl DataType for User {
    type Id = ObjectId;
    type FormForAdding = AddUser;

    async fn get_from_db_by_id(id: Self::Id, db: &Database) -> RegistrarResult<Option<Self>> {
        let Some(document) = Self::collection(db)
            .find_one(doc! {"_id": id})
            .await
            .context(MakeQuerySnafu)?
        else {
            return Ok(None);
        };

        Ok(Some(Self::try_from(document)?))
    }

    async fn get_all(db: &Database) -> RegistrarResult<Vec<Self>> {
        let mut cursor = Self::collection(db)
            .find(doc! {})
            .await
            .context(MakeQuerySnafu)?;

        let mut users = Vec::new();
        while let Some(document) = cursor.try_next().await.context(MakeQuerySnafu)? {
            users.push(Self::try_from(document)?);
        }
        Ok(users)
    }

    async fn insert_into_database(
        to_be_added: Self::FormForAdding,
        db: &Database,
    ) -> RegistrarResult<Self::Id> {
        let AddUser {
            first_name,
            surname,
            email,
            password,
        } = to_be_added;

        let bcrypt_hashed_password = if let Some(password) = password {
            Some(
                tokio::task::spawn_blocking(move || {
                    bcrypt::hash(password.expose_secret().as_bytes(), DEFAULT_COST)
                })
                .await
                .expect("unable to join tokio task")
                .context(BcryptSnafu)?,
            )
        } else {
            None
        };

        let document = UserDocument {
            id: ObjectId::new(),
            first_name,
            surname,
            email: email.to_string(),
            bcrypt_hashed_password,
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

impl Render for User {
    fn render_to(&self, buffer: &mut String) {
        buffer.push_str(&self.first_name);
        buffer.push(' ');
        buffer.push_str(&self.surname);
    }
}

impl AuthUser for User {
    type Id = ObjectId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn session_auth_hash(&self) -> &[u8] {
        static EMPTY_SECRET_STRING: LazyLock<SecretString> =
            LazyLock::new(|| SecretString::from(""));

        self.bcrypt_hashed_password
            .as_ref()
            .unwrap_or(&EMPTY_SECRET_STRING)
            .expose_secret()
            .as_bytes()
    }
}
