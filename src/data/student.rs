use crate::{
    data::DataType,
    error::{InvalidInsertedIdSnafu, MakeQuerySnafu, MissingStudentSnafu, RegistrarResult},
    validation::{self, ErrorCollector, SelectOption, Validated},
};
use email_address::EmailAddress;
use futures::TryStreamExt;
use maud::Render;
use mongodb::{
    Collection, Database,
    bson::{doc, oid::ObjectId},
};
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt, ensure};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl SelectOption for Gender {
    const ALL: &'static [Self] = &[Self::Male, Self::Female];

    fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    General,
    OBC,
    SC,
    ST,
    Others,
}

impl SelectOption for Category {
    const ALL: &'static [Self] = &[Self::General, Self::OBC, Self::SC, Self::ST, Self::Others];

    fn as_str(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::OBC => "OBC",
            Self::SC => "SC",
            Self::ST => "ST",
            Self::Others => "Others",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Religion {
    Muslim,
    Hindu,
    Sikh,
    Christian,
    Jain,
    Others,
}

impl SelectOption for Religion {
    const ALL: &'static [Self] = &[
        Self::Muslim,
        Self::Hindu,
        Self::Sikh,
        Self::Christian,
        Self::Jain,
        Self::Others,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Muslim => "Muslim",
            Self::Hindu => "Hindu",
            Self::Sikh => "Sikh",
            Self::Christian => "Christian",
            Self::Jain => "Jain",
            Self::Others => "Others",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StudentName {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    #[serde(rename = "Address_Line_1")]
    pub address_line_1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// The persisted document. Dates stay free-form strings and email/phone stay
/// unconstrained strings at this level; the form validator is the gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Student {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub student_name: StudentName,
    pub gender: Gender,
    pub date_of_birth: String,
    pub date_of_admission: String,
    pub category: Category,
    pub religion: Religion,
    pub email: String,
    pub phone_number: String,
    pub address: Address,
}

impl Render for Student {
    fn render_to(&self, buffer: &mut String) {
        buffer.push_str(&self.student_name.first_name);
        buffer.push(' ');
        buffer.push_str(&self.student_name.last_name);
    }
}

/// The flat shape the submission form posts. Missing keys deserialise to
/// empty strings so the validator can report them field by field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudentForm {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub category: String,
    pub date_of_birth: String,
    pub date_of_admission: String,
    pub religion: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// What the validator hands back: every field parsed into its checked type.
#[derive(Debug, Clone)]
pub struct ValidStudent {
    pub name: StudentName,
    pub gender: Gender,
    pub date_of_birth: String,
    pub date_of_admission: String,
    pub category: Category,
    pub religion: Religion,
    pub email: EmailAddress,
    pub phone_number: u64,
    pub address: Address,
}

impl StudentForm {
    /// Validates the submitted form, reporting all failing fields under the
    /// labels the original form uses.
    pub fn validate(&self) -> Validated<ValidStudent> {
        let mut errors = ErrorCollector::default();

        let first_name = errors.check(validation::alphanumeric_name("FirstName", &self.first_name));
        let last_name = errors.check(validation::required("LastName", &self.last_name));
        let gender = errors.check(validation::member::<Gender>("Gender", &self.gender));
        let category = errors.check(validation::member::<Category>("Category", &self.category));
        let date_of_birth = errors.check(validation::required("DateOfBirth", &self.date_of_birth));
        let date_of_admission = errors.check(validation::required(
            "DateOfAdmission",
            &self.date_of_admission,
        ));
        let religion = errors.check(validation::member::<Religion>("Religion", &self.religion));
        let email = errors.check(validation::email("Email", &self.email));
        let phone_number =
            errors.check(validation::positive_integer("PhoneNumber", &self.phone_number));
        let address = errors.check(validation::required("Address", &self.address));
        let city = errors.check(validation::required("City", &self.city));
        let state = errors.check(validation::required("State", &self.state));
        let postal_code = errors.check(validation::numeric("PostalCode", &self.postal_code));
        let country = errors.check(validation::required("Country", &self.country));

        errors.finish()?;

        let validated = "no field errors were collected";
        Ok(ValidStudent {
            name: StudentName {
                first_name: first_name.expect(validated),
                last_name: last_name.expect(validated),
            },
            gender: gender.expect(validated),
            date_of_birth: date_of_birth.expect(validated),
            date_of_admission: date_of_admission.expect(validated),
            category: category.expect(validated),
            religion: religion.expect(validated),
            email: email.expect(validated),
            phone_number: phone_number.expect(validated),
            address: Address {
                address_line_1: address.expect(validated),
                city: city.expect(validated),
                state: state.expect(validated),
                postal_code: postal_code.expect(validated),
                country: country.expect(validated),
            },
        })
    }
}

impl From<ValidStudent> for Student {
    fn from(valid: ValidStudent) -> Self {
        Self {
            id: None,
            student_name: valid.name,
            gender: valid.gender,
            date_of_birth: valid.date_of_birth,
            date_of_admission: valid.date_of_admission,
            category: valid.category,
            religion: valid.religion,
            email: valid.email.to_string(),
            phone_number: valid.phone_number.to_string(),
            address: valid.address,
        }
    }
}

impl From<&Student> for StudentForm {
    /// Flattens a stored document back into the shape the edit form posts.
    fn from(student: &Student) -> Self {
        Self {
            first_name: student.student_name.first_name.clone(),
            last_name: student.student_name.last_name.clone(),
            gender: student.gender.as_str().to_string(),
            category: student.category.as_str().to_string(),
            date_of_birth: student.date_of_birth.clone(),
            date_of_admission: student.date_of_admission.clone(),
            religion: student.religion.as_str().to_string(),
            email: student.email.clone(),
            phone_number: student.phone_number.clone(),
            address: student.address.address_line_1.clone(),
            city: student.address.city.clone(),
            state: student.address.state.clone(),
            postal_code: student.address.postal_code.clone(),
            country: student.address.country.clone(),
        }
    }
}

impl Student {
    pub const COLLECTION: &'static str = "Student";

    fn collection(db: &Database) -> Collection<Self> {
        db.collection(Self::COLLECTION)
    }

    pub async fn count(db: &Database) -> RegistrarResult<u64> {
        Self::collection(db)
            .count_documents(doc! {})
            .await
            .context(MakeQuerySnafu)
    }

    pub async fn update_in_database(
        id: ObjectId,
        replacement: ValidStudent,
        db: &Database,
    ) -> RegistrarResult<()> {
        let mut document = Self::from(replacement);
        document.id = Some(id);

        let result = Self::collection(db)
            .replace_one(doc! {"_id": id}, &document)
            .await
            .context(MakeQuerySnafu)?;
        ensure!(result.matched_count > 0, MissingStudentSnafu { id });

        Ok(())
    }
}

impl DataType for Student {
    type Id = ObjectId;
    type FormForAdding = ValidStudent;

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

        let mut students = Vec::new();
        while let Some(student) = cursor.try_next().await.context(MakeQuerySnafu)? {
            students.push(student);
        }
        Ok(students)
    }

    async fn insert_into_database(
        to_be_added: Self::FormForAdding,
        db: &Database,
    ) -> RegistrarResult<Self::Id> {
        let document = Self::from(to_be_added);

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

    fn valid_form() -> StudentForm {
        StudentForm {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            gender: "Male".to_string(),
            category: "General".to_string(),
            date_of_birth: "2001-04-12".to_string(),
            date_of_admission: "2019-07-01".to_string(),
            religion: "Hindu".to_string(),
            email: "john@example.com".to_string(),
            phone_number: "9876543210".to_string(),
            address: "12 Lake Road".to_string(),
            city: "Delhi".to_string(),
            state: "Delhi".to_string(),
            postal_code: "110001".to_string(),
            country: "India".to_string(),
        }
    }

    #[test]
    fn test_valid_form_passes_and_maps_to_document() {
        let valid = valid_form().validate().unwrap();
        let student = Student::from(valid);

        assert_eq!(student.student_name.first_name, "John");
        assert_eq!(student.student_name.last_name, "Doe");
        assert_eq!(student.gender, Gender::Male);
        assert_eq!(student.category, Category::General);
        assert_eq!(student.religion, Religion::Hindu);
        assert_eq!(student.email, "john@example.com");
        assert_eq!(student.phone_number, "9876543210");
        assert_eq!(student.address.postal_code, "110001");
        assert_eq!(student.address.country, "India");
        assert!(student.id.is_none());
    }

    #[test]
    fn test_each_missing_required_field_is_named() {
        let cases: Vec<(&str, fn(&mut StudentForm))> = vec![
            ("FirstName", |form| form.first_name.clear()),
            ("LastName", |form| form.last_name.clear()),
            ("Gender", |form| form.gender.clear()),
            ("Category", |form| form.category.clear()),
            ("DateOfBirth", |form| form.date_of_birth.clear()),
            ("DateOfAdmission", |form| form.date_of_admission.clear()),
            ("Religion", |form| form.religion.clear()),
            ("Email", |form| form.email.clear()),
            ("PhoneNumber", |form| form.phone_number.clear()),
            ("Address", |form| form.address.clear()),
            ("City", |form| form.city.clear()),
            ("State", |form| form.state.clear()),
            ("PostalCode", |form| form.postal_code.clear()),
            ("Country", |form| form.country.clear()),
        ];

        for (field, clear) in cases {
            let mut form = valid_form();
            clear(&mut form);

            let errors = form.validate().unwrap_err();
            assert!(
                errors.contains_field(field),
                "expected an error for {field}, got {errors:?}"
            );
        }
    }

    #[test]
    fn test_first_name_must_be_alphanumeric_with_a_letter() {
        let mut form = valid_form();
        form.first_name = "J@hn".to_string();
        assert!(form.validate().unwrap_err().contains_field("FirstName"));

        form.first_name = "12345".to_string();
        assert!(form.validate().unwrap_err().contains_field("FirstName"));

        form.first_name = "John2".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_email_must_have_a_domain() {
        let mut form = valid_form();
        form.email = "john.example.com".to_string();
        assert!(form.validate().unwrap_err().contains_field("Email"));
    }

    #[test]
    fn test_phone_number_must_be_a_positive_integer() {
        for bad in ["0", "-911", "98765abc", "98.765"] {
            let mut form = valid_form();
            form.phone_number = bad.to_string();
            assert!(
                form.validate().unwrap_err().contains_field("PhoneNumber"),
                "{bad} should have been rejected"
            );
        }
    }

    #[test]
    fn test_postal_code_must_be_numeric() {
        let mut form = valid_form();
        form.postal_code = "SW1A 1AA".to_string();
        assert!(form.validate().unwrap_err().contains_field("PostalCode"));
    }

    #[test]
    fn test_enum_fields_are_cross_checked_against_the_schema() {
        let mut form = valid_form();
        form.gender = "Other".to_string();
        assert!(form.validate().unwrap_err().contains_field("Gender"));

        let mut form = valid_form();
        form.category = "EWS".to_string();
        assert!(form.validate().unwrap_err().contains_field("Category"));

        let mut form = valid_form();
        form.religion = "Atheist".to_string();
        assert!(form.validate().unwrap_err().contains_field("Religion"));
    }

    #[test]
    fn test_multiple_failures_are_all_reported() {
        let errors = StudentForm::default().validate().unwrap_err();
        assert!(errors.contains_field("FirstName"));
        assert!(errors.contains_field("Country"));
        assert!(errors.iter().count() >= 14);
    }

    #[test]
    fn test_persisted_key_layout_matches_the_original() {
        let student = Student::from(valid_form().validate().unwrap());
        let document = bson::to_document(&student).unwrap();

        assert!(!document.contains_key("_id"));
        let name = document.get_document("StudentName").unwrap();
        assert_eq!(name.get_str("FirstName").unwrap(), "John");
        assert_eq!(name.get_str("LastName").unwrap(), "Doe");
        assert_eq!(document.get_str("Gender").unwrap(), "Male");
        assert_eq!(document.get_str("Religion").unwrap(), "Hindu");
        let address = document.get_document("Address").unwrap();
        assert_eq!(address.get_str("Address_Line_1").unwrap(), "12 Lake Road");
        assert_eq!(address.get_str("PostalCode").unwrap(), "110001");
    }
}
