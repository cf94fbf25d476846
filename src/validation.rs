//! Typed field validators composed into a validation pipeline.
//!
//! Validation failures are data, not control flow: callers get back either
//! the validated value or the list of every failing field, each with a
//! message naming it. Turning that into a banner and a re-rendered form is
//! the route layer's job.

use email_address::EmailAddress;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|error| error.message.as_str())
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }
}

pub type Validated<T> = Result<T, ValidationErrors>;

/// Runs individual field checks, remembering every failure rather than
/// stopping at the first one.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<FieldError>,
}

impl ErrorCollector {
    pub fn check<T>(&mut self, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

/// An enum whose members double as the options of a form `<select>`.
pub trait SelectOption: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|option| option.as_str() == s)
    }
}

fn field_error(field: &'static str, message: String) -> FieldError {
    FieldError { field, message }
}

pub fn required(field: &'static str, value: &str) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(field_error(
            field,
            format!("\"{field}\" is not allowed to be empty"),
        ))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Alphanumeric characters only, with at least one letter amongst them.
pub fn alphanumeric_name(field: &'static str, value: &str) -> Result<String, FieldError> {
    let value = required(field, value)?;
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Err(field_error(
            field,
            format!("\"{field}\" must only contain alpha-numeric characters"),
        ))
    } else if !value.chars().any(|c| c.is_ascii_alphabetic()) {
        Err(field_error(
            field,
            format!("\"{field}\" must contain at least one letter"),
        ))
    } else {
        Ok(value)
    }
}

pub fn email(field: &'static str, value: &str) -> Result<EmailAddress, FieldError> {
    let value = required(field, value)?;
    EmailAddress::from_str(&value)
        .map_err(|_| field_error(field, format!("\"{field}\" must be a valid email")))
}

pub fn positive_integer(field: &'static str, value: &str) -> Result<u64, FieldError> {
    let value = required(field, value)?;
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(field_error(
            field,
            format!("\"{field}\" must be a positive integer"),
        )),
    }
}

pub fn numeric(field: &'static str, value: &str) -> Result<String, FieldError> {
    let value = required(field, value)?;
    if value.chars().all(|c| c.is_ascii_digit()) {
        Ok(value)
    } else {
        Err(field_error(field, format!("\"{field}\" must be a number")))
    }
}

pub fn member<T: SelectOption>(field: &'static str, value: &str) -> Result<T, FieldError> {
    let value = required(field, value)?;
    T::parse(&value).ok_or_else(|| {
        let allowed = T::ALL
            .iter()
            .map(|option| option.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        field_error(field, format!("\"{field}\" must be one of [{allowed}]"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    enum Coin {
        Heads,
        Tails,
    }

    impl SelectOption for Coin {
        const ALL: &'static [Self] = &[Self::Heads, Self::Tails];

        fn as_str(self) -> &'static str {
            match self {
                Self::Heads => "Heads",
                Self::Tails => "Tails",
            }
        }
    }

    #[test]
    fn test_required_rejects_empty_and_whitespace() {
        assert!(required("LastName", "").is_err());
        assert!(required("LastName", "   ").is_err());

        let error = required("LastName", "").unwrap_err();
        assert_eq!(error.field, "LastName");
        assert!(error.message.contains("LastName"));
    }

    #[test]
    fn test_required_trims() {
        assert_eq!(required("City", "  Delhi  ").unwrap(), "Delhi");
    }

    #[test]
    fn test_alphanumeric_name_rejects_symbols() {
        assert!(alphanumeric_name("FirstName", "John!").is_err());
        assert!(alphanumeric_name("FirstName", "John Doe").is_err());
    }

    #[test]
    fn test_alphanumeric_name_requires_a_letter() {
        assert!(alphanumeric_name("FirstName", "1234").is_err());
        assert!(alphanumeric_name("FirstName", "John2").is_ok());
    }

    #[test]
    fn test_email_requires_domain() {
        assert!(email("Email", "john").is_err());
        assert!(email("Email", "john@").is_err());
        assert!(email("Email", "john@example.com").is_ok());
    }

    #[test]
    fn test_positive_integer_rejects_zero_negative_and_fractional() {
        assert!(positive_integer("PhoneNumber", "0").is_err());
        assert!(positive_integer("PhoneNumber", "-42").is_err());
        assert!(positive_integer("PhoneNumber", "12.5").is_err());
        assert!(positive_integer("PhoneNumber", "98765").is_ok());
    }

    #[test]
    fn test_numeric_rejects_letters() {
        assert!(numeric("PostalCode", "1100A1").is_err());
        assert_eq!(numeric("PostalCode", "110001").unwrap(), "110001");
    }

    #[test]
    fn test_member_names_the_allowed_values() {
        let error = member::<Coin>("Coin", "Edge").unwrap_err();
        assert!(error.message.contains("Heads"));
        assert!(error.message.contains("Tails"));
        assert_eq!(member::<Coin>("Coin", "Tails").unwrap(), Coin::Tails);
    }

    #[test]
    fn test_collector_gathers_every_failure() {
        let mut collector = ErrorCollector::default();
        let first = collector.check(required("FirstName", ""));
        let second = collector.check(required("LastName", "Doe"));

        assert!(first.is_none());
        assert_eq!(second.as_deref(), Some("Doe"));

        let errors = collector.finish().unwrap_err();
        assert!(errors.contains_field("FirstName"));
        assert!(!errors.contains_field("LastName"));
    }
}
