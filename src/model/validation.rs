//! Field validators for user records.
//!
//! Each validator looks at one raw field and either accepts it or returns a
//! [`FieldError`] whose `Display` is the message sent back to the client.
//! Validators never short-circuit each other; callers collect every failure
//! into [`ValidationErrors`].

use std::collections::BTreeMap;

use thiserror::Error;

use super::israeli_id::{self, IdError};

pub const NAME_MAX_CHARS: usize = 100;
pub const ADDRESS_MAX_CHARS: usize = 200;
pub const PHONE_MIN_CHARS: usize = 8;
pub const PHONE_MAX_CHARS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error(transparent)]
    Id(#[from] IdError),

    #[error("Name cannot be empty")]
    NameEmpty,
    #[error("Name must not exceed 100 characters")]
    NameTooLong,

    #[error("Phone number must be a non-empty string")]
    PhoneEmpty,
    #[error("Phone number must start with +")]
    PhoneNoPlus,
    #[error("Phone number must be between 8-16 characters total")]
    PhoneWrongLength,
    #[error("Phone number must contain only digits after +")]
    PhoneNotDigits,

    #[error("Address cannot be empty")]
    AddressEmpty,
    #[error("Address must not exceed 200 characters")]
    AddressTooLong,

    #[error("{} must be a string", field_label(.0))]
    NotAString(&'static str),

    #[error("At least one field must be provided for update")]
    NothingToUpdate,
}

fn field_label(field: &str) -> &'static str {
    match field {
        "id" => "Israeli ID",
        "name" => "Name",
        "phone" => "Phone number",
        "address" => "Address",
        _ => "Field",
    }
}

pub fn validate_id(id: Option<&str>) -> Result<(), FieldError> {
    israeli_id::validate(id.unwrap_or_default()).map_err(FieldError::from)
}

pub fn validate_name(name: Option<&str>) -> Result<(), FieldError> {
    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(FieldError::NameEmpty);
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(FieldError::NameTooLong);
    }
    Ok(())
}

pub fn validate_phone(phone: Option<&str>) -> Result<(), FieldError> {
    let phone = phone.map(str::trim).unwrap_or_default();
    if phone.is_empty() {
        return Err(FieldError::PhoneEmpty);
    }
    let Some(digits) = phone.strip_prefix('+') else {
        return Err(FieldError::PhoneNoPlus);
    };
    let len = phone.chars().count();
    if !(PHONE_MIN_CHARS..=PHONE_MAX_CHARS).contains(&len) {
        return Err(FieldError::PhoneWrongLength);
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::PhoneNotDigits);
    }
    Ok(())
}

pub fn validate_address(address: Option<&str>) -> Result<(), FieldError> {
    let address = address.map(str::trim).unwrap_or_default();
    if address.is_empty() {
        return Err(FieldError::AddressEmpty);
    }
    if address.chars().count() > ADDRESS_MAX_CHARS {
        return Err(FieldError::AddressTooLong);
    }
    Ok(())
}

/// Every failed field of one request, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<&'static str, FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a validator under `field`.
    pub fn check(&mut self, field: &'static str, result: Result<(), FieldError>) {
        if let Err(e) = result {
            self.0.insert(field, e);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// Field name to human-readable message, as sent in error bodies.
    pub fn to_details(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(field, err)| ((*field).to_owned(), err.to_string()))
            .collect()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, err) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {err}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
