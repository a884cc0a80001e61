use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{
    validate_address, validate_id, validate_name, validate_phone, FieldError, ValidationErrors,
};

/// Stored user record.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One text field as it arrived in a JSON body. Anything that is not a JSON
/// string is kept so it can be reported next to the other field errors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextField {
    Text(String),
    Other(serde_json::Value),
}

impl From<&str> for TextField {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for TextField {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

// Body of POST /users. Every field is optional and loosely typed here so that
// a missing or mistyped field is reported next to the invalid ones instead of
// as a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub id: Option<TextField>,
    pub name: Option<TextField>,
    pub phone: Option<TextField>,
    pub address: Option<TextField>,
}

/// A create payload that passed every field validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    id: String,
    name: String,
    phone: String,
    address: String,
}

/// Trim `value` and run `validate` over it, recording any failure under
/// `field`. Returns the trimmed text only when it passed.
fn checked(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<TextField>,
    validate: impl Fn(Option<&str>) -> Result<(), FieldError>,
) -> Option<String> {
    let text = match value {
        None => None,
        Some(TextField::Text(s)) => Some(s.trim().to_owned()),
        Some(TextField::Other(_)) => {
            errors.check(field, Err(FieldError::NotAString(field)));
            return None;
        }
    };
    match validate(text.as_deref()) {
        Ok(()) => text,
        Err(e) => {
            errors.check(field, Err(e));
            None
        }
    }
}

// Absent fields are fine in a partial update; present ones must pass.
fn if_present(
    validate: fn(Option<&str>) -> Result<(), FieldError>,
) -> impl Fn(Option<&str>) -> Result<(), FieldError> {
    move |value| value.map_or(Ok(()), |v| validate(Some(v)))
}

impl NewUser {
    /// Trim and validate a create payload, collecting every failed field.
    pub fn parse(request: CreateUserRequest) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let id = checked(&mut errors, "id", request.id, validate_id);
        let name = checked(&mut errors, "name", request.name, validate_name);
        let phone = checked(&mut errors, "phone", request.phone, validate_phone);
        let address = checked(&mut errors, "address", request.address, validate_address);
        errors.into_result()?;

        Ok(Self {
            id: id.unwrap_or_default(),
            name: name.unwrap_or_default(),
            phone: phone.unwrap_or_default(),
            address: address.unwrap_or_default(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Shape the persisted record; both timestamps start at `now`.
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: self.id,
            name: self.name,
            phone: self.phone,
            address: self.address,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<TextField>,
    pub phone: Option<TextField>,
    pub address: Option<TextField>,
}

/// Validated partial update. The id is never part of an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl UserUpdate {
    pub fn parse(request: UpdateUserRequest) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if request.name.is_none() && request.phone.is_none() && request.address.is_none() {
            errors.check("update", Err(FieldError::NothingToUpdate));
        }
        let name = checked(&mut errors, "name", request.name, if_present(validate_name));
        let phone = checked(&mut errors, "phone", request.phone, if_present(validate_phone));
        let address = checked(
            &mut errors,
            "address",
            request.address,
            if_present(validate_address),
        );
        errors.into_result()?;

        Ok(Self {
            name,
            phone,
            address,
        })
    }

    /// Apply to `user`, refreshing `updated_at` without moving it before
    /// `created_at`.
    pub fn apply(self, user: &mut User, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
        if let Some(address) = self.address {
            user.address = address;
        }
        user.updated_at = now.max(user.created_at);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn request(id: &str, name: &str, phone: &str, address: &str) -> CreateUserRequest {
        CreateUserRequest {
            id: Some(id.into()),
            name: Some(name.into()),
            phone: Some(phone.into()),
            address: Some(address.into()),
        }
    }

    #[test]
    fn test_parse_valid_payload_trims_fields() {
        let user = NewUser::parse(request(
            " 123456782 ",
            "  John Doe ",
            "+972501234567\n",
            "123 Main St ",
        ))
        .unwrap();
        assert_eq!(user.id(), "123456782");
        assert_eq!(user.name(), "John Doe");
        assert_eq!(user.phone(), "+972501234567");
        assert_eq!(user.address(), "123 Main St");
    }

    #[test]
    fn test_parse_reports_every_bad_field() {
        let errors = NewUser::parse(CreateUserRequest {
            id: Some("123456789".into()),
            name: None,
            phone: Some("+97".into()),
            address: Some("fine".into()),
        })
        .unwrap_err();

        let details = errors.to_details();
        assert_eq!(details.len(), 3);
        assert_eq!(details["id"], "Invalid Israeli ID checksum");
        assert_eq!(details["name"], "Name cannot be empty");
        assert_eq!(
            details["phone"],
            "Phone number must be between 8-16 characters total"
        );
    }

    #[test]
    fn test_parse_wrong_type_does_not_hide_other_errors() {
        let request: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "id": 123456782,
            "name": "",
            "phone": "x",
            "address": ["not", "text"]
        }))
        .unwrap();

        let errors = NewUser::parse(request).unwrap_err();
        assert_eq!(errors.get("id"), Some(&FieldError::NotAString("id")));
        assert_eq!(errors.get("name"), Some(&FieldError::NameEmpty));
        assert_eq!(errors.get("phone"), Some(&FieldError::PhoneNoPlus));
        assert_eq!(
            errors.get("address"),
            Some(&FieldError::NotAString("address"))
        );
    }

    #[test]
    fn test_parse_null_counts_as_missing() {
        let request: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "id": "123456782",
            "name": null,
            "phone": "+972501234567",
            "address": "Addr"
        }))
        .unwrap();

        let errors = NewUser::parse(request).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["name"]);
        assert_eq!(errors.get("name"), Some(&FieldError::NameEmpty));
    }

    #[test]
    fn test_parse_empty_payload() {
        let errors = NewUser::parse(CreateUserRequest::default()).unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            ["address", "id", "name", "phone"]
        );
    }

    #[test]
    fn test_into_user_sets_equal_timestamps() {
        let now = Utc::now();
        let user = NewUser::parse(request("123456782", "John", "+972501234567", "Addr"))
            .unwrap()
            .into_user(now);
        assert_eq!(user.created_at, now);
        assert_eq!(user.updated_at, user.created_at);
    }

    #[test]
    fn test_update_requires_a_field() {
        let errors = UserUpdate::parse(UpdateUserRequest::default()).unwrap_err();
        assert_eq!(
            errors.get("update"),
            Some(&FieldError::NothingToUpdate)
        );
    }

    #[test]
    fn test_update_validates_only_present_fields() {
        let update = UserUpdate::parse(UpdateUserRequest {
            name: Some(" Jane ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(update.name.as_deref(), Some("Jane"));
        assert!(update.phone.is_none());

        let errors = UserUpdate::parse(UpdateUserRequest {
            phone: Some("12345678".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(errors.get("phone"), Some(&FieldError::PhoneNoPlus));

        let errors = UserUpdate::parse(UpdateUserRequest {
            address: Some(TextField::Other(serde_json::json!(42))),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(
            errors.get("address"),
            Some(&FieldError::NotAString("address"))
        );
        assert!(errors.get("update").is_none());
    }

    #[test]
    fn test_apply_never_moves_updated_at_backwards() {
        let created = Utc::now();
        let mut user = NewUser::parse(request("123456782", "John", "+972501234567", "Addr"))
            .unwrap()
            .into_user(created);

        let update = UserUpdate {
            address: Some("New Addr".into()),
            ..Default::default()
        };
        update.apply(&mut user, created - Duration::seconds(5));
        assert_eq!(user.address, "New Addr");
        assert_eq!(user.updated_at, created);

        let later = created + Duration::seconds(5);
        UserUpdate {
            name: Some("Johnny".into()),
            ..Default::default()
        }
        .apply(&mut user, later);
        assert_eq!(user.updated_at, later);
        assert_eq!(user.created_at, created);
    }
}
