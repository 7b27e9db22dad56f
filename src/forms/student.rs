//! Student form layout, field configuration and payload mapping.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::student::StudentDto;
use crate::domain::types::{StudentId, TypeConstraintError, parse_birth_date};
use crate::forms::FormError;
use crate::forms::binder::{FieldConfig, FieldSpec};
use crate::forms::control::{FieldValue, FormControl, FormGroup, FormModel, Validator};
use crate::forms::validators::DateRangeValidator;

pub const ID: &str = "id";
pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const USERNAME: &str = "username";
pub const EMAIL: &str = "email";
pub const ADDRESS: &str = "address";
pub const DATE_OF_BIRTH: &str = "dateOfBirth";
pub const PHONE_NUMBER: &str = "phoneNumber";
pub const NIC_NUMBER: &str = "nicNumber";

/// Builds a fresh, validated student form.
pub fn student_form(date_of_birth_cutoff: NaiveDate) -> FormGroup {
    let mut form = FormGroup::new()
        .with_control(ID, FormControl::default())
        .with_control(FIRST_NAME, FormControl::new(vec![Validator::Required]))
        .with_control(LAST_NAME, FormControl::new(vec![Validator::Required]))
        .with_control(USERNAME, FormControl::default())
        .with_control(
            EMAIL,
            FormControl::new(vec![Validator::Required, Validator::Email]),
        )
        .with_control(ADDRESS, FormControl::default())
        .with_control(DATE_OF_BIRTH, FormControl::new(vec![Validator::Required]))
        .with_control(PHONE_NUMBER, FormControl::default())
        .with_control(NIC_NUMBER, FormControl::new(vec![Validator::Required]))
        .with_validator(DateRangeValidator::new(DATE_OF_BIRTH, date_of_birth_cutoff));
    form.validate();
    form
}

/// Fields rendered by the student dialog, in display order.
pub fn student_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new(
            "firstNameField",
            FieldConfig::new("First Name", FIRST_NAME)
                .required()
                .placeholder("Enter first name"),
        ),
        FieldSpec::new(
            "lastNameField",
            FieldConfig::new("Last Name", LAST_NAME)
                .placeholder("Enter last name")
                .required(),
        ),
        FieldSpec::new(
            "usernameField",
            FieldConfig::new("Username", USERNAME).placeholder("Enter username"),
        ),
        FieldSpec::new(
            "emailField",
            FieldConfig::new("Email", EMAIL)
                .placeholder("Enter email")
                .required(),
        ),
        FieldSpec::new(
            "addressField",
            FieldConfig::new("Address", ADDRESS).textarea(),
        ),
        FieldSpec::new(
            "nicNumberField",
            FieldConfig::new("NIC Number", NIC_NUMBER).required(),
        ),
        FieldSpec::new(
            "phoneNumberField",
            FieldConfig::new("Phone Number", PHONE_NUMBER),
        ),
        FieldSpec::new(
            "dateOfBirthField",
            FieldConfig::new("Date of Birth", DATE_OF_BIRTH).required(),
        ),
    ]
}

impl FormModel for StudentDto {
    fn form_values(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            (
                ID,
                FieldValue::text(self.id.as_ref().map(StudentId::as_str)),
            ),
            (FIRST_NAME, FieldValue::text(self.first_name.as_deref())),
            (LAST_NAME, FieldValue::text(self.last_name.as_deref())),
            (USERNAME, FieldValue::text(self.username.as_deref())),
            (EMAIL, FieldValue::text(self.email.as_deref())),
            (ADDRESS, FieldValue::text(self.address.as_deref())),
            (DATE_OF_BIRTH, FieldValue::date(self.date_of_birth)),
            (PHONE_NUMBER, FieldValue::text(self.phone_number.as_deref())),
            (NIC_NUMBER, FieldValue::text(self.nic_number.as_deref())),
        ]
    }

    fn from_form(form: &FormGroup) -> Self {
        let text = |name: &str| {
            form.get(name)
                .and_then(|control| control.value().as_text())
                .map(str::to_string)
        };
        Self {
            id: text(ID).and_then(|id| StudentId::new(id).ok()),
            first_name: text(FIRST_NAME),
            last_name: text(LAST_NAME),
            username: text(USERNAME),
            email: text(EMAIL),
            address: text(ADDRESS),
            date_of_birth: form
                .get(DATE_OF_BIRTH)
                .and_then(|control| control.value().as_date()),
            phone_number: text(PHONE_NUMBER),
            nic_number: text(NIC_NUMBER),
            image_url: None,
            sys_deactivated: None,
        }
    }
}

/// Text fields posted by the student dialog.
///
/// Length bounds only guard the request size; business rules live in the form.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentFormInput {
    #[validate(length(max = 64))]
    pub id: Option<String>,
    #[validate(length(max = 128))]
    pub first_name: Option<String>,
    #[validate(length(max = 128))]
    pub last_name: Option<String>,
    #[validate(length(max = 128))]
    pub username: Option<String>,
    #[validate(length(max = 256))]
    pub email: Option<String>,
    #[validate(length(max = 1024))]
    pub address: Option<String>,
    pub date_of_birth: Option<String>,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
    #[validate(length(max = 32))]
    pub nic_number: Option<String>,
}

impl StudentFormInput {
    /// Identifier carried by the posted form, if any.
    pub fn student_id(&self) -> Option<StudentId> {
        self.id.clone().and_then(|id| StudentId::new(id).ok())
    }

    /// Validates the input and converts it into control values.
    pub fn into_values(self) -> Result<Vec<(&'static str, FieldValue)>, FormError> {
        self.validate()?;

        let date_of_birth = match self.date_of_birth.as_deref().map(parse_birth_date) {
            None | Some(Err(TypeConstraintError::EmptyString)) => FieldValue::Empty,
            Some(Ok(date)) => FieldValue::Date(date),
            Some(Err(err)) => return Err(FormError::InvalidDate(err.to_string())),
        };

        Ok(vec![
            (ID, FieldValue::text(self.id)),
            (FIRST_NAME, FieldValue::text(self.first_name)),
            (LAST_NAME, FieldValue::text(self.last_name)),
            (USERNAME, FieldValue::text(self.username)),
            (EMAIL, FieldValue::text(self.email)),
            (ADDRESS, FieldValue::text(self.address)),
            (DATE_OF_BIRTH, date_of_birth),
            (PHONE_NUMBER, FieldValue::text(self.phone_number)),
            (NIC_NUMBER, FieldValue::text(self.nic_number)),
        ])
    }
}
