use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::StudentId;

/// Logical entity name used to resolve student endpoints.
pub const STUDENT_ENTITY: &str = "student";

/// Student record exchanged with the REST backend.
///
/// Every field is optional on the type; required-ness is a form concern.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentDto {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_id::deserialize"
    )]
    pub id: Option<StudentId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    #[serde(default, with = "birth_date")]
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub nic_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Soft-delete marker understood by the backend.
    #[serde(
        rename = "sys_Deactivated",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sys_deactivated: Option<bool>,
}

impl StudentDto {
    /// Returns a copy of the record flagged for soft deletion.
    #[must_use]
    pub fn deactivated(&self) -> Self {
        Self {
            sys_deactivated: Some(true),
            ..self.clone()
        }
    }

    /// First name or an empty string, for display.
    pub fn first_name_or_default(&self) -> &str {
        self.first_name.as_deref().unwrap_or_default()
    }
}

/// Treats `""` and `null` identifiers as absent.
mod blank_id {
    use serde::{Deserialize, Deserializer};

    use crate::domain::types::StudentId;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<StudentId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|value| StudentId::new(value).ok()))
    }
}

/// `YYYY-MM-DD` on the way out, lenient about date-time strings on the way in.
mod birth_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::domain::types::{DATE_FORMAT, parse_birth_date};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_birth_date(&raw).map(Some).map_err(D::Error::custom),
            None => Ok(None),
        }
    }
}
