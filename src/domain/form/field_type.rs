use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Semantic type inferred for a single submitted field value.
///
/// Serialized as its lowercase tag (`"date"`, `"phone"`, `"email"`, `"text"`), which is
/// also the representation stored in template records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Date,
    Phone,
    Email,
    Text,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Date => "date",
            FieldType::Phone => "phone",
            FieldType::Email => "email",
            FieldType::Text => "text",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field type tag '{0}'")]
pub struct UnknownFieldType(pub String);

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(FieldType::Date),
            "phone" => Ok(FieldType::Phone),
            "email" => Ok(FieldType::Email),
            "text" => Ok(FieldType::Text),
            other => Err(UnknownFieldType(other.to_string())),
        }
    }
}

/// Field name -> inferred type for one request.
///
/// A `BTreeMap` keeps the echoed response stable; matching only uses set semantics.
pub type TypedForm = BTreeMap<String, FieldType>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_back_to_the_same_variant() {
        for t in [FieldType::Date, FieldType::Phone, FieldType::Email, FieldType::Text] {
            assert_eq!(t.as_str().parse::<FieldType>(), Ok(t));
        }
    }

    #[test]
    fn unknown_tags_are_rejected() {
        assert_eq!(
            "Date".parse::<FieldType>(),
            Err(UnknownFieldType("Date".to_string()))
        );
        assert!("".parse::<FieldType>().is_err());
    }

    #[test]
    fn serializes_as_lowercase_tag() {
        let json = serde_json::to_string(&FieldType::Phone).unwrap();
        assert_eq!(json, "\"phone\"");
    }
}
