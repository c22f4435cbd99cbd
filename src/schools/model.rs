//! Profile and school records exchanged with the recommendation client.

use serde::{Deserialize, Serialize};

/// What the student told us about themselves.
///
/// Every field is free text; the form does not enforce formats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub age: String,
    pub level: String,
    pub neighborhood: String,
    pub bus_lines: String,
    pub skills: String,
    pub likes: String,
    pub dislikes: String,
    pub sources: String,
}

/// A recommended school, as returned by the recommender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub specialties: Vec<String>,
}

impl School {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        reason: impl Into<String>,
        specialties: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            reason: reason.into(),
            specialties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_uses_camel_case_keys() {
        let profile = UserProfile {
            bus_lines: "10,22".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["busLines"], "10,22");
        assert!(json.get("bus_lines").is_none());
    }

    #[test]
    fn school_tolerates_missing_optional_fields() {
        let school: School = serde_json::from_str(r#"{"name": "Tec A"}"#).unwrap();
        assert_eq!(school.name, "Tec A");
        assert!(school.specialties.is_empty());
        assert!(school.reason.is_empty());
    }
}
