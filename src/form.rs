//! Profile form model.
//!
//! The form keeps the in-progress field values and turns them into a
//! `UserProfile` on submit. It never clears itself: the controller owns a
//! reset token, and whenever the form sees a different token it starts over
//! with empty fields.

use serde::Serialize;

use crate::error::FormError;
use crate::schools::model::UserProfile;

/// The fields of a `UserProfile`, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    Age,
    Level,
    Neighborhood,
    BusLines,
    Skills,
    Likes,
    Dislikes,
    Sources,
}

impl ProfileField {
    pub const ALL: [ProfileField; 8] = [
        ProfileField::Age,
        ProfileField::Level,
        ProfileField::Neighborhood,
        ProfileField::BusLines,
        ProfileField::Skills,
        ProfileField::Likes,
        ProfileField::Dislikes,
        ProfileField::Sources,
    ];

    /// Wire key, matching the `UserProfile` JSON field.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Level => "level",
            Self::Neighborhood => "neighborhood",
            Self::BusLines => "busLines",
            Self::Skills => "skills",
            Self::Likes => "likes",
            Self::Dislikes => "dislikes",
            Self::Sources => "sources",
        }
    }

    /// Spanish label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Age => "Edad",
            Self::Level => "Nivel educativo",
            Self::Neighborhood => "Barrio",
            Self::BusLines => "Líneas de colectivo que tenés cerca",
            Self::Skills => "Habilidades",
            Self::Likes => "Qué te gusta",
            Self::Dislikes => "Qué no te gusta",
            Self::Sources => "Dónde buscás información",
        }
    }

    /// Read this field from a profile.
    pub fn value_in<'a>(&self, profile: &'a UserProfile) -> &'a str {
        match self {
            Self::Age => &profile.age,
            Self::Level => &profile.level,
            Self::Neighborhood => &profile.neighborhood,
            Self::BusLines => &profile.bus_lines,
            Self::Skills => &profile.skills,
            Self::Likes => &profile.likes,
            Self::Dislikes => &profile.dislikes,
            Self::Sources => &profile.sources,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl std::str::FromStr for ProfileField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

/// Editable form state, keyed by the controller's reset token.
#[derive(Debug, Clone)]
pub struct ProfileForm {
    token: u64,
    values: [String; 8],
    disabled: bool,
}

impl ProfileForm {
    pub fn new(token: u64) -> Self {
        Self {
            token,
            values: Default::default(),
            disabled: false,
        }
    }

    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Disable input while a search is in flight.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Adopt the controller's token. Returns true if the form was
    /// reinitialized because the token changed.
    pub fn sync_token(&mut self, token: u64) -> bool {
        if token == self.token {
            return false;
        }
        *self = Self::new(token);
        true
    }

    pub fn get(&self, field: ProfileField) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) -> Result<(), FormError> {
        if self.disabled {
            return Err(FormError::Disabled);
        }
        self.values[field.index()] = value.into();
        Ok(())
    }

    /// Build the profile to hand to the controller.
    pub fn submit(&self) -> Result<UserProfile, FormError> {
        if self.disabled {
            return Err(FormError::Disabled);
        }
        let value = |field: ProfileField| self.get(field).trim().to_string();
        Ok(UserProfile {
            age: value(ProfileField::Age),
            level: value(ProfileField::Level),
            neighborhood: value(ProfileField::Neighborhood),
            bus_lines: value(ProfileField::BusLines),
            skills: value(ProfileField::Skills),
            likes: value(ProfileField::Likes),
            dislikes: value(ProfileField::Dislikes),
            sources: value(ProfileField::Sources),
        })
    }
}
