//! Person records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{is_zero, PersonId, UserId};

/// A person in the family graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    #[serde(rename = "givenName")]
    pub given_name: String,
    #[serde(rename = "familyName")]
    pub family_name: String,
    #[serde(rename = "birthDate", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "birthPlace", default, skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,
    #[serde(rename = "isPublic", default)]
    pub is_public: bool,
    #[serde(rename = "createdBy", default)]
    pub created_by: Option<UserId>,
    /// Set only when an admin promotes the person to public
    #[serde(rename = "validatedBy", default)]
    pub validated_by: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "is_zero")]
    pub created_at: u64,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "is_zero")]
    pub updated_at: u64,
}

impl Person {
    /// Create a new private person with a fresh id
    pub fn new(given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            id: PersonId::new_v4(),
            given_name: given_name.into(),
            family_name: family_name.into(),
            birth_date: None,
            birth_place: None,
            is_public: false,
            created_by: None,
            validated_by: None,
            metadata: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Mark the person as public
    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    /// Set the creating user
    pub fn created_by(mut self, user_id: UserId) -> Self {
        self.created_by = Some(user_id);
        self
    }

    /// "Given Family"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

/// Fields accepted when creating a person
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonDraft {
    #[serde(rename = "givenName")]
    pub given_name: String,
    #[serde(rename = "familyName")]
    pub family_name: String,
    #[serde(rename = "birthDate", default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "birthPlace", default)]
    pub birth_place: Option<String>,
    #[serde(rename = "isPublic", default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub metadata: Option<String>,
}

impl PersonDraft {
    pub fn new(given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            given_name: given_name.into(),
            family_name: family_name.into(),
            birth_date: None,
            birth_place: None,
            is_public: None,
            metadata: None,
        }
    }
}

/// Field-level partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonPatch {
    #[serde(rename = "givenName", default)]
    pub given_name: Option<String>,
    #[serde(rename = "familyName", default)]
    pub family_name: Option<String>,
    #[serde(rename = "birthDate", default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "birthPlace", default)]
    pub birth_place: Option<String>,
    #[serde(default)]
    pub metadata: Option<String>,
}

impl PersonPatch {
    /// Apply every provided field to `person`
    pub fn apply_to(self, person: &mut Person) {
        if let Some(given_name) = self.given_name {
            person.given_name = given_name;
        }
        if let Some(family_name) = self.family_name {
            person.family_name = family_name;
        }
        if let Some(birth_date) = self.birth_date {
            person.birth_date = Some(birth_date);
        }
        if let Some(birth_place) = self.birth_place {
            person.birth_place = Some(birth_place);
        }
        if let Some(metadata) = self.metadata {
            person.metadata = Some(metadata);
        }
    }
}
