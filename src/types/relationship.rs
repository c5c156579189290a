//! Relationship (edge) types for the family graph

use serde::{Deserialize, Serialize};

use super::{is_zero, PersonId, RelationshipId, UserId};

/// Closed set of family relationship types
///
/// An edge `(person1, person2, T)` reads "person2 is the T of person1".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    Parent,
    Child,
    Sibling,
    Spouse,
    Grandparent,
    Grandchild,
    UncleAunt,
    NephewNiece,
    Cousin,
}

impl RelationshipType {
    /// All relationship types
    pub const ALL: [RelationshipType; 9] = [
        RelationshipType::Parent,
        RelationshipType::Child,
        RelationshipType::Sibling,
        RelationshipType::Spouse,
        RelationshipType::Grandparent,
        RelationshipType::Grandchild,
        RelationshipType::UncleAunt,
        RelationshipType::NephewNiece,
        RelationshipType::Cousin,
    ];

    /// The type of the edge pointing the other way
    pub fn reciprocal(self) -> Self {
        match self {
            RelationshipType::Parent => RelationshipType::Child,
            RelationshipType::Child => RelationshipType::Parent,
            RelationshipType::Grandparent => RelationshipType::Grandchild,
            RelationshipType::Grandchild => RelationshipType::Grandparent,
            RelationshipType::UncleAunt => RelationshipType::NephewNiece,
            RelationshipType::NephewNiece => RelationshipType::UncleAunt,
            RelationshipType::Sibling => RelationshipType::Sibling,
            RelationshipType::Spouse => RelationshipType::Spouse,
            RelationshipType::Cousin => RelationshipType::Cousin,
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationshipType::Parent => write!(f, "PARENT"),
            RelationshipType::Child => write!(f, "CHILD"),
            RelationshipType::Sibling => write!(f, "SIBLING"),
            RelationshipType::Spouse => write!(f, "SPOUSE"),
            RelationshipType::Grandparent => write!(f, "GRANDPARENT"),
            RelationshipType::Grandchild => write!(f, "GRANDCHILD"),
            RelationshipType::UncleAunt => write!(f, "UNCLE_AUNT"),
            RelationshipType::NephewNiece => write!(f, "NEPHEW_NIECE"),
            RelationshipType::Cousin => write!(f, "COUSIN"),
        }
    }
}

/// Maternal/paternal tag, informational only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Maternal,
    Paternal,
    #[default]
    Unknown,
}

/// Directed, typed edge between two persons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    #[serde(rename = "person1Id")]
    pub person1_id: PersonId,
    #[serde(rename = "person2Id")]
    pub person2_id: PersonId,
    #[serde(rename = "relationshipType")]
    pub relationship_type: RelationshipType,
    #[serde(default)]
    pub side: Side,
    #[serde(rename = "createdBy", default)]
    pub created_by: Option<UserId>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "is_zero")]
    pub created_at: u64,
}

impl Relationship {
    /// Create a new edge with a fresh id and unknown side
    pub fn new(
        person1_id: PersonId,
        person2_id: PersonId,
        relationship_type: RelationshipType,
    ) -> Self {
        Self {
            id: RelationshipId::new_v4(),
            person1_id,
            person2_id,
            relationship_type,
            side: Side::Unknown,
            created_by: None,
            created_at: 0,
        }
    }

    /// Whether either endpoint is `person_id`
    pub fn touches(&self, person_id: PersonId) -> bool {
        self.person1_id == person_id || self.person2_id == person_id
    }

    /// Same ordered `(person1, person2, type)` triple, ignoring id and metadata
    pub fn same_triple(&self, other: &Relationship) -> bool {
        self.person1_id == other.person1_id
            && self.person2_id == other.person2_id
            && self.relationship_type == other.relationship_type
    }

    /// The endpoint that is not `person_id`
    pub fn other_end(&self, person_id: PersonId) -> PersonId {
        if self.person1_id == person_id {
            self.person2_id
        } else {
            self.person1_id
        }
    }

    /// Edge joining `a` and `b` in either ordered position
    pub fn joins(&self, a: PersonId, b: PersonId) -> bool {
        (self.person1_id == a && self.person2_id == b)
            || (self.person1_id == b && self.person2_id == a)
    }

    /// The same edge seen from person2
    pub fn reciprocal(&self) -> Self {
        Self {
            id: RelationshipId::new_v4(),
            person1_id: self.person2_id,
            person2_id: self.person1_id,
            relationship_type: self.relationship_type.reciprocal(),
            side: self.side,
            created_by: self.created_by,
            created_at: self.created_at,
        }
    }
}
