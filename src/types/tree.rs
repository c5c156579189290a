//! Family tree view

use serde::{Deserialize, Serialize};

use super::{Person, Relationship};

/// Fixed-shape three-generation view around a focal person
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyTree {
    pub person: Person,
    pub parents: Vec<Person>,
    pub grandparents: Vec<Person>,
    pub siblings: Vec<Person>,
    /// Every edge touching the focal person, deduplicated but not visibility-filtered
    pub relationships: Vec<Relationship>,
}

impl FamilyTree {
    /// Create a tree holding only the focal person
    pub fn new(person: Person) -> Self {
        Self {
            person,
            parents: Vec::new(),
            grandparents: Vec::new(),
            siblings: Vec::new(),
            relationships: Vec::new(),
        }
    }
}
