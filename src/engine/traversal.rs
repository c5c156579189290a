//! Bounded ancestor and descendant walks

use std::collections::HashSet;

use log::debug;

use super::{permission, FamilyGraph};
use crate::error::GraphResult;
use crate::types::{Person, PersonId, Relationship, RelationshipType, UserId};

/// Which way a walk follows the generational edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow PARENT edges out of each person
    Ancestors,
    /// Follow CHILD edges out of each person
    Descendants,
}

impl Direction {
    pub fn edge_type(self) -> RelationshipType {
        match self {
            Direction::Ancestors => RelationshipType::Parent,
            Direction::Descendants => RelationshipType::Child,
        }
    }
}

/// Pending edges of one expanded person
struct Frame {
    edges: std::vec::IntoIter<Relationship>,
    /// Levels still allowed below the persons these edges lead to
    remaining: i32,
}

/// Depth-first, pre-order walk from `person_id`
///
/// Each person is expanded at most once per call. A person the user may not
/// see is left out together with everything beyond it on that branch.
/// A depth of zero or less returns nothing without touching the store.
pub fn walk(
    graph: &FamilyGraph,
    person_id: PersonId,
    user_id: UserId,
    max_depth: Option<i32>,
    direction: Direction,
) -> GraphResult<Vec<Person>> {
    let depth = graph.settings().effective_depth(max_depth);
    if depth <= 0 {
        return Ok(Vec::new());
    }

    let store = graph.store();
    let user = graph.acting_user(user_id)?;
    let root = graph.require_person(person_id)?;
    permission::authorize_view(store, &user, &root)?;

    let edge_type = direction.edge_type();
    let mut visited: HashSet<PersonId> = HashSet::new();
    visited.insert(person_id);

    let mut result = Vec::new();
    let mut stack = vec![Frame {
        edges: store.edges_from(person_id, edge_type)?.into_iter(),
        remaining: depth - 1,
    }];

    loop {
        let next = match stack.last_mut() {
            Some(frame) => frame.edges.next().map(|edge| (edge, frame.remaining)),
            None => break,
        };

        let Some((edge, remaining)) = next else {
            stack.pop();
            continue;
        };

        let target = edge.person2_id;
        if !visited.insert(target) {
            continue;
        }

        let Some(candidate) = store.person(target)? else {
            debug!("Edge {} points at missing person {}", edge.id, target);
            continue;
        };

        if !permission::can_view(store, &user, &candidate)? {
            continue;
        }

        result.push(candidate);
        if remaining > 0 {
            stack.push(Frame {
                edges: store.edges_from(target, edge_type)?.into_iter(),
                remaining: remaining - 1,
            });
        }
    }

    debug!(
        "{:?} walk from {} (depth {}) returned {} persons",
        direction,
        person_id,
        depth,
        result.len()
    );

    Ok(result)
}
