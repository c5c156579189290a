//! Three-generation family tree assembly

use std::collections::{HashMap, HashSet};

use log::debug;

use super::{permission, FamilyGraph};
use crate::error::GraphResult;
use crate::types::{FamilyTree, Person, PersonId, Relationship, RelationshipType, UserId};

/// Assemble parents, grandparents and siblings around `person_id`
///
/// Named slots only hold persons the user may see. Grandparents are reached
/// through visible parents only. The flat `relationships` list is every edge
/// touching the focal person and is not filtered per edge.
pub fn family_tree(
    graph: &FamilyGraph,
    person_id: PersonId,
    user_id: UserId,
) -> GraphResult<FamilyTree> {
    let store = graph.store();
    let user = graph.acting_user(user_id)?;
    let person = graph.require_person(person_id)?;
    permission::authorize_view(store, &user, &person)?;

    let edges = dedup_edges(store.edges_touching(person_id)?);

    // One batch fetch for every endpoint of the focal edges
    let mut referenced = vec![person_id];
    for edge in &edges {
        push_unique(&mut referenced, edge.person1_id);
        push_unique(&mut referenced, edge.person2_id);
    }
    let mut people: HashMap<PersonId, Person> = store
        .persons_by_ids(&referenced)?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut parent_ids = Vec::new();
    let mut sibling_ids = Vec::new();
    for edge in &edges {
        match edge.relationship_type {
            RelationshipType::Parent if edge.person1_id == person_id => {
                push_unique(&mut parent_ids, edge.person2_id)
            }
            RelationshipType::Sibling => push_unique(&mut sibling_ids, edge.other_end(person_id)),
            _ => {}
        }
    }

    let parents = permission::filter_visible(store, &user, resolve(&parent_ids, &people))?;
    let siblings = permission::filter_visible(store, &user, resolve(&sibling_ids, &people))?;

    let mut grandparent_ids = Vec::new();
    for parent in &parents {
        for edge in store.edges_from(parent.id, RelationshipType::Parent)? {
            if edge.person2_id != person_id {
                push_unique(&mut grandparent_ids, edge.person2_id);
            }
        }
    }

    let missing: Vec<PersonId> = grandparent_ids
        .iter()
        .filter(|id| !people.contains_key(id))
        .copied()
        .collect();
    if !missing.is_empty() {
        people.extend(store.persons_by_ids(&missing)?.into_iter().map(|p| (p.id, p)));
    }
    let grandparents =
        permission::filter_visible(store, &user, resolve(&grandparent_ids, &people))?;

    debug!(
        "Assembled tree for {}: {} parents, {} grandparents, {} siblings, {} edges",
        person_id,
        parents.len(),
        grandparents.len(),
        siblings.len(),
        edges.len()
    );

    Ok(FamilyTree {
        person,
        parents,
        grandparents,
        siblings,
        relationships: edges,
    })
}

fn push_unique(ids: &mut Vec<PersonId>, id: PersonId) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

/// Drop repeated edge ids, keeping the first occurrence
fn dedup_edges(edges: Vec<Relationship>) -> Vec<Relationship> {
    let mut seen = HashSet::new();
    edges.into_iter().filter(|e| seen.insert(e.id)).collect()
}

/// Look up `ids` in order, skipping ids with no stored person
fn resolve(ids: &[PersonId], people: &HashMap<PersonId, Person>) -> Vec<Person> {
    ids.iter().filter_map(|id| people.get(id).cloned()).collect()
}
