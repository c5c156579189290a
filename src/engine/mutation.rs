//! Person and relationship writes

use log::info;

use super::{permission, FamilyGraph};
use crate::error::{GraphError, GraphResult};
use crate::types::{
    Person, PersonDraft, PersonId, PersonPatch, Relationship, RelationshipType, Side, UserId,
};
use crate::utils::current_timestamp;

/// Fetch a person the user is allowed to see
pub fn get_person(
    graph: &FamilyGraph,
    person_id: PersonId,
    user_id: UserId,
) -> GraphResult<Person> {
    let user = graph.acting_user(user_id)?;
    let person = graph.require_person(person_id)?;
    permission::authorize_view(graph.store(), &user, &person)?;
    Ok(person)
}

/// Create a person owned by the acting user; private unless asked otherwise
pub fn create_person(
    graph: &FamilyGraph,
    draft: PersonDraft,
    user_id: UserId,
) -> GraphResult<Person> {
    let user = graph.acting_user(user_id)?;
    permission::authorize_add_person(&user)?;

    let given_name = draft.given_name.trim();
    let family_name = draft.family_name.trim();
    if given_name.is_empty() || family_name.is_empty() {
        return Err(GraphError::Validation(
            "given name and family name are required".to_string(),
        ));
    }

    let now = current_timestamp();
    let mut person = Person::new(given_name, family_name).created_by(user.id);
    person.birth_date = draft.birth_date;
    person.birth_place = draft.birth_place;
    person.is_public = draft.is_public.unwrap_or(false);
    person.metadata = draft.metadata;
    person.created_at = now;
    person.updated_at = now;

    let person = graph.store().save_person(person)?;
    info!("Person {} created by {}", person.id, user.email);
    Ok(person)
}

/// Apply a partial update; only admins and the linked user may edit
pub fn update_person(
    graph: &FamilyGraph,
    person_id: PersonId,
    patch: PersonPatch,
    user_id: UserId,
) -> GraphResult<Person> {
    let user = graph.acting_user(user_id)?;
    permission::authorize_edit(&user, person_id)?;
    let mut person = graph.require_person(person_id)?;

    if matches!(&patch.given_name, Some(name) if name.trim().is_empty())
        || matches!(&patch.family_name, Some(name) if name.trim().is_empty())
    {
        return Err(GraphError::Validation("names cannot be blank".to_string()));
    }

    patch.apply_to(&mut person);
    person.updated_at = current_timestamp();

    let person = graph.store().save_person(person)?;
    info!("Person {} updated by {}", person.id, user.email);
    Ok(person)
}

/// Validate and insert a new edge `(person1, person2, relationship_type)`
///
/// Checks run in a fixed order: self-loop, both endpoints exist, the user may
/// edit `person1`, no identical edge exists. The reverse pair is not treated
/// as a duplicate. The store repeats the duplicate check under its write
/// lock, so concurrent identical calls insert one edge.
pub fn add_relationship(
    graph: &FamilyGraph,
    person1_id: PersonId,
    person2_id: PersonId,
    relationship_type: RelationshipType,
    user_id: UserId,
) -> GraphResult<Relationship> {
    if person1_id == person2_id {
        return Err(GraphError::InvalidRelationship(
            "self-relationship is not allowed".to_string(),
        ));
    }

    let store = graph.store();
    if store.person(person1_id)?.is_none() {
        return Err(GraphError::PersonNotFound(format!("person1 {}", person1_id)));
    }
    if store.person(person2_id)?.is_none() {
        return Err(GraphError::PersonNotFound(format!("person2 {}", person2_id)));
    }

    let user = graph.acting_user(user_id)?;
    permission::authorize_edit(&user, person1_id)?;

    if store
        .find_edge(person1_id, person2_id, relationship_type)?
        .is_some()
    {
        return Err(GraphError::InvalidRelationship(
            "relationship already exists".to_string(),
        ));
    }

    let mut edge = Relationship::new(person1_id, person2_id, relationship_type);
    edge.side = Side::Unknown;
    edge.created_by = Some(user.id);
    edge.created_at = current_timestamp();

    let mut batch = vec![edge.clone()];
    if graph.settings().reciprocal_edges {
        let reciprocal = edge.reciprocal();
        if store
            .find_edge(
                reciprocal.person1_id,
                reciprocal.person2_id,
                reciprocal.relationship_type,
            )?
            .is_none()
        {
            batch.push(reciprocal);
        }
    }

    let inserted = store.insert_relationships(batch)?;
    info!(
        "Relationship {} {} -> {} added by {} ({} edges written)",
        relationship_type,
        person1_id,
        person2_id,
        user.email,
        inserted.len()
    );

    Ok(inserted.into_iter().next().unwrap_or(edge))
}
