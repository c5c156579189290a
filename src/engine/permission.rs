//! Visibility and edit predicates
//!
//! Every rule short-circuits through [`is_super_admin`] first. Two contracts
//! are exposed on top of the predicate: the `authorize_*` functions fail
//! closed with `PermissionDenied`, while [`filter_visible`] silently drops
//! what the user may not see.

use log::warn;
use rayon::prelude::*;

use crate::error::{GraphError, GraphResult};
use crate::store::RecordStore;
use crate::types::{Person, PersonId, Role, User};

/// Above this many candidates, visibility is evaluated in parallel
const PARALLEL_FILTER_THRESHOLD: usize = 256;

/// Global admin bypass
pub fn is_super_admin(user: &User) -> bool {
    user.role == Role::SuperAdmin
}

/// Whether `user` may see `person`
///
/// First match wins: admin, public person, creator, linked self, then any
/// stored edge between the linked person and `person` (either direction, any
/// type).
pub fn can_view(store: &dyn RecordStore, user: &User, person: &Person) -> GraphResult<bool> {
    if is_super_admin(user) || person.is_public {
        return Ok(true);
    }

    if person.created_by == Some(user.id) {
        return Ok(true);
    }

    let Some(linked) = user.linked_person_id else {
        return Ok(false);
    };

    if linked == person.id {
        return Ok(true);
    }

    Ok(store
        .edges_touching(linked)?
        .iter()
        .any(|edge| edge.joins(linked, person.id)))
}

/// Admin, or the person the user is linked to
///
/// Creating a person does not grant edit rights on it.
pub fn can_edit(user: &User, person_id: PersonId) -> bool {
    is_super_admin(user) || user.linked_person_id == Some(person_id)
}

/// Admins and validated users may add persons; pending users may not
pub fn can_add_person(user: &User) -> bool {
    is_super_admin(user) || user.role == Role::ValidatedUser
}

pub fn authorize_view(store: &dyn RecordStore, user: &User, person: &Person) -> GraphResult<()> {
    if can_view(store, user, person)? {
        Ok(())
    } else {
        warn!("User {} denied view of person {}", user.id, person.id);
        Err(GraphError::PermissionDenied(
            "you do not have permission to view this person".to_string(),
        ))
    }
}

pub fn authorize_edit(user: &User, person_id: PersonId) -> GraphResult<()> {
    if can_edit(user, person_id) {
        Ok(())
    } else {
        Err(GraphError::PermissionDenied(
            "you do not have permission to edit this person".to_string(),
        ))
    }
}

pub fn authorize_add_person(user: &User) -> GraphResult<()> {
    if can_add_person(user) {
        Ok(())
    } else {
        Err(GraphError::PermissionDenied(
            "you do not have permission to add a person".to_string(),
        ))
    }
}

pub fn authorize_admin(user: &User) -> GraphResult<()> {
    if is_super_admin(user) {
        Ok(())
    } else {
        Err(GraphError::PermissionDenied(
            "restricted to administrators".to_string(),
        ))
    }
}

/// Keep only the persons `user` may see, in input order
pub fn filter_visible(
    store: &dyn RecordStore,
    user: &User,
    persons: Vec<Person>,
) -> GraphResult<Vec<Person>> {
    if is_super_admin(user) {
        return Ok(persons);
    }

    let keep = |p: Person| -> GraphResult<Option<Person>> {
        Ok(can_view(store, user, &p)?.then_some(p))
    };

    let kept: Vec<Option<Person>> = if persons.len() > PARALLEL_FILTER_THRESHOLD {
        persons.into_par_iter().map(keep).collect::<GraphResult<_>>()?
    } else {
        persons.into_iter().map(keep).collect::<GraphResult<_>>()?
    };

    Ok(kept.into_iter().flatten().collect())
}
