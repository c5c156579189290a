//! In-memory record store with optional JSONL persistence

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RecordStore;
use crate::error::{GraphError, GraphResult};
use crate::types::{
    PendingAddition, Person, PersonId, ProfileClaim, Relationship, RelationshipType, User, UserId,
};
use crate::utils::atomic_write;

/// One line of the store file
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Record {
    Person(Person),
    Relationship(Relationship),
    User(User),
    PendingAddition(PendingAddition),
    ProfileClaim(ProfileClaim),
}

/// Everything the store holds, in insertion order
#[derive(Debug, Clone, Default)]
struct Snapshot {
    persons: Vec<Person>,
    relationships: Vec<Relationship>,
    users: Vec<User>,
    pending_additions: Vec<PendingAddition>,
    profile_claims: Vec<ProfileClaim>,
}

impl Snapshot {
    fn push(&mut self, record: Record) {
        match record {
            Record::Person(p) => upsert(&mut self.persons, p, |p| p.id),
            Record::Relationship(r) => upsert(&mut self.relationships, r, |r| r.id),
            Record::User(u) => upsert(&mut self.users, u, |u| u.id),
            Record::PendingAddition(a) => upsert(&mut self.pending_additions, a, |a| a.id),
            Record::ProfileClaim(c) => upsert(&mut self.profile_claims, c, |c| c.id),
        }
    }

    fn has_edge(&self, edge: &Relationship) -> bool {
        self.relationships.iter().any(|r| r.same_triple(edge))
    }

    fn to_jsonl(&self) -> GraphResult<String> {
        let mut content = String::new();

        for person in &self.persons {
            content.push_str(&serde_json::to_string(&Record::Person(person.clone()))?);
            content.push('\n');
        }
        for edge in &self.relationships {
            content.push_str(&serde_json::to_string(&Record::Relationship(edge.clone()))?);
            content.push('\n');
        }
        for user in &self.users {
            content.push_str(&serde_json::to_string(&Record::User(user.clone()))?);
            content.push('\n');
        }
        for addition in &self.pending_additions {
            content.push_str(&serde_json::to_string(&Record::PendingAddition(
                addition.clone(),
            ))?);
            content.push('\n');
        }
        for claim in &self.profile_claims {
            content.push_str(&serde_json::to_string(&Record::ProfileClaim(claim.clone()))?);
            content.push('\n');
        }

        Ok(content)
    }
}

/// Replace the item with the same key, or append
fn upsert<T, K, F>(items: &mut Vec<T>, item: T, key: F)
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let k = key(&item);
    match items.iter_mut().find(|existing| key(existing) == k) {
        Some(slot) => *slot = item,
        None => items.push(item),
    }
}

/// Record store kept in memory, optionally mirrored to a JSONL file
///
/// Each gateway call takes the lock once. Mutations rewrite the whole file
/// while still holding the write lock.
pub struct MemoryStore {
    file_path: Option<PathBuf>,
    data: RwLock<Snapshot>,
}

impl MemoryStore {
    /// Create a volatile store
    pub fn new() -> Self {
        Self {
            file_path: None,
            data: RwLock::new(Snapshot::default()),
        }
    }

    /// Open a store backed by `path`, loading it if the file exists
    pub fn open<P: AsRef<Path>>(path: P) -> GraphResult<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = Self::load_from_file(&path)?;

        info!(
            "Loaded {} persons, {} relationships, {} users from {}",
            snapshot.persons.len(),
            snapshot.relationships.len(),
            snapshot.users.len(),
            path.display()
        );

        Ok(Self {
            file_path: Some(path),
            data: RwLock::new(snapshot),
        })
    }

    fn load_from_file(path: &Path) -> GraphResult<Snapshot> {
        let mut snapshot = Snapshot::default();
        if !path.exists() {
            return Ok(snapshot);
        }

        let content = fs::read_to_string(path)?;
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<Record>(line) {
                Ok(record) => snapshot.push(record),
                Err(e) => warn!(
                    "Skipping malformed record at {}:{}: {}",
                    path.display(),
                    line_no + 1,
                    e
                ),
            }
        }

        Ok(snapshot)
    }

    /// Persist to file (expects caller to hold the write lock)
    fn persist(&self, snapshot: &Snapshot) -> GraphResult<()> {
        if let Some(path) = &self.file_path {
            atomic_write(path, &snapshot.to_jsonl()?)?;
        }
        Ok(())
    }

    /// Apply `f` under the write lock and persist the result
    ///
    /// `f` must check before it writes: an `Err` from it leaves the snapshot
    /// untouched. File-backed stores apply `f` to a copy that replaces the
    /// live snapshot only once the file write succeeded.
    fn mutate<T>(&self, f: impl FnOnce(&mut Snapshot) -> GraphResult<T>) -> GraphResult<T> {
        let mut data = self.data.write();
        if self.file_path.is_none() {
            return f(&mut data);
        }

        let mut next = data.clone();
        let out = f(&mut next)?;
        self.persist(&next)?;
        *data = next;
        Ok(out)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn person(&self, id: PersonId) -> GraphResult<Option<Person>> {
        Ok(self.data.read().persons.iter().find(|p| p.id == id).cloned())
    }

    fn persons_by_ids(&self, ids: &[PersonId]) -> GraphResult<Vec<Person>> {
        let data = self.data.read();
        Ok(data
            .persons
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    fn save_person(&self, person: Person) -> GraphResult<Person> {
        self.mutate(|data| {
            data.push(Record::Person(person.clone()));
            Ok(person)
        })
    }

    fn edges_touching(&self, id: PersonId) -> GraphResult<Vec<Relationship>> {
        let data = self.data.read();
        Ok(data
            .relationships
            .iter()
            .filter(|r| r.touches(id))
            .cloned()
            .collect())
    }

    fn edges_from(
        &self,
        id: PersonId,
        relationship_type: RelationshipType,
    ) -> GraphResult<Vec<Relationship>> {
        let data = self.data.read();
        Ok(data
            .relationships
            .iter()
            .filter(|r| r.person1_id == id && r.relationship_type == relationship_type)
            .cloned()
            .collect())
    }

    fn find_edge(
        &self,
        person1_id: PersonId,
        person2_id: PersonId,
        relationship_type: RelationshipType,
    ) -> GraphResult<Option<Relationship>> {
        let data = self.data.read();
        Ok(data
            .relationships
            .iter()
            .find(|r| {
                r.person1_id == person1_id
                    && r.person2_id == person2_id
                    && r.relationship_type == relationship_type
            })
            .cloned())
    }

    fn insert_relationships(&self, edges: Vec<Relationship>) -> GraphResult<Vec<Relationship>> {
        self.mutate(|data| {
            for (i, edge) in edges.iter().enumerate() {
                if data.has_edge(edge) || edges[..i].iter().any(|e| e.same_triple(edge)) {
                    return Err(GraphError::InvalidRelationship(
                        "relationship already exists".to_string(),
                    ));
                }
            }
            for edge in &edges {
                data.push(Record::Relationship(edge.clone()));
            }
            Ok(edges)
        })
    }

    fn user(&self, id: UserId) -> GraphResult<Option<User>> {
        Ok(self.data.read().users.iter().find(|u| u.id == id).cloned())
    }

    fn user_by_email(&self, email: &str) -> GraphResult<Option<User>> {
        Ok(self
            .data
            .read()
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn users(&self) -> GraphResult<Vec<User>> {
        Ok(self.data.read().users.clone())
    }

    fn save_user(&self, user: User) -> GraphResult<User> {
        self.mutate(|data| {
            data.push(Record::User(user.clone()));
            Ok(user)
        })
    }

    fn pending_addition(&self, id: Uuid) -> GraphResult<Option<PendingAddition>> {
        Ok(self
            .data
            .read()
            .pending_additions
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    fn pending_additions(&self) -> GraphResult<Vec<PendingAddition>> {
        Ok(self.data.read().pending_additions.clone())
    }

    fn save_pending_addition(&self, addition: PendingAddition) -> GraphResult<PendingAddition> {
        self.mutate(|data| {
            data.push(Record::PendingAddition(addition.clone()));
            Ok(addition)
        })
    }

    fn insert_pending_addition(
        &self,
        addition: PendingAddition,
    ) -> GraphResult<PendingAddition> {
        self.mutate(|data| {
            let duplicate = data.pending_additions.iter().any(|a| {
                a.is_pending()
                    && a.person_id == addition.person_id
                    && a.requested_by == addition.requested_by
            });
            if duplicate {
                return Err(GraphError::Validation(
                    "a validation request is already pending for this person".to_string(),
                ));
            }
            data.push(Record::PendingAddition(addition.clone()));
            Ok(addition)
        })
    }

    fn profile_claim(&self, id: Uuid) -> GraphResult<Option<ProfileClaim>> {
        Ok(self
            .data
            .read()
            .profile_claims
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    fn profile_claims(&self) -> GraphResult<Vec<ProfileClaim>> {
        Ok(self.data.read().profile_claims.clone())
    }

    fn save_profile_claim(&self, claim: ProfileClaim) -> GraphResult<ProfileClaim> {
        self.mutate(|data| {
            data.push(Record::ProfileClaim(claim.clone()));
            Ok(claim)
        })
    }

    fn insert_profile_claim(&self, claim: ProfileClaim) -> GraphResult<ProfileClaim> {
        self.mutate(|data| {
            let duplicate = data.profile_claims.iter().any(|c| {
                c.is_pending() && c.person_id == claim.person_id && c.user_id == claim.user_id
            });
            if duplicate {
                return Err(GraphError::Validation(
                    "a claim is already pending for this person".to_string(),
                ));
            }
            data.push(Record::ProfileClaim(claim.clone()));
            Ok(claim)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use tempfile::TempDir;

    #[test]
    fn test_save_person_replaces_by_id() {
        let store = MemoryStore::new();
        let mut person = store.save_person(Person::new("Ada", "Byron")).unwrap();

        person.family_name = "Lovelace".to_string();
        store.save_person(person.clone()).unwrap();

        let loaded = store.person(person.id).unwrap().unwrap();
        assert_eq!(loaded.family_name, "Lovelace");
        assert_eq!(store.persons_by_ids(&[person.id]).unwrap().len(), 1);
    }

    #[test]
    fn test_edge_lookups_respect_direction_and_type() {
        let store = MemoryStore::new();
        let child = store.save_person(Person::new("Child", "X")).unwrap();
        let parent = store.save_person(Person::new("Parent", "X")).unwrap();
        store
            .insert_relationships(vec![
                Relationship::new(child.id, parent.id, RelationshipType::Parent),
                Relationship::new(parent.id, child.id, RelationshipType::Child),
            ])
            .unwrap();

        assert_eq!(store.edges_touching(child.id).unwrap().len(), 2);
        assert_eq!(
            store.edges_from(child.id, RelationshipType::Parent).unwrap().len(),
            1
        );
        assert!(store
            .edges_from(parent.id, RelationshipType::Parent)
            .unwrap()
            .is_empty());
        assert!(store
            .find_edge(child.id, parent.id, RelationshipType::Parent)
            .unwrap()
            .is_some());
        assert!(store
            .find_edge(parent.id, child.id, RelationshipType::Parent)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_duplicate_triple_rejects_whole_batch() {
        let store = MemoryStore::new();
        let a = store.save_person(Person::new("A", "X")).unwrap();
        let b = store.save_person(Person::new("B", "X")).unwrap();
        store
            .insert_relationships(vec![Relationship::new(a.id, b.id, RelationshipType::Parent)])
            .unwrap();

        let err = store
            .insert_relationships(vec![
                Relationship::new(b.id, a.id, RelationshipType::Child),
                Relationship::new(a.id, b.id, RelationshipType::Parent),
            ])
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidRelationship(_)));
        assert_eq!(store.edges_touching(a.id).unwrap().len(), 1);

        let err = store
            .insert_relationships(vec![
                Relationship::new(a.id, b.id, RelationshipType::Sibling),
                Relationship::new(a.id, b.id, RelationshipType::Sibling),
            ])
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidRelationship(_)));
        assert_eq!(store.edges_touching(a.id).unwrap().len(), 1);
    }

    #[test]
    fn test_second_pending_record_rejected() {
        let store = MemoryStore::new();
        let person = store.save_person(Person::new("A", "X")).unwrap();
        let user = store
            .save_user(User::new("a@example.org", Role::ValidatedUser))
            .unwrap();

        let mut first = store
            .insert_pending_addition(PendingAddition::new(person.id, user.id))
            .unwrap();
        let err = store
            .insert_pending_addition(PendingAddition::new(person.id, user.id))
            .unwrap_err();
        assert!(matches!(err, GraphError::Validation(_)));

        // once processed, a new request is accepted
        first.status = crate::types::WorkflowStatus::Rejected;
        store.save_pending_addition(first).unwrap();
        store
            .insert_pending_addition(PendingAddition::new(person.id, user.id))
            .unwrap();
        assert_eq!(store.pending_additions().unwrap().len(), 2);
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("family.jsonl");
        let store = MemoryStore::open(&path).unwrap();
        let kept = store.save_person(Person::new("Kept", "X")).unwrap();

        // a directory where the temp file goes makes every write fail
        fs::create_dir(path.with_extension("tmp")).unwrap();

        let lost = Person::new("Lost", "X");
        assert!(store.save_person(lost.clone()).is_err());
        assert!(store.person(lost.id).unwrap().is_none());
        assert!(store.person(kept.id).unwrap().is_some());

        let err = store.insert_relationships(vec![Relationship::new(
            kept.id,
            lost.id,
            RelationshipType::Sibling,
        )]);
        assert!(err.is_err());
        assert!(store.edges_touching(kept.id).unwrap().is_empty());

        fs::remove_dir(path.with_extension("tmp")).unwrap();
        store.save_person(lost.clone()).unwrap();
        let reopened = MemoryStore::open(&path).unwrap();
        assert!(reopened.person(lost.id).unwrap().is_some());
    }

    #[test]
    fn test_user_by_email_is_case_insensitive() {
        let store = MemoryStore::new();
        store
            .save_user(User::new("Admin@Example.org", Role::SuperAdmin))
            .unwrap();

        assert!(store.user_by_email("admin@example.org").unwrap().is_some());
        assert!(store.user_by_email("other@example.org").unwrap().is_none());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("family.jsonl");

        let (person_id, user_id) = {
            let store = MemoryStore::open(&path).unwrap();
            let a = store.save_person(Person::new("A", "X").public()).unwrap();
            let b = store.save_person(Person::new("B", "X")).unwrap();
            store
                .insert_relationships(vec![Relationship::new(
                    a.id,
                    b.id,
                    RelationshipType::Sibling,
                )])
                .unwrap();
            let user = store
                .save_user(User::new("a@example.org", Role::ValidatedUser).linked_to(a.id))
                .unwrap();
            store
                .save_pending_addition(PendingAddition::new(b.id, user.id))
                .unwrap();
            (a.id, user.id)
        };

        let reopened = MemoryStore::open(&path).unwrap();
        assert!(reopened.person(person_id).unwrap().unwrap().is_public);
        assert_eq!(reopened.edges_touching(person_id).unwrap().len(), 1);
        assert_eq!(
            reopened.user(user_id).unwrap().unwrap().linked_person_id,
            Some(person_id)
        );
        assert_eq!(reopened.pending_additions().unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("family.jsonl");
        let person = Person::new("A", "X");
        let line = serde_json::to_string(&Record::Person(person.clone())).unwrap();
        fs::write(&path, format!("{{not json}}\n\n{}\n", line)).unwrap();

        let store = MemoryStore::open(&path).unwrap();
        assert!(store.person(person.id).unwrap().is_some());
    }
}
