//! Integration tests for the family graph engine

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use family_graph::{
    EngineSettings, FamilyGraph, GraphError, MemoryStore, Person, PersonDraft, RecordStore,
    Relationship, RelationshipType, Role, User,
};
use tempfile::TempDir;

struct World {
    store: Arc<MemoryStore>,
    graph: FamilyGraph,
}

impl World {
    fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    fn with_settings(settings: EngineSettings) -> Self {
        let store = Arc::new(MemoryStore::new());
        let graph = FamilyGraph::new(store.clone()).with_settings(settings);
        Self { store, graph }
    }

    fn person(&self, given: &str, public: bool) -> Person {
        let mut person = Person::new(given, "Nguyen");
        person.is_public = public;
        self.store.save_person(person).unwrap()
    }

    fn user(&self, email: &str, role: Role, linked: Option<&Person>) -> User {
        let mut user = User::new(email, role);
        user.linked_person_id = linked.map(|p| p.id);
        self.store.save_user(user).unwrap()
    }

    fn edge(&self, a: &Person, b: &Person, ty: RelationshipType) {
        self.store
            .insert_relationships(vec![Relationship::new(a.id, b.id, ty)])
            .unwrap();
    }
}

fn given_names(persons: &[Person]) -> Vec<String> {
    persons.iter().map(|p| p.given_name.clone()).collect()
}

#[test]
fn test_super_admin_sees_every_person() {
    let world = World::new();
    let admin = world.user("admin@example.org", Role::SuperAdmin, None);
    for i in 0..10 {
        let person = world.person(&format!("P{}", i), i % 3 == 0);
        assert!(world.graph.can_view(admin.id, person.id).unwrap());
    }
}

#[test]
fn test_public_person_visible_to_every_role() {
    let world = World::new();
    let public = world.person("Open", true);
    for (email, role) in [
        ("a@example.org", Role::SuperAdmin),
        ("v@example.org", Role::ValidatedUser),
        ("p@example.org", Role::PendingUser),
    ] {
        let user = world.user(email, role, None);
        assert!(world.graph.can_view(user.id, public.id).unwrap());
    }
}

#[test]
fn test_depth_zero_walk_is_empty() {
    let world = World::new();
    let admin = world.user("admin@example.org", Role::SuperAdmin, None);
    let child = world.person("Child", false);
    let parent = world.person("Parent", false);
    world.edge(&child, &parent, RelationshipType::Parent);

    assert!(world.graph.ancestors(child.id, admin.id, Some(0)).unwrap().is_empty());
}

#[test]
fn test_cyclic_data_never_repeats_a_person() {
    let world = World::new();
    let admin = world.user("admin@example.org", Role::SuperAdmin, None);
    let a = world.person("A", false);
    let b = world.person("B", false);
    let c = world.person("C", false);
    world.edge(&a, &b, RelationshipType::Parent);
    world.edge(&b, &c, RelationshipType::Parent);
    world.edge(&c, &a, RelationshipType::Parent);
    world.edge(&b, &a, RelationshipType::Parent);

    let walked = world.graph.ancestors(a.id, admin.id, Some(20)).unwrap();
    let ids: HashSet<_> = walked.iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), walked.len());
    assert!(!ids.contains(&a.id));
    assert_eq!(given_names(&walked), vec!["B", "C"]);
}

#[test]
fn test_tree_deduplicates_shared_grandparent() {
    let world = World::new();
    let admin = world.user("admin@example.org", Role::SuperAdmin, None);
    let me = world.person("Me", false);
    let mother = world.person("Mother", false);
    let father = world.person("Father", false);
    let grandparent = world.person("Grandparent", false);
    world.edge(&me, &mother, RelationshipType::Parent);
    world.edge(&me, &father, RelationshipType::Parent);
    world.edge(&mother, &grandparent, RelationshipType::Parent);
    world.edge(&father, &grandparent, RelationshipType::Parent);

    let tree = world.graph.family_tree(me.id, admin.id).unwrap();
    assert_eq!(tree.grandparents.len(), 1);
    assert_eq!(tree.grandparents[0].id, grandparent.id);
}

#[test]
fn test_self_relationship_always_invalid() {
    let world = World::new();
    let a = world.person("A", true);
    let users = [
        world.user("admin@example.org", Role::SuperAdmin, None),
        world.user("linked@example.org", Role::ValidatedUser, Some(&a)),
        world.user("pending@example.org", Role::PendingUser, None),
    ];

    for user in users {
        let err = world
            .graph
            .add_relationship(a.id, a.id, RelationshipType::Parent, user.id)
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidRelationship(_)));
    }
}

#[test]
fn test_duplicate_relationship_rejected() {
    let world = World::new();
    let admin = world.user("admin@example.org", Role::SuperAdmin, None);
    let a = world.person("A", false);
    let b = world.person("B", false);

    world
        .graph
        .add_relationship(a.id, b.id, RelationshipType::Spouse, admin.id)
        .unwrap();
    let err = world
        .graph
        .add_relationship(a.id, b.id, RelationshipType::Spouse, admin.id)
        .unwrap_err();
    assert!(matches!(err, GraphError::InvalidRelationship(_)));
}

#[test]
fn test_linked_user_sees_direct_relatives_only() {
    let world = World::new();
    let me = world.person("Me", false);
    let parent = world.person("Parent", false);
    let grandparent = world.person("Grandparent", false);
    world.edge(&me, &parent, RelationshipType::Parent);
    world.edge(&parent, &grandparent, RelationshipType::Parent);
    let user = world.user("me@example.org", Role::ValidatedUser, Some(&me));

    assert!(world.graph.can_view(user.id, me.id).unwrap());
    assert!(world.graph.can_view(user.id, parent.id).unwrap());
    assert!(!world.graph.can_view(user.id, grandparent.id).unwrap());

    // the walk stops at the first invisible ancestor
    let walked = world.graph.ancestors(me.id, user.id, None).unwrap();
    assert_eq!(given_names(&walked), vec!["Parent"]);
}

#[test]
fn test_chain_walk_scenario() {
    let world = World::new();
    let viewer = world.user("v@example.org", Role::ValidatedUser, None);
    let child = world.person("Child", true);
    let parent = world.person("Parent", true);
    let grandparent = world.person("Grandparent", true);
    let great = world.person("GreatGrandparent", true);
    world.edge(&child, &parent, RelationshipType::Parent);
    world.edge(&parent, &grandparent, RelationshipType::Parent);
    world.edge(&grandparent, &great, RelationshipType::Parent);

    let three = world.graph.ancestors(child.id, viewer.id, Some(3)).unwrap();
    assert_eq!(
        given_names(&three),
        vec!["Parent", "Grandparent", "GreatGrandparent"]
    );
    let one = world.graph.ancestors(child.id, viewer.id, Some(1)).unwrap();
    assert_eq!(given_names(&one), vec!["Parent"]);
}

#[test]
fn test_invisible_branch_does_not_affect_sibling_branch() {
    let world = World::new();
    let viewer = world.user("v@example.org", Role::ValidatedUser, None);
    let me = world.person("Me", true);
    let mother = world.person("Mother", true);
    let father = world.person("Father", true);
    let hidden = world.person("HiddenGrandma", false);
    let hidden_parent = world.person("HiddenGreat", true);
    let grandpa = world.person("Grandpa", true);
    let great = world.person("Great", true);
    world.edge(&me, &mother, RelationshipType::Parent);
    world.edge(&me, &father, RelationshipType::Parent);
    world.edge(&mother, &hidden, RelationshipType::Parent);
    world.edge(&hidden, &hidden_parent, RelationshipType::Parent);
    world.edge(&father, &grandpa, RelationshipType::Parent);
    world.edge(&grandpa, &great, RelationshipType::Parent);

    let walked = world.graph.ancestors(me.id, viewer.id, None).unwrap();
    assert_eq!(given_names(&walked), vec!["Mother", "Father", "Grandpa", "Great"]);
}

#[test]
fn test_reciprocal_edges_make_both_walks_work() {
    let world = World::with_settings(EngineSettings {
        reciprocal_edges: true,
        ..EngineSettings::default()
    });
    let admin = world.user("admin@example.org", Role::SuperAdmin, None);
    let kid = world.person("Kid", false);
    let mom = world.person("Mom", false);
    let grandma = world.person("Grandma", false);

    world
        .graph
        .add_relationship(kid.id, mom.id, RelationshipType::Parent, admin.id)
        .unwrap();
    world
        .graph
        .add_relationship(mom.id, grandma.id, RelationshipType::Parent, admin.id)
        .unwrap();

    let up = world.graph.ancestors(kid.id, admin.id, None).unwrap();
    assert_eq!(given_names(&up), vec!["Mom", "Grandma"]);
    let down = world.graph.descendants(grandma.id, admin.id, None).unwrap();
    assert_eq!(given_names(&down), vec!["Mom", "Kid"]);

    // adding the reverse edge explicitly is now a duplicate
    let err = world
        .graph
        .add_relationship(mom.id, kid.id, RelationshipType::Child, admin.id)
        .unwrap_err();
    assert!(matches!(err, GraphError::InvalidRelationship(_)));
}

#[test]
fn test_validation_makes_person_public() {
    let world = World::new();
    let admin = world.user("admin@example.org", Role::SuperAdmin, None);
    let requester = world.user("r@example.org", Role::ValidatedUser, None);
    let stranger = world.user("s@example.org", Role::ValidatedUser, None);

    let person = world
        .graph
        .create_person(PersonDraft::new("Lan", "Tran"), requester.id)
        .unwrap();
    assert!(!world.graph.can_view(stranger.id, person.id).unwrap());

    let addition = world.graph.request_validation(person.id, requester.id).unwrap();
    world.graph.approve_addition(addition.id, admin.id).unwrap();

    assert!(world.graph.can_view(stranger.id, person.id).unwrap());
    assert!(world.graph.pending_validations(admin.id).unwrap().is_empty());
}

#[test]
fn test_store_file_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("family.jsonl");
    let (person_id, admin_id) = {
        let store = Arc::new(MemoryStore::open(&path).unwrap());
        let graph = FamilyGraph::new(store.clone());
        let admin = store
            .save_user(User::new("admin@example.org", Role::SuperAdmin))
            .unwrap();
        let me = graph
            .create_person(PersonDraft::new("Me", "Nguyen"), admin.id)
            .unwrap();
        let parent = graph
            .create_person(PersonDraft::new("Parent", "Nguyen"), admin.id)
            .unwrap();
        graph
            .add_relationship(me.id, parent.id, RelationshipType::Parent, admin.id)
            .unwrap();
        (me.id, admin.id)
    };

    let reopened = FamilyGraph::new(Arc::new(MemoryStore::open(&path).unwrap()));
    let walked = reopened.ancestors(person_id, admin_id, None).unwrap();
    assert_eq!(given_names(&walked), vec!["Parent"]);
}

#[test]
fn test_concurrent_reads_and_writes() {
    let world = World::new();
    let admin = world.user("admin@example.org", Role::SuperAdmin, None);
    let root_id = world.person("Root", true).id;
    let admin_id = admin.id;
    let graph = Arc::new(world.graph);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                for i in 0..10 {
                    let draft = PersonDraft::new(format!("T{}P{}", t, i), "Nguyen");
                    let parent = graph.create_person(draft, admin_id).unwrap();
                    graph
                        .add_relationship(root_id, parent.id, RelationshipType::Parent, admin_id)
                        .unwrap();
                    graph.ancestors(root_id, admin_id, Some(1)).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let parents = graph.ancestors(root_id, admin_id, Some(1)).unwrap();
    assert_eq!(parents.len(), 40);
}

#[test]
fn test_concurrent_identical_adds_insert_one_edge() {
    const THREADS: usize = 8;

    for _ in 0..50 {
        let world = World::new();
        let admin_id = world.user("admin@example.org", Role::SuperAdmin, None).id;
        let a_id = world.person("A", false).id;
        let b_id = world.person("B", false).id;
        let graph = Arc::new(world.graph);
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let graph = Arc::clone(&graph);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    graph.add_relationship(a_id, b_id, RelationshipType::Parent, admin_id)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        for err in results.into_iter().filter_map(Result::err) {
            assert!(matches!(err, GraphError::InvalidRelationship(_)));
        }

        let edges = world.store.edges_from(a_id, RelationshipType::Parent).unwrap();
        assert_eq!(edges.len(), 1);
    }
}

#[test]
fn test_concurrent_validation_requests_keep_one_pending() {
    const THREADS: usize = 8;

    let world = World::new();
    let requester = world.user("r@example.org", Role::ValidatedUser, None);
    let person = world
        .graph
        .create_person(PersonDraft::new("Lan", "Tran"), requester.id)
        .unwrap();
    let (person_id, requester_id) = (person.id, requester.id);
    let store = Arc::clone(&world.store);
    let graph = Arc::new(world.graph);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let graph = Arc::clone(&graph);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                graph.request_validation(person_id, requester_id).is_ok()
            })
        })
        .collect();

    let accepted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(accepted, 1);
    assert_eq!(store.pending_additions().unwrap().len(), 1);
}
