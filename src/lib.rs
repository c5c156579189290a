//! Family Graph Server
//!
//! A genealogical record graph: people connected by typed, directed family
//! relationships, with per-user visibility rules layered on top.
//!
//! # Features
//!
//! - **Tree view**: parents, grandparents and siblings around a person
//! - **Bounded walks**: ancestors and descendants to a depth, cycle-safe
//! - **Visibility**: every returned person passes the permission predicate
//! - **Workflows**: validation requests and profile claims with notifications
//! - **HTTP API**: axum router with JWT authentication
//!
//! # Modules
//!
//! - `types`: Core records (Person, Relationship, User, FamilyTree)
//! - `store`: Record store gateway and the JSONL-backed memory store
//! - `engine`: Permission predicate, tree assembly, traversal, mutations
//! - `notify`: Notification channel
//! - `export`: Printable tree documents
//! - `api`: HTTP router, handlers and JWT auth
//! - `config`: Environment configuration
//! - `utils`: Utility functions (timestamps, atomic writes)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use family_graph::{FamilyGraph, MemoryStore};
//!
//! let store = Arc::new(MemoryStore::open("family.jsonl").unwrap());
//! let graph = FamilyGraph::new(store);
//! # let (person_id, user_id) = (uuid::Uuid::new_v4(), uuid::Uuid::new_v4());
//! let ancestors = graph.ancestors(person_id, user_id, Some(3)).unwrap();
//! ```

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod notify;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::Config;
pub use engine::{Direction, EngineSettings, FamilyGraph};
pub use error::{GraphError, GraphResult};
pub use export::{TextRenderer, TreeExport, TreeRenderer};
pub use notify::{LogNotifier, Notification, Notifier};
pub use store::{MemoryStore, RecordStore};
pub use types::{
    ClaimDraft, FamilyTree, PendingAddition, Person, PersonDraft, PersonId, PersonPatch,
    ProfileClaim, Relationship, RelationshipType, Role, Side, User, UserId, WorkflowStatus,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
