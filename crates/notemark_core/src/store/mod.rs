//! Persistence stores.
//!
//! # Responsibility
//! - Provide the named-slot key-value layer and the note collection built
//!   on top of it.
//! - Isolate SQLite and serialization details from shell/business logic.
//!
//! # Invariants
//! - All durable state flows through [`kv::KvStore`] slots.
//! - The note collection lives in a single slot and is owned exclusively
//!   by the store; callers only hold snapshots.

pub mod kv;
pub mod notes;
