//! Per-collection repository contracts.
//!
//! # Responsibility
//! - Give each service an injected, collection-shaped view of storage.
//! - Keep the key/value medium and JSON codec out of service code.
//!
//! # Invariants
//! - Loads never fail: absent or corrupt collections read as empty.
//! - Saves replace the whole collection snapshot.

pub mod collection_repo;
