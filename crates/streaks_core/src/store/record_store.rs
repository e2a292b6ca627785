//! JSON collection codec on top of a [`KvStore`].
//!
//! # Invariants
//! - Missing or undecodable documents read as empty; the cause is logged,
//!   never returned.
//! - Saves serialize the full snapshot before touching the medium, so an
//!   encoding failure leaves the previous document intact.

use super::kv::KvStore;
use super::{Collection, StoreResult};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Load/save contract over named collections.
#[derive(Debug, Clone)]
pub struct RecordStore<S: KvStore> {
    kv: S,
}

impl<S: KvStore> RecordStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Borrows the underlying medium.
    pub fn medium(&self) -> &S {
        &self.kv
    }

    /// Loads an ordered collection, or an empty one when absent or corrupt.
    pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        self.load_object::<Vec<T>>(collection).unwrap_or_default()
    }

    /// Replaces the whole collection with `records`.
    pub fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> StoreResult<()> {
        self.save_object(collection, records)?;
        debug!(
            "event=store_save module=store status=ok collection={} count={}",
            collection.key(),
            records.len()
        );
        Ok(())
    }

    /// Loads a single-object document. `None` when absent, null or corrupt.
    pub fn load_object<T: DeserializeOwned>(&self, collection: Collection) -> Option<T> {
        let raw = match self.kv.get(collection.key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(
                    "event=store_load module=store status=fallback collection={} reason=read_failed error={}",
                    collection.key(),
                    err
                );
                return None;
            }
        };

        match serde_json::from_str::<Option<T>>(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=store_load module=store status=fallback collection={} reason=malformed line={} column={}",
                    collection.key(),
                    err.line(),
                    err.column()
                );
                None
            }
        }
    }

    /// Replaces a single-object document.
    pub fn save_object<T: Serialize + ?Sized>(
        &self,
        collection: Collection,
        value: &T,
    ) -> StoreResult<()> {
        let encoded = serde_json::to_string(value)?;
        self.kv.set(collection.key(), &encoded)
    }

    /// Drops a document entirely.
    pub fn clear(&self, collection: Collection) -> StoreResult<()> {
        self.kv.remove(collection.key())
    }
}
