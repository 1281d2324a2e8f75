//! Overlay store
//!
//! Each catalogue entity (appointments, barbers, services) is presented as a
//! single merged view of immutable seed records plus three persisted
//! overlays: *additions* (whole new records), *patches* (partial per-id
//! edits, applied field by field) and, where enabled, *tombstones* (ids
//! excluded from every future view). The merge is implemented once here;
//! the entity modules wrap it with their own validation and defaults.

use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::storage::{SharedBackend, StorageError, read_json, write_json};

/// Validation and persistence errors raised at the store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field was missing or blank after trimming.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A price was negative.
    #[error("price cannot be negative")]
    NegativePrice,

    /// A service duration was zero.
    #[error("duration must be at least one minute")]
    ZeroDuration,

    /// Another visible barber already uses this login handle.
    #[error("another barber already uses the login {0:?}")]
    DuplicateLogin(String),

    /// The overlay could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A record that can live in an [`OverlayStore`].
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Partial record applied field by field over a base record. Fields
    /// absent from the patch keep the base value.
    type Patch: Clone + Serialize + DeserializeOwned;

    /// The record's unique id.
    fn id(&self) -> &str;

    /// Overlay `patch` onto `self`.
    fn apply(&mut self, patch: &Self::Patch);

    /// Fold `next` into `prior`, last write winning per field.
    fn merge(prior: &mut Self::Patch, next: Self::Patch);
}

/// Storage keys for one entity's overlays.
#[derive(Debug, Clone, Copy)]
pub struct StoreKeys {
    /// Key holding the ordered addition list.
    pub additions: &'static str,

    /// Key holding the id → patch map.
    pub patches: &'static str,

    /// Key holding the tombstone id list, for entities with soft delete.
    pub tombstones: Option<&'static str>,
}

/// Merged view over seed records and their persisted overlays.
#[derive(Debug)]
pub struct OverlayStore<R: Record> {
    seed: Vec<R>,
    backend: SharedBackend,
    keys: StoreKeys,
}

impl<R: Record> OverlayStore<R> {
    /// Create a store over `seed` with overlays persisted under `keys`.
    pub fn new(seed: Vec<R>, backend: SharedBackend, keys: StoreKeys) -> Self {
        Self {
            seed,
            backend,
            keys,
        }
    }

    /// The merged, de-duplicated view.
    ///
    /// Merge order: seed records first, then additions overlaid by id (an
    /// addition colliding with a seed id replaces it in place, keeping the
    /// seed's position), then tombstoned ids dropped, then patches applied
    /// field by field. The result keeps insertion order; callers sort or
    /// filter as needed.
    pub fn all(&self) -> Vec<R> {
        let additions: Vec<R> = read_json(&self.backend, self.keys.additions);
        let patches: FxHashMap<String, R::Patch> = read_json(&self.backend, self.keys.patches);
        let removed = self.tombstones();

        let mut order: Vec<String> = Vec::with_capacity(self.seed.len() + additions.len());
        let mut by_id: FxHashMap<String, R> = FxHashMap::default();

        for record in self.seed.iter().cloned().chain(additions) {
            let id = record.id().to_owned();
            if by_id.insert(id.clone(), record).is_none() {
                order.push(id);
            }
        }

        order
            .into_iter()
            .filter(|id| !removed.iter().any(|r| r == id))
            .filter_map(|id| {
                let mut record = by_id.remove(&id)?;
                if let Some(patch) = patches.get(&id) {
                    record.apply(patch);
                }
                Some(record)
            })
            .collect()
    }

    /// Append a fully-constructed record to the additions overlay.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError::Storage`] if the overlay cannot be persisted.
    pub fn push_addition(&self, record: R) -> Result<(), StoreError> {
        let mut additions: Vec<R> = read_json(&self.backend, self.keys.additions);
        tracing::debug!(key = self.keys.additions, id = record.id(), "adding record");
        additions.push(record);
        write_json(&self.backend, self.keys.additions, &additions)?;
        Ok(())
    }

    /// Fold `patch` into the patch overlay for `id`.
    ///
    /// The id is not checked against the merged view: patching an unknown id
    /// records an inert patch.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError::Storage`] if the overlay cannot be persisted.
    pub fn record_patch(&self, id: &str, patch: R::Patch) -> Result<(), StoreError> {
        let mut patches: FxHashMap<String, R::Patch> = read_json(&self.backend, self.keys.patches);
        match patches.get_mut(id) {
            Some(prior) => R::merge(prior, patch),
            None => {
                patches.insert(id.to_owned(), patch);
            }
        }
        write_json(&self.backend, self.keys.patches, &patches)?;
        Ok(())
    }

    /// Tombstone `id`, excluding it from every future merged view.
    /// Idempotent; a no-op for stores without a tombstone overlay.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError::Storage`] if the overlay cannot be persisted.
    pub fn tombstone(&self, id: &str) -> Result<(), StoreError> {
        let Some(key) = self.keys.tombstones else {
            return Ok(());
        };

        let mut removed: Vec<String> = read_json(&self.backend, key);
        if !removed.iter().any(|r| r == id) {
            removed.push(id.to_owned());
            write_json(&self.backend, key, &removed)?;
        }
        Ok(())
    }

    fn tombstones(&self) -> Vec<String> {
        self.keys
            .tombstones
            .map(|key| read_json(&self.backend, key))
            .unwrap_or_default()
    }

    pub(crate) fn backend(&self) -> &SharedBackend {
        &self.backend
    }
}
