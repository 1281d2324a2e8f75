//! Absence registry
//!
//! Vacations and breaks, stored as per-barber lists of inclusive date
//! ranges. The reservation workflow queries this registry so customers
//! cannot book a barber who is away.

use jiff::civil::Date;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    ids,
    storage::{SharedBackend, read_json, write_json},
    store::StoreError,
};

const KEY: &str = "pomade.absences";

/// One absence: an inclusive date range with an optional reason.
///
/// The registry does not validate that `end >= start`; callers are expected
/// to. An inverted range never matches any date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceRecord {
    /// Unique id, scoped to one barber.
    pub id: String,

    /// First day away, inclusive.
    pub start: Date,

    /// Last day away, inclusive.
    pub end: Date,

    /// Optional free-text reason.
    pub reason: Option<String>,
}

impl AbsenceRecord {
    /// Whether `date` falls within this absence, bounds included.
    #[must_use]
    pub fn covers(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Per-barber absence lists, persisted under a single key.
#[derive(Debug)]
pub struct AbsenceRegistry {
    backend: SharedBackend,
}

impl AbsenceRegistry {
    /// Create a registry persisted via `backend`.
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    fn load(&self) -> FxHashMap<String, Vec<AbsenceRecord>> {
        read_json(&self.backend, KEY)
    }

    fn save(&self, data: &FxHashMap<String, Vec<AbsenceRecord>>) -> Result<(), StoreError> {
        write_json(&self.backend, KEY, data)?;
        Ok(())
    }

    /// Absences recorded for `barber_id`, creation order.
    pub fn list_for(&self, barber_id: &str) -> Vec<AbsenceRecord> {
        self.load().remove(barber_id).unwrap_or_default()
    }

    /// Record an absence for `barber_id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the registry cannot be persisted.
    pub fn add(
        &self,
        barber_id: &str,
        start: Date,
        end: Date,
        reason: Option<&str>,
    ) -> Result<AbsenceRecord, StoreError> {
        let record = AbsenceRecord {
            id: ids::generate("p"),
            start,
            end,
            reason: reason.map(str::to_owned),
        };

        let mut data = self.load();
        data.entry(barber_id.to_owned())
            .or_default()
            .push(record.clone());
        self.save(&data)?;

        Ok(record)
    }

    /// Remove the absence `record_id` from `barber_id`'s list.
    /// Removing an unknown id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the registry cannot be persisted.
    pub fn remove(&self, barber_id: &str, record_id: &str) -> Result<(), StoreError> {
        let mut data = self.load();
        if let Some(records) = data.get_mut(barber_id) {
            records.retain(|r| r.id != record_id);
        }
        self.save(&data)?;
        Ok(())
    }

    /// Whether `barber_id` is away on `date`.
    pub fn is_unavailable(&self, barber_id: &str, date: Date) -> bool {
        self.list_for(barber_id).iter().any(|r| r.covers(date))
    }

    /// The subset of `barber_ids` available on `date`.
    pub fn filter_available<I, S>(&self, barber_ids: I, date: Date) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        barber_ids
            .into_iter()
            .map(Into::into)
            .filter(|id| !self.is_unavailable(id, date))
            .collect()
    }
}
