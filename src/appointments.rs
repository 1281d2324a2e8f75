//! Appointments
//!
//! An appointment is an immutable historical snapshot: barber id and name,
//! service name and price are copied at creation time so later catalogue
//! edits never rewrite what was booked. Only `status` can change afterwards,
//! through a status-only patch overlay.

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    ids,
    storage::SharedBackend,
    store::{OverlayStore, Record, StoreError, StoreKeys},
};

const KEYS: StoreKeys = StoreKeys {
    additions: "pomade.appointments.additions",
    patches: "pomade.appointments.updates",
    tombstones: None,
};

/// Lifecycle status of an appointment.
///
/// New appointments always start [`Confirmed`](AppointmentStatus::Confirmed).
/// The store records status patches last-write-wins and does not itself
/// refuse transitions out of a terminal status; the UI only ever offers
/// `confirmed → completed` and `confirmed → canceled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Booked and upcoming.
    Confirmed,

    /// Carried out and counted towards revenue.
    Completed,

    /// Called off; kept for history, never counted.
    Canceled,
}

/// A booked service slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    /// Unique id, immutable once created.
    pub id: String,

    /// Lifecycle status; the only mutable field.
    pub status: AppointmentStatus,

    /// Name of the booked service, snapshotted at creation.
    pub service_name: String,

    /// Id of the chosen barber, for availability and revenue lookups.
    pub barber_id: String,

    /// Display name of the chosen barber, snapshotted at creation.
    pub barber_name: String,

    /// Customer display name.
    pub customer_name: String,

    /// Customer phone number; may be empty.
    pub customer_phone: String,

    /// Calendar date of the slot.
    pub date: Date,

    /// Time-of-day label, e.g. `"09:45"`.
    pub time: String,

    /// Price charged, snapshotted from the service at creation.
    pub price: Decimal,

    /// Short display label for the date, e.g. `"06 de Fevereiro"`.
    pub date_label: String,

    /// Long display label for the date, e.g. `"06 de Fevereiro de 2025"`.
    pub date_label_long: String,
}

/// Status-only patch; every other appointment field is immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentPatch {
    /// Replacement status, if any.
    pub status: Option<AppointmentStatus>,
}

impl Record for Appointment {
    type Patch = AppointmentPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &Self::Patch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn merge(prior: &mut Self::Patch, next: Self::Patch) {
        if next.status.is_some() {
            prior.status = next.status;
        }
    }
}

/// Fields collected by the reservation workflow for a new appointment.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    /// Name of the booked service.
    pub service_name: String,

    /// Id of the chosen barber.
    pub barber_id: String,

    /// Display name of the chosen barber.
    pub barber_name: String,

    /// Customer display name.
    pub customer_name: String,

    /// Customer phone number; may be empty.
    pub customer_phone: String,

    /// Calendar date of the slot.
    pub date: Date,

    /// Time-of-day label.
    pub time: String,

    /// Price charged.
    pub price: Decimal,

    /// Short display label for the date.
    pub date_label: String,

    /// Long display label for the date.
    pub date_label_long: String,
}

/// Overlay store over the seed appointments.
#[derive(Debug)]
pub struct AppointmentStore {
    inner: OverlayStore<Appointment>,
}

impl AppointmentStore {
    /// Create a store over `seed` with overlays persisted via `backend`.
    pub fn new(seed: Vec<Appointment>, backend: SharedBackend) -> Self {
        Self {
            inner: OverlayStore::new(seed, backend, KEYS),
        }
    }

    /// The merged appointment view, insertion order.
    pub fn all(&self) -> Vec<Appointment> {
        self.inner.all()
    }

    /// Appointments belonging to one barber, for the staff panel.
    pub fn for_barber(&self, barber_id: &str) -> Vec<Appointment> {
        self.all()
            .into_iter()
            .filter(|appointment| appointment.barber_id == barber_id)
            .collect()
    }

    /// Create a confirmed appointment with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingField`] if the service name or barber id
    /// is blank, [`StoreError::NegativePrice`] for a negative price, or a
    /// storage error if the overlay cannot be persisted.
    pub fn add(&self, new: NewAppointment) -> Result<Appointment, StoreError> {
        let service_name = new.service_name.trim().to_owned();
        if service_name.is_empty() {
            return Err(StoreError::MissingField("service name"));
        }
        if new.barber_id.trim().is_empty() {
            return Err(StoreError::MissingField("barber id"));
        }
        if new.price.is_sign_negative() {
            return Err(StoreError::NegativePrice);
        }

        let customer_name = new.customer_name.trim().to_owned();
        let appointment = Appointment {
            id: ids::generate("ag"),
            status: AppointmentStatus::Confirmed,
            service_name,
            barber_id: new.barber_id,
            barber_name: new.barber_name.trim().to_owned(),
            customer_name,
            customer_phone: new.customer_phone.trim().to_owned(),
            date: new.date,
            time: new.time,
            price: new.price,
            date_label: new.date_label,
            date_label_long: new.date_label_long,
        };

        self.inner.push_addition(appointment.clone())?;
        Ok(appointment)
    }

    /// Record a status change for `id`, last write winning.
    ///
    /// Unknown ids are accepted and store an inert patch.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the overlay cannot be persisted.
    pub fn set_status(&self, id: &str, status: AppointmentStatus) -> Result<(), StoreError> {
        self.inner.record_patch(
            id,
            AppointmentPatch {
                status: Some(status),
            },
        )
    }
}
