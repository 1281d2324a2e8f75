//! Pomade prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    absences::{AbsenceRecord, AbsenceRegistry},
    appointments::{
        Appointment, AppointmentPatch, AppointmentStatus, AppointmentStore, NewAppointment,
    },
    barbers::{Barber, BarberPatch, BarberStore, NewBarber},
    catalog::{
        Catalog, CatalogError, DEFAULT_AVATAR, FALLBACK_IMAGE, OpeningHours, Shop, base_catalog,
    },
    reservation::{
        BarberChoice, ReservationError, ReservationStep, ReservationWorkflow, TIME_SLOTS,
    },
    revenue::{monthly_revenue, previous_month},
    services::{NewService, Service, ServicePatch, ServiceStore},
    sessions::{AuthError, CustomerIdentity, CustomerSession, StaffIdentity, StaffSession},
    storage::{DirBackend, MemoryBackend, SharedBackend, StorageBackend, StorageError},
    store::{OverlayStore, Record, StoreError, StoreKeys},
};
