//! Pomade
//!
//! Pomade is the booking, availability and revenue engine behind a
//! single-location barbershop demo. All state lives in a pluggable local
//! key-value backend as overlays on an immutable seed catalog; there is no
//! server, no cross-device sync and no real authentication.

pub mod absences;
pub mod appointments;
pub mod barbers;
pub mod catalog;
pub mod dates;
pub mod ids;
pub mod prelude;
pub mod reservation;
pub mod revenue;
pub mod services;
pub mod sessions;
pub mod storage;
pub mod store;
