//! Base catalog
//!
//! The fixed dataset the shop ships with: shop details and opening hours,
//! the seed barbers, services and appointments. Parsed from an embedded
//! YAML fixture; runtime changes never touch it, they live in the overlay
//! stores layered on top.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{appointments::Appointment, barbers::Barber, services::Service};

const SEED: &str = include_str!("seed.yaml");

/// Stock illustration used when a service has no image of its own.
pub const FALLBACK_IMAGE: &str = "https://picsum.photos/seed/barber-fallback/400/400";

/// Default staff avatar.
pub const DEFAULT_AVATAR: &str = "/funcionarios/prv.png";

/// Errors parsing the embedded catalog fixture.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The YAML fixture could not be parsed.
    #[error("failed to parse seed catalog: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Opening hours for one weekday; `None` on both sides means closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    /// Weekday index, Sunday-zero.
    pub weekday: i8,

    /// Opening time label, e.g. `"09:00"`.
    pub opens: Option<String>,

    /// Closing time label, e.g. `"21:00"`.
    pub closes: Option<String>,
}

impl OpeningHours {
    /// Display label: `"09:00 - 21:00"` or `"Fechado"`.
    #[must_use]
    pub fn label(&self) -> String {
        crate::dates::hours_label(self.opens.as_deref(), self.closes.as_deref())
    }
}

/// The single shop this demo manages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    /// Unique id.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Street address.
    pub address: String,

    /// About text for the shop page.
    pub about: String,

    /// Primary contact phone.
    pub phone_primary: String,

    /// Secondary contact phone.
    pub phone_secondary: String,

    /// Star rating shown on the shop card.
    pub rating: u8,

    /// Number of reviews behind the rating.
    pub review_count: u32,

    /// Shop photo URL.
    pub image_url: String,

    /// Opening hours, Sunday first.
    pub hours: Vec<OpeningHours>,
}

/// The parsed seed dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    /// Shop details.
    pub shop: Shop,

    /// Seed barbers.
    pub barbers: Vec<Barber>,

    /// Seed services.
    pub services: Vec<Service>,

    /// Seed appointments.
    pub appointments: Vec<Appointment>,
}

/// Parse the embedded seed catalog.
///
/// # Errors
///
/// Returns a [`CatalogError`] if the embedded fixture does not parse; that
/// only happens when the fixture shipped with the crate is broken.
pub fn base_catalog() -> Result<Catalog, CatalogError> {
    Ok(serde_norway::from_str(SEED)?)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::appointments::AppointmentStatus;

    use super::*;

    #[test]
    fn seed_catalog_parses() -> TestResult {
        let catalog = base_catalog()?;

        assert_eq!(catalog.shop.name, "JB Barber");
        assert_eq!(catalog.barbers.len(), 3);
        assert_eq!(catalog.services.len(), 10);
        assert_eq!(catalog.appointments.len(), 7);

        Ok(())
    }

    #[test]
    fn seed_prices_and_dates_are_typed() -> TestResult {
        let catalog = base_catalog()?;

        let corte = catalog.services.iter().find(|s| s.id == "s1");
        assert_eq!(corte.map(|s| s.price), Some(Decimal::from(50)));
        assert_eq!(corte.map(|s| s.duration_minutes), Some(45));

        let first = catalog.appointments.iter().find(|a| a.id == "a1");
        assert_eq!(
            first.map(|a| a.status),
            Some(AppointmentStatus::Confirmed),
            "a1 is the only confirmed seed appointment"
        );
        assert_eq!(first.map(|a| a.date.year()), Some(2025));

        Ok(())
    }

    #[test]
    fn hours_cover_the_whole_week() -> TestResult {
        let catalog = base_catalog()?;

        assert_eq!(catalog.shop.hours.len(), 7);

        let sunday = catalog.shop.hours.iter().find(|h| h.weekday == 0);
        assert_eq!(sunday.map(OpeningHours::label), Some("Fechado".to_owned()));

        let saturday = catalog.shop.hours.iter().find(|h| h.weekday == 6);
        assert_eq!(
            saturday.map(OpeningHours::label),
            Some("08:00 - 17:00".to_owned())
        );

        Ok(())
    }
}
