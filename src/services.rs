//! Services
//!
//! The one entity with a deletion path: removing a service records a
//! tombstone id, so the id disappears from every future merged view while
//! the underlying addition record stays stored. There is no un-delete.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::FALLBACK_IMAGE,
    ids,
    storage::SharedBackend,
    store::{OverlayStore, Record, StoreError, StoreKeys},
};

const KEYS: StoreKeys = StoreKeys {
    additions: "pomade.services.additions",
    patches: "pomade.services.updates",
    tombstones: Some("pomade.services.removed"),
};

/// A bookable service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Unique id.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Short description; may be empty.
    pub description: String,

    /// Price, non-negative.
    pub price: Decimal,

    /// Duration in minutes, at least one.
    pub duration_minutes: u32,

    /// Illustration URL; blank values fall back to the stock image.
    pub image_url: String,
}

/// Partial service edit, applied field by field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServicePatch {
    /// Replacement display name.
    pub name: Option<String>,

    /// Replacement description.
    pub description: Option<String>,

    /// Replacement price.
    pub price: Option<Decimal>,

    /// Replacement duration in minutes.
    pub duration_minutes: Option<u32>,

    /// Replacement illustration URL.
    pub image_url: Option<String>,
}

impl Record for Service {
    type Patch = ServicePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &Self::Patch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(duration) = patch.duration_minutes {
            self.duration_minutes = duration;
        }
        if let Some(image_url) = &patch.image_url {
            self.image_url = image_url.clone();
        }
    }

    fn merge(prior: &mut Self::Patch, next: Self::Patch) {
        if next.name.is_some() {
            prior.name = next.name;
        }
        if next.description.is_some() {
            prior.description = next.description;
        }
        if next.price.is_some() {
            prior.price = next.price;
        }
        if next.duration_minutes.is_some() {
            prior.duration_minutes = next.duration_minutes;
        }
        if next.image_url.is_some() {
            prior.image_url = next.image_url;
        }
    }
}

/// Fields for a new service.
#[derive(Debug, Clone)]
pub struct NewService {
    /// Display name.
    pub name: String,

    /// Short description; `None` stores an empty string.
    pub description: Option<String>,

    /// Price, non-negative.
    pub price: Decimal,

    /// Duration in minutes, at least one.
    pub duration_minutes: u32,

    /// Illustration URL; `None` or blank uses the stock image.
    pub image_url: Option<String>,
}

/// Overlay store over the seed services, with soft delete.
#[derive(Debug)]
pub struct ServiceStore {
    inner: OverlayStore<Service>,
}

impl ServiceStore {
    /// Create a store over `seed` with overlays persisted via `backend`.
    pub fn new(seed: Vec<Service>, backend: SharedBackend) -> Self {
        Self {
            inner: OverlayStore::new(seed, backend, KEYS),
        }
    }

    /// The merged service view: seed + additions, patched, minus removals.
    pub fn all(&self) -> Vec<Service> {
        self.inner.all()
    }

    /// Look up a visible service by id.
    pub fn find(&self, id: &str) -> Option<Service> {
        self.all().into_iter().find(|s| s.id == id)
    }

    /// Append a new service with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingField`] for a blank name,
    /// [`StoreError::NegativePrice`] or [`StoreError::ZeroDuration`] for
    /// out-of-range numbers, or a storage error.
    pub fn add(&self, new: NewService) -> Result<Service, StoreError> {
        let name = new.name.trim().to_owned();
        if name.is_empty() {
            return Err(StoreError::MissingField("name"));
        }
        if new.price.is_sign_negative() {
            return Err(StoreError::NegativePrice);
        }
        if new.duration_minutes == 0 {
            return Err(StoreError::ZeroDuration);
        }

        let image_url = new
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(FALLBACK_IMAGE)
            .to_owned();

        let service = Service {
            id: ids::generate("s"),
            name,
            description: new
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_owned(),
            price: new.price,
            duration_minutes: new.duration_minutes,
            image_url,
        };

        self.inner.push_addition(service.clone())?;
        Ok(service)
    }

    /// Record a partial edit for `id`, last write winning per field.
    ///
    /// Strings are trimmed; a blank image URL reverts to the stock image.
    /// Unknown ids are accepted and store an inert patch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingField`] for a blank provided name,
    /// [`StoreError::NegativePrice`] or [`StoreError::ZeroDuration`] for
    /// out-of-range provided numbers, or a storage error.
    pub fn update(&self, id: &str, patch: ServicePatch) -> Result<(), StoreError> {
        let name = match patch.name {
            Some(name) => {
                let name = name.trim().to_owned();
                if name.is_empty() {
                    return Err(StoreError::MissingField("name"));
                }
                Some(name)
            }
            None => None,
        };

        if matches!(patch.price, Some(p) if p.is_sign_negative()) {
            return Err(StoreError::NegativePrice);
        }
        if patch.duration_minutes == Some(0) {
            return Err(StoreError::ZeroDuration);
        }

        let image_url = patch.image_url.map(|url| {
            let url = url.trim().to_owned();
            if url.is_empty() {
                FALLBACK_IMAGE.to_owned()
            } else {
                url
            }
        });

        self.inner.record_patch(
            id,
            ServicePatch {
                name,
                description: patch.description.map(|d| d.trim().to_owned()),
                price: patch.price,
                duration_minutes: patch.duration_minutes,
                image_url,
            },
        )
    }

    /// Soft-delete `id`. Idempotent; unknown ids are accepted.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the tombstone list cannot be persisted.
    pub fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.inner.tombstone(id)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::storage::MemoryBackend;

    use super::*;

    fn store() -> ServiceStore {
        ServiceStore::new(Vec::new(), MemoryBackend::shared())
    }

    fn corte() -> NewService {
        NewService {
            name: "  Corte  ".to_owned(),
            description: None,
            price: Decimal::from(50),
            duration_minutes: 45,
            image_url: None,
        }
    }

    #[test]
    fn add_then_remove_hides_the_service() -> TestResult {
        let store = store();

        let created = store.add(corte())?;

        let visible = store.all();
        assert_eq!(
            visible.first().map(|s| s.name.as_str()),
            Some("Corte"),
            "trimmed name is stored"
        );
        assert_eq!(visible.first().map(|s| s.price), Some(Decimal::from(50)));

        store.remove(&created.id)?;

        assert!(store.all().is_empty(), "removed id leaves the view");
        assert!(store.find(&created.id).is_none());

        Ok(())
    }

    #[test]
    fn remove_twice_equals_once() -> TestResult {
        let store = store();
        let created = store.add(corte())?;

        store.remove(&created.id)?;
        let once = store.all();
        store.remove(&created.id)?;

        assert_eq!(store.all(), once);

        Ok(())
    }

    #[test]
    fn add_applies_defaults() -> TestResult {
        let store = store();

        let created = store.add(corte())?;

        assert_eq!(created.description, "");
        assert_eq!(created.image_url, FALLBACK_IMAGE);

        Ok(())
    }

    #[test]
    fn add_rejects_out_of_range_numbers() {
        let store = store();

        let mut negative = corte();
        negative.price = Decimal::from(-10);
        assert!(
            matches!(store.add(negative), Err(StoreError::NegativePrice)),
            "negative price must be rejected"
        );

        let mut instant = corte();
        instant.duration_minutes = 0;
        assert!(
            matches!(store.add(instant), Err(StoreError::ZeroDuration)),
            "zero duration must be rejected"
        );
    }

    #[test]
    fn update_price_keeps_other_fields() -> TestResult {
        let store = store();
        let created = store.add(corte())?;

        store.update(
            &created.id,
            ServicePatch {
                price: Some(Decimal::from(55)),
                ..ServicePatch::default()
            },
        )?;

        let merged = store.find(&created.id);

        assert_eq!(merged.as_ref().map(|s| s.price), Some(Decimal::from(55)));
        assert_eq!(
            merged.as_ref().map(|s| s.duration_minutes),
            Some(45),
            "unpatched duration survives"
        );

        Ok(())
    }
}
