//! Barbers
//!
//! Staff records carry the panel login credentials. Passwords are plaintext
//! on purpose: this is a demo with no server, and the whole dataset lives in
//! the user's own storage. The one invariant enforced here is that a login
//! handle is unique among the currently visible barbers, both when adding
//! and when editing.

use serde::{Deserialize, Serialize};

use crate::{
    catalog::DEFAULT_AVATAR,
    ids,
    storage::SharedBackend,
    store::{OverlayStore, Record, StoreError, StoreKeys},
};

const KEYS: StoreKeys = StoreKeys {
    additions: "pomade.barbers.additions",
    patches: "pomade.barbers.updates",
    tombstones: None,
};

/// A staff member who can be booked and can sign in to the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barber {
    /// Unique id.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Avatar reference: URL or embedded image data.
    pub avatar: String,

    /// Panel login handle, unique among visible barbers.
    pub login: String,

    /// Panel password, plaintext (demo-grade).
    pub password: String,
}

/// Partial barber edit, applied field by field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BarberPatch {
    /// Replacement display name.
    pub name: Option<String>,

    /// Replacement avatar reference.
    pub avatar: Option<String>,

    /// Replacement login handle.
    pub login: Option<String>,

    /// Replacement password.
    pub password: Option<String>,
}

impl Record for Barber {
    type Patch = BarberPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &Self::Patch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(avatar) = &patch.avatar {
            self.avatar = avatar.clone();
        }
        if let Some(login) = &patch.login {
            self.login = login.clone();
        }
        if let Some(password) = &patch.password {
            self.password = password.clone();
        }
    }

    fn merge(prior: &mut Self::Patch, next: Self::Patch) {
        if next.name.is_some() {
            prior.name = next.name;
        }
        if next.avatar.is_some() {
            prior.avatar = next.avatar;
        }
        if next.login.is_some() {
            prior.login = next.login;
        }
        if next.password.is_some() {
            prior.password = next.password;
        }
    }
}

/// Fields for a new barber; the avatar falls back to the staff default.
#[derive(Debug, Clone)]
pub struct NewBarber {
    /// Display name.
    pub name: String,

    /// Panel login handle.
    pub login: String,

    /// Panel password.
    pub password: String,

    /// Avatar reference; `None` or blank uses the default staff avatar.
    pub avatar: Option<String>,
}

/// Overlay store over the seed barbers. There is no deletion path.
#[derive(Debug)]
pub struct BarberStore {
    inner: OverlayStore<Barber>,
}

impl BarberStore {
    /// Create a store over `seed` with overlays persisted via `backend`.
    pub fn new(seed: Vec<Barber>, backend: SharedBackend) -> Self {
        Self {
            inner: OverlayStore::new(seed, backend, KEYS),
        }
    }

    /// The merged barber view, insertion order.
    pub fn all(&self) -> Vec<Barber> {
        self.inner.all()
    }

    /// Append a new barber with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingField`] if name, login or password is
    /// blank after trimming, [`StoreError::DuplicateLogin`] if a visible
    /// barber already uses the login, or a storage error.
    pub fn add(&self, new: NewBarber) -> Result<Barber, StoreError> {
        let name = new.name.trim().to_owned();
        let login = new.login.trim().to_owned();

        if name.is_empty() {
            return Err(StoreError::MissingField("name"));
        }
        if login.is_empty() {
            return Err(StoreError::MissingField("login"));
        }
        if new.password.is_empty() {
            return Err(StoreError::MissingField("password"));
        }
        if self.all().iter().any(|b| b.login == login) {
            return Err(StoreError::DuplicateLogin(login));
        }

        let avatar = new
            .avatar
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(DEFAULT_AVATAR)
            .to_owned();

        let barber = Barber {
            id: ids::generate("b"),
            name,
            avatar,
            login,
            password: new.password,
        };

        self.inner.push_addition(barber.clone())?;
        Ok(barber)
    }

    /// Record a partial edit for `id`, last write winning per field.
    ///
    /// String fields are trimmed; a blank avatar reverts to the default.
    /// Unknown ids are accepted and store an inert patch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingField`] if a provided name, login or
    /// password is blank, [`StoreError::DuplicateLogin`] if the new login is
    /// used by another visible barber, or a storage error.
    pub fn update(&self, id: &str, patch: BarberPatch) -> Result<(), StoreError> {
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

        let login = match patch.login {
            Some(login) => {
                let login = login.trim().to_owned();
                if login.is_empty() {
                    return Err(StoreError::MissingField("login"));
                }
                if self.all().iter().any(|b| b.login == login && b.id != id) {
                    return Err(StoreError::DuplicateLogin(login));
                }
                Some(login)
            }
            None => None,
        };

        if matches!(&patch.password, Some(p) if p.is_empty()) {
            return Err(StoreError::MissingField("password"));
        }

        let avatar = patch.avatar.map(|avatar| {
            let avatar = avatar.trim().to_owned();
            if avatar.is_empty() {
                DEFAULT_AVATAR.to_owned()
            } else {
                avatar
            }
        });

        self.inner.record_patch(
            id,
            BarberPatch {
                name,
                avatar,
                login,
                password: patch.password,
            },
        )
    }

    /// Find the barber matching `login` and `password` exactly.
    ///
    /// Used by the staff session; returns `None` on any mismatch without
    /// distinguishing unknown logins from wrong passwords.
    pub fn find_by_credentials(&self, login: &str, password: &str) -> Option<Barber> {
        self.all()
            .into_iter()
            .find(|b| b.login == login && b.password == password)
    }
}
