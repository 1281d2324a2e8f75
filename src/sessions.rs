//! Session contexts
//!
//! Two independent single-identity sessions, each backed by one persisted
//! record: the staff panel session (a barber) and the customer session.
//! The customer side also owns the self-service account registry. The
//! barber store is passed in at login time as an explicit collaborator;
//! the session never reaches into other stores on its own.
//!
//! Authentication is demo-grade throughout: plaintext comparison, no
//! hashing, no tokens.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    barbers::BarberStore,
    storage::{SharedBackend, StorageError, read_json, write_json},
};

const STAFF_KEY: &str = "pomade.session.staff";
const CUSTOMER_KEY: &str = "pomade.session.customer";
const ACCOUNTS_KEY: &str = "pomade.customers";

const MIN_PASSWORD_LEN: usize = 6;

/// Login and registration failures, surfaced as messages, never panics.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Staff credential pair matched no barber. Deliberately generic:
    /// unknown login and wrong password are indistinguishable.
    #[error("login ou senha incorretos")]
    InvalidCredentials,

    /// No customer account with this e-mail.
    #[error("e-mail não cadastrado")]
    UnknownEmail,

    /// Account exists but the password does not match.
    #[error("senha incorreta")]
    WrongPassword,

    /// A required registration field was blank.
    #[error("{0} é obrigatório")]
    MissingField(&'static str),

    /// The registration password is shorter than six characters.
    #[error("a senha deve ter no mínimo 6 caracteres")]
    PasswordTooShort,

    /// The registration password and its confirmation differ.
    #[error("as senhas não coincidem")]
    PasswordMismatch,

    /// The e-mail is already registered.
    #[error("este e-mail já está cadastrado")]
    EmailTaken,

    /// The session record could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The signed-in barber, minus the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffIdentity {
    /// Barber id.
    pub id: String,

    /// Barber display name.
    pub name: String,

    /// Avatar reference.
    pub avatar: String,

    /// Login handle.
    pub login: String,
}

/// Staff panel session; at most one barber signed in at a time.
#[derive(Debug)]
pub struct StaffSession {
    backend: SharedBackend,
    current: Option<StaffIdentity>,
}

impl StaffSession {
    /// Load the session, restoring any persisted identity.
    pub fn new(backend: SharedBackend) -> Self {
        let current: Option<StaffIdentity> = read_json(&backend, STAFF_KEY);
        Self { backend, current }
    }

    /// The signed-in barber, if any.
    #[must_use]
    pub fn current(&self) -> Option<&StaffIdentity> {
        self.current.as_ref()
    }

    /// Sign in with a panel login and password, scanning `barbers`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on any mismatch, or a
    /// storage error if the session record cannot be persisted.
    pub fn login(
        &mut self,
        barbers: &BarberStore,
        login: &str,
        password: &str,
    ) -> Result<StaffIdentity, AuthError> {
        let barber = barbers
            .find_by_credentials(login, password)
            .ok_or(AuthError::InvalidCredentials)?;

        let identity = StaffIdentity {
            id: barber.id,
            name: barber.name,
            avatar: barber.avatar,
            login: barber.login,
        };
        write_json(&self.backend, STAFF_KEY, &Some(identity.clone()))?;
        self.current = Some(identity.clone());
        Ok(identity)
    }

    /// Sign out, clearing the persisted record.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the record cannot be removed.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.current = None;
        self.backend.delete(STAFF_KEY)
    }
}

/// The signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerIdentity {
    /// Customer display name.
    pub name: String,

    /// Account e-mail, lower-cased.
    pub email: String,
}

/// A registered customer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CustomerAccount {
    name: String,
    email: String,
    password: String,
}

/// Customer session plus the self-service account registry.
#[derive(Debug)]
pub struct CustomerSession {
    backend: SharedBackend,
    current: Option<CustomerIdentity>,
}

impl CustomerSession {
    /// Load the session, restoring any persisted identity.
    pub fn new(backend: SharedBackend) -> Self {
        let current: Option<CustomerIdentity> = read_json(&backend, CUSTOMER_KEY);
        Self { backend, current }
    }

    /// The signed-in customer, if any.
    #[must_use]
    pub fn current(&self) -> Option<&CustomerIdentity> {
        self.current.as_ref()
    }

    fn accounts(&self) -> Vec<CustomerAccount> {
        read_json(&self.backend, ACCOUNTS_KEY)
    }

    fn sign_in(&mut self, identity: CustomerIdentity) -> Result<CustomerIdentity, AuthError> {
        write_json(&self.backend, CUSTOMER_KEY, &Some(identity.clone()))?;
        self.current = Some(identity.clone());
        Ok(identity)
    }

    /// Create an account and sign in. E-mails are stored lower-cased and
    /// must be unique among registered accounts.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] for blank name or e-mail, a short password,
    /// a mismatched confirmation, a taken e-mail, or a storage failure.
    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<CustomerIdentity, AuthError> {
        let name = name.trim().to_owned();
        let email = email.trim().to_lowercase();

        if name.is_empty() {
            return Err(AuthError::MissingField("nome"));
        }
        if email.is_empty() {
            return Err(AuthError::MissingField("e-mail"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort);
        }
        if password != confirm {
            return Err(AuthError::PasswordMismatch);
        }

        let mut accounts = self.accounts();
        if accounts.iter().any(|a| a.email.to_lowercase() == email) {
            return Err(AuthError::EmailTaken);
        }

        accounts.push(CustomerAccount {
            name: name.clone(),
            email: email.clone(),
            password: password.to_owned(),
        });
        write_json(&self.backend, ACCOUNTS_KEY, &accounts)?;

        self.sign_in(CustomerIdentity { name, email })
    }

    /// Sign in with e-mail (case-insensitive) and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnknownEmail`] or [`AuthError::WrongPassword`]
    /// on mismatch, or a storage error if the session record cannot be
    /// persisted.
    pub fn login(&mut self, email: &str, password: &str) -> Result<CustomerIdentity, AuthError> {
        let wanted = email.trim().to_lowercase();
        let accounts = self.accounts();
        let account = accounts
            .iter()
            .find(|a| a.email.to_lowercase() == wanted)
            .ok_or(AuthError::UnknownEmail)?;

        if account.password != password {
            return Err(AuthError::WrongPassword);
        }

        self.sign_in(CustomerIdentity {
            name: account.name.clone(),
            email: account.email.clone(),
        })
    }

    /// Sign out, clearing the persisted record.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the record cannot be removed.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.current = None;
        self.backend.delete(CUSTOMER_KEY)
    }
}
