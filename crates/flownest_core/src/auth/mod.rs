//! Local email/password accounts and the current session.
//!
//! # Responsibility
//! - Sign up, sign in and rename local accounts.
//! - Resolve which owner id scopes every collection query.
//!
//! # Invariants
//! - Passwords are stored only as Argon2id PHC strings and never logged.
//! - Emails are unique without regard to ASCII case.
//! - Unknown email and wrong password produce the same error.
//! - Signed out means the guest owner.

use crate::model::{now_epoch_ms, OwnerId, ValidationError, GUEST_OWNER_ID};
use crate::repo::account_repo::{AccountRecord, AccountRepository};
use crate::repo::RepoError;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

mod password;

pub use password::{hash_password, verify_password};

pub const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

#[derive(Debug)]
pub enum AuthError {
    InvalidEmail,
    WeakPassword { min_chars: usize },
    EmailTaken,
    InvalidCredentials,
    NotSignedIn,
    Validation(ValidationError),
    /// Hashing failed or a stored hash is malformed.
    Hash(String),
    Repo(RepoError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "invalid email address"),
            Self::WeakPassword { min_chars } => {
                write!(f, "password must be at least {min_chars} characters")
            }
            Self::EmailTaken => write!(f, "an account with this email already exists"),
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::NotSignedIn => write!(f, "no account is signed in"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Hash(message) => write!(f, "{message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ValidationError> for AuthError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Public view of a signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub owner_id: OwnerId,
    pub email: String,
    pub display_name: String,
}

impl Identity {
    /// Display name, or the part of the email before `@` when unset.
    pub fn label(&self) -> &str {
        if !self.display_name.trim().is_empty() {
            return self.display_name.trim();
        }
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

impl From<AccountRecord> for Identity {
    fn from(value: AccountRecord) -> Self {
        Self {
            owner_id: value.id,
            email: value.email,
            display_name: value.display_name,
        }
    }
}

/// Who is using the dashboard right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    pub fn guest() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_guest(&self) -> bool {
        self.identity.is_none()
    }

    /// Owner id that scopes every collection query.
    pub fn owner_id(&self) -> OwnerId {
        self.identity
            .as_ref()
            .map_or(GUEST_OWNER_ID, |identity| identity.owner_id)
    }
}

pub struct AuthService<R: AccountRepository> {
    repo: R,
}

impl<R: AccountRepository> AuthService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> AuthResult<Identity> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::WeakPassword {
                min_chars: MIN_PASSWORD_CHARS,
            });
        }
        if self.repo.find_by_email(&email)?.is_some() {
            warn!("event=auth_sign_up module=auth status=rejected reason=email_taken");
            return Err(AuthError::EmailTaken);
        }

        let account = AccountRecord {
            id: Uuid::new_v4(),
            email,
            display_name: display_name.map(str::trim).unwrap_or_default().to_string(),
            password_hash: hash_password(password)?,
            created_at: now_epoch_ms(),
        };
        self.repo.create_account(&account)?;
        info!(
            "event=auth_sign_up module=auth status=ok owner_id={}",
            account.id
        );
        Ok(account.into())
    }

    pub fn sign_in(&self, email: &str, password: &str) -> AuthResult<Identity> {
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;
        let Some(account) = self.repo.find_by_email(&email)? else {
            warn!("event=auth_sign_in module=auth status=rejected");
            return Err(AuthError::InvalidCredentials);
        };
        if let Err(err) = verify_password(password, &account.password_hash) {
            warn!("event=auth_sign_in module=auth status=rejected owner_id={}", account.id);
            return Err(err);
        }
        info!("event=auth_sign_in module=auth status=ok owner_id={}", account.id);
        Ok(account.into())
    }

    pub fn update_display_name(&self, owner_id: OwnerId, display_name: &str) -> AuthResult<Identity> {
        let trimmed = display_name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField("display_name").into());
        }
        self.repo.update_display_name(owner_id, trimmed)?;
        info!("event=auth_profile_update module=auth status=ok owner_id={owner_id}");
        self.identity(owner_id)?
            .ok_or(AuthError::Repo(RepoError::NotFound(owner_id)))
    }

    pub fn identity(&self, owner_id: OwnerId) -> AuthResult<Option<Identity>> {
        Ok(self.repo.get_account(owner_id)?.map(Identity::from))
    }
}

fn normalize_email(email: &str) -> AuthResult<String> {
    let trimmed = email.trim();
    if !EMAIL_RE.is_match(trimmed) {
        return Err(AuthError::InvalidEmail);
    }
    Ok(trimmed.to_string())
}
