//! Simulated sign-in.
//!
//! No credential is ever checked: a login or registration mints a user on the
//! spot and remembers it as the active session. Swap in another
//! [`IdentityProvider`] to verify identities for real.

use crate::kv::KvStore;
use crate::model::{User, UserRole};
use thiserror::Error;
use uuid::Uuid;

pub const SESSION_KEY: &str = "edutrack_user";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid email: {0:?}")]
    InvalidEmail(String),
    #[error("name must not be empty")]
    EmptyName,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub trait IdentityProvider {
    fn login(&self, email: &str, role: UserRole) -> Result<User, SessionError>;
    fn register(&self, name: &str, email: &str, role: UserRole) -> Result<User, SessionError>;
    fn logout(&self) -> Result<(), SessionError>;
    fn current(&self) -> Option<User>;
}

pub struct MockIdentityProvider<K> {
    kv: K,
}

impl<K: KvStore> MockIdentityProvider<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    fn persist(&self, user: &User) -> Result<(), SessionError> {
        let payload = serde_json::to_string(user).map_err(anyhow::Error::from)?;
        self.kv.set(SESSION_KEY, &payload)?;
        tracing::info!(user_id = %user.id, role = ?user.role, "session started");
        Ok(())
    }
}

impl<K: KvStore> IdentityProvider for MockIdentityProvider<K> {
    fn login(&self, email: &str, role: UserRole) -> Result<User, SessionError> {
        let email = validate_email(email)?;
        let local = email.split('@').next().unwrap_or_default();
        let user = mint_user(local.to_uppercase(), email, role);
        self.persist(&user)?;
        Ok(user)
    }

    fn register(&self, name: &str, email: &str, role: UserRole) -> Result<User, SessionError> {
        let email = validate_email(email)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        let user = mint_user(name.to_string(), email, role);
        self.persist(&user)?;
        Ok(user)
    }

    fn logout(&self) -> Result<(), SessionError> {
        self.kv.remove(SESSION_KEY)?;
        tracing::info!("session cleared");
        Ok(())
    }

    fn current(&self) -> Option<User> {
        let raw = match self.kv.get(SESSION_KEY) {
            Ok(v) => v?,
            Err(e) => {
                tracing::warn!(error = %e, "session read failed");
                return None;
            }
        };
        serde_json::from_str(&raw).ok()
    }
}

fn validate_email(raw: &str) -> Result<&str, SessionError> {
    let t = raw.trim();
    match t.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(t),
        _ => Err(SessionError::InvalidEmail(raw.to_string())),
    }
}

fn mint_user(name: String, email: &str, role: UserRole) -> User {
    let uuid = Uuid::new_v4();
    let id: String = uuid.simple().to_string().chars().take(9).collect();
    let student_id = match role {
        UserRole::Student => Some(mint_student_id(&uuid)),
        UserRole::Teacher => None,
    };
    User {
        id,
        name,
        email: email.to_string(),
        role,
        student_id,
    }
}

/// `STU-NNNN` with NNNN in 1000..=9999.
fn mint_student_id(uuid: &Uuid) -> String {
    let bytes = uuid.as_bytes();
    let n = u16::from_le_bytes([bytes[0], bytes[1]]) % 9000 + 1000;
    format!("STU-{}", n)
}
