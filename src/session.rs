//! Session accessor.
//!
//! The invocation client only ever reads the current user; storage of the
//! session belongs to whoever implements [`SessionAccessor`].

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};

use crate::config::schema::SessionConfig;

/// The locally stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalUser {
    pub email: Option<String>,
    pub access_token: Option<String>,
}

impl LocalUser {
    /// Bearer credential, if the user carries a non-empty one.
    pub fn bearer_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Synchronous read access to the current session.
pub trait SessionAccessor: Send + Sync {
    fn local_user(&self) -> Option<Arc<LocalUser>>;
}

/// In-memory session that can be replaced atomically on login/logout.
#[derive(Default)]
pub struct MemorySession {
    user: ArcSwapOption<LocalUser>,
}

impl MemorySession {
    pub fn new(user: Option<LocalUser>) -> Self {
        Self {
            user: ArcSwapOption::from(user.map(Arc::new)),
        }
    }

    /// Seed from configuration; no user when neither field is set.
    pub fn from_config(config: &SessionConfig) -> Self {
        if config.email.is_none() && config.access_token.is_none() {
            return Self::default();
        }
        Self::new(Some(LocalUser {
            email: config.email.clone(),
            access_token: config.access_token.clone(),
        }))
    }

    pub fn login(&self, user: LocalUser) {
        tracing::info!(email = ?user.email, "Session user set");
        self.user.store(Some(Arc::new(user)));
    }

    pub fn logout(&self) {
        self.user.store(None);
    }
}

impl SessionAccessor for MemorySession {
    fn local_user(&self) -> Option<Arc<LocalUser>> {
        self.user.load_full()
    }
}
