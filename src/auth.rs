//! Auth Provider
//!
//! Supplies the signed-in user whose id scopes every document read and write.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use okr_remote_lib::domain::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable across sessions
    pub id: String,
    #[serde(default)]
    pub display_name: String,
}

impl User {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Called with the new user (or `None` after sign-out)
pub type AuthListener = Box<dyn Fn(Option<&User>) + Send + Sync>;

type SharedListener = Arc<dyn Fn(Option<&User>) + Send + Sync>;

#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;

    fn on_change(&self, listener: AuthListener);

    async fn sign_in(&self) -> DomainResult<User>;

    async fn sign_out(&self) -> DomainResult<()>;
}

/// Single configured local user
pub struct LocalAuth {
    user: User,
    current: Mutex<Option<User>>,
    listeners: Mutex<Vec<SharedListener>>,
}

impl LocalAuth {
    pub fn new(user: User) -> Self {
        Self {
            user,
            current: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
        }
    }

    fn set_current(&self, user: Option<User>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = user.clone();
        // listeners run unlocked so they may register further listeners
        let listeners: Vec<SharedListener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in &listeners {
            listener(user.as_ref());
        }
    }
}

#[async_trait]
impl AuthProvider for LocalAuth {
    fn current_user(&self) -> Option<User> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn on_change(&self, listener: AuthListener) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::from(listener));
    }

    async fn sign_in(&self) -> DomainResult<User> {
        if self.user.id.trim().is_empty() {
            return Err(DomainError::Validation("user id must not be empty".to_string()));
        }
        log::info!("signed in as {}", self.user.id);
        self.set_current(Some(self.user.clone()));
        Ok(self.user.clone())
    }

    async fn sign_out(&self) -> DomainResult<()> {
        if self.current_user().is_some() {
            log::info!("signed out {}", self.user.id);
        }
        self.set_current(None);
        Ok(())
    }
}
