//! Current user id for OCC requests
//!
//! OCC addresses users as `anonymous`, `current` (the authenticated user) or
//! an explicit id when an agent acts on behalf of a customer.

use crate::error::OccError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

/// User id of a visitor who is not logged in
pub const OCC_USER_ID_ANONYMOUS: &str = "anonymous";

/// User id of the authenticated user
pub const OCC_USER_ID_CURRENT: &str = "current";

/// Asynchronous source of the current user id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserIdResolver: Send + Sync {
    /// Resolve the user id, waiting until one is known
    async fn user_id(&self) -> Result<String, OccError>;
}

/// Shared, observable user id
///
/// Clones share the same id. A service created with [`Self::pending`] holds
/// resolution back until [`Self::set_user_id`] is called.
#[derive(Debug, Clone)]
pub struct UserIdService {
    sender: Arc<watch::Sender<Option<String>>>,
}

impl UserIdService {
    /// Service starting as the anonymous user
    #[must_use]
    pub fn new() -> Self {
        Self::with_user_id(OCC_USER_ID_ANONYMOUS)
    }

    /// Service starting with an explicit id
    #[must_use]
    pub fn with_user_id(user_id: impl Into<String>) -> Self {
        let (sender, _receiver) = watch::channel(Some(user_id.into()));
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Service with no id yet
    #[must_use]
    pub fn pending() -> Self {
        let (sender, _receiver) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Set the current id
    pub fn set_user_id(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        tracing::debug!(user_id = %user_id, "User id changed");
        self.sender.send_replace(Some(user_id));
    }

    /// Back to the anonymous user
    pub fn clear_user_id(&self) {
        self.set_user_id(OCC_USER_ID_ANONYMOUS);
    }

    /// Current id without waiting
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.sender.borrow().clone()
    }

    /// Whether the current id is the anonymous user
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.sender.borrow().as_deref() == Some(OCC_USER_ID_ANONYMOUS)
    }

    /// Resolve the id, failing for anonymous users when `logged_in` is set
    ///
    /// # Errors
    /// - `OccError::NotLoggedIn` if `logged_in` and the user is anonymous
    /// - `OccError::UserIdUnavailable` if the id source is gone
    pub async fn take_user_id(&self, logged_in: bool) -> Result<String, OccError> {
        let user_id = self.user_id().await?;
        if logged_in && user_id == OCC_USER_ID_ANONYMOUS {
            return Err(OccError::NotLoggedIn);
        }
        Ok(user_id)
    }
}

impl Default for UserIdService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserIdResolver for UserIdService {
    async fn user_id(&self) -> Result<String, OccError> {
        let mut receiver = self.sender.subscribe();
        let user_id = receiver
            .wait_for(Option::is_some)
            .await
            .map_err(|_| OccError::UserIdUnavailable)?;
        user_id.clone().ok_or(OccError::UserIdUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn defaults_to_anonymous() {
        let service = UserIdService::new();
        assert_eq!(service.user_id().await.unwrap(), OCC_USER_ID_ANONYMOUS);
        assert!(service.is_anonymous());
    }

    #[tokio::test]
    async fn set_and_clear() {
        let service = UserIdService::new();
        service.set_user_id(OCC_USER_ID_CURRENT);
        assert_eq!(service.user_id().await.unwrap(), OCC_USER_ID_CURRENT);

        service.clear_user_id();
        assert_eq!(service.current().as_deref(), Some(OCC_USER_ID_ANONYMOUS));
    }

    #[tokio::test]
    async fn pending_waits_for_id() {
        let service = UserIdService::pending();
        let waiter = {
            let service = service.clone();
            tokio::spawn(async move { service.user_id().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        service.set_user_id("agent-42");
        let resolved = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(resolved, "agent-42");
    }

    #[tokio::test]
    async fn take_user_id_requires_login() {
        let service = UserIdService::new();
        assert!(matches!(
            service.take_user_id(true).await,
            Err(OccError::NotLoggedIn)
        ));
        assert_eq!(service.take_user_id(false).await.unwrap(), OCC_USER_ID_ANONYMOUS);
    }
}
