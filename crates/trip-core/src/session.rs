//! Session manager — holds the authenticated identity and mirrors it
//! into browser local storage (`token` + cached `user`).
//!
//! Storage is read once at startup and written on login/logout; it is
//! not observed reactively afterwards.

use std::cell::RefCell;
use std::rc::Rc;

use trip_types::{
    config::keys,
    session::{Session, User},
    Result,
};

use crate::ports::StoragePort;

pub struct SessionManager {
    storage: Rc<dyn StoragePort>,
    session: RefCell<Option<Session>>,
}

impl SessionManager {
    pub fn new(storage: Rc<dyn StoragePort>) -> Self {
        Self {
            storage,
            session: RefCell::new(None),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.session.borrow().as_ref().map(|s| s.token.clone())
    }

    /// Restore a cached session from local storage, if both the token
    /// and the user record are present and the user still decodes.
    pub async fn restore(&self) -> Option<Session> {
        let token = self.storage.get(keys::TOKEN).await.ok()??;
        let user_json = self.storage.get(keys::USER).await.ok()??;
        let user: User = match serde_json::from_str(&user_json) {
            Ok(user) => user,
            Err(e) => {
                log::warn!("cached user record is unreadable: {}", e);
                return None;
            }
        };

        let session = Session::new(user, token);
        *self.session.borrow_mut() = Some(session.clone());
        log::info!("session restored for user {}", session.user_id());
        Some(session)
    }

    /// Install a fresh session (login response) and persist it.
    pub async fn establish(&self, session: Session) -> Result<()> {
        self.storage.set(keys::TOKEN, &session.token).await?;
        self.storage
            .set(keys::USER, &serde_json::to_string(&session.user)?)
            .await?;
        *self.session.borrow_mut() = Some(session);
        Ok(())
    }

    /// Refresh the cached user record (profile edits) without touching
    /// the credential.
    pub async fn update_user(&self, user: User) -> Result<()> {
        self.storage
            .set(keys::USER, &serde_json::to_string(&user)?)
            .await?;
        if let Some(session) = self.session.borrow_mut().as_mut() {
            session.user = user;
        }
        Ok(())
    }

    /// Destroy the session: logout or an unauthorized response.
    pub async fn clear(&self) {
        *self.session.borrow_mut() = None;
        let _ = self.storage.delete(keys::TOKEN).await;
        let _ = self.storage.delete(keys::USER).await;
        log::info!("session cleared");
    }
}
