//! In-memory user registry backed by a [`UserStore`].
//!
//! The registry is the only owner of user records and of the rule that
//! identifiers are unique. Every successful mutation writes the full
//! collection through the store before returning. When that write fails
//! the error is returned but the in-memory change is kept.

use crate::store::{JsonFileStore, UserStore};
use crate::{Error, Result, UserRecord};
use std::collections::HashSet;

pub struct UserRegistry<S = JsonFileStore> {
    users: Vec<UserRecord>,
    store: S,
}

impl<S: UserStore> UserRegistry<S> {
    /// Load the registry from `store`
    ///
    /// Records that would break the registry invariants (non-positive
    /// weight, repeated identifier) are dropped with a warning. The first
    /// occurrence of an identifier wins. Activities with negative energy
    /// are dropped from otherwise valid users.
    pub fn open(store: S) -> Self {
        let mut seen = HashSet::new();
        let users: Vec<UserRecord> = store
            .load()
            .into_iter()
            .filter_map(|mut user| {
                if !(user.body_weight() > 0.0 && user.body_weight().is_finite()) {
                    tracing::warn!(
                        "Skipping stored user {:?} with invalid weight {}",
                        user.identifier(),
                        user.body_weight()
                    );
                    return None;
                }
                if !seen.insert(user.identifier().to_string()) {
                    tracing::warn!("Skipping duplicate stored user {:?}", user.identifier());
                    return None;
                }
                let dropped = user.drop_invalid_activities();
                if dropped > 0 {
                    tracing::warn!(
                        "Skipping {} stored activities with invalid energy for {:?}",
                        dropped,
                        user.identifier()
                    );
                }
                Some(user)
            })
            .collect();

        tracing::info!("Opened registry with {} users", users.len());
        Self { users, store }
    }

    /// Create a user with an empty history and persist the registry
    pub fn create_user(&mut self, identifier: &str, body_weight: f64) -> Result<&UserRecord> {
        if self.find_user(identifier).is_ok() {
            return Err(Error::DuplicateIdentifier(identifier.to_string()));
        }
        let user = UserRecord::new(identifier, body_weight)?;

        self.users.push(user);
        tracing::info!("Created user {:?} ({} kg)", identifier, body_weight);
        self.persist()?;

        Ok(&self.users[self.users.len() - 1])
    }

    /// Exact, case-sensitive lookup
    pub fn find_user(&self, identifier: &str) -> Result<&UserRecord> {
        self.users
            .iter()
            .find(|user| user.identifier() == identifier)
            .ok_or_else(|| Error::NotFound(identifier.to_string()))
    }

    pub(crate) fn find_user_mut(&mut self, identifier: &str) -> Result<&mut UserRecord> {
        self.users
            .iter_mut()
            .find(|user| user.identifier() == identifier)
            .ok_or_else(|| Error::NotFound(identifier.to_string()))
    }

    /// Identifiers in creation order
    pub fn list_identifiers(&self) -> Vec<String> {
        self.users
            .iter()
            .map(|user| user.identifier().to_string())
            .collect()
    }

    /// Every user, in creation order
    pub fn all(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Write the full collection through the store
    pub(crate) fn persist(&self) -> Result<()> {
        self.store.save(&self.users).map_err(|e| {
            tracing::error!("Failed to persist {} users: {}", self.users.len(), e);
            e
        })
    }
}
