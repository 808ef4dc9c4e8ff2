//! Thread-safe handle to a registry.
//!
//! Every operation takes the same mutex, so a mutation and its paired
//! write to the store complete before the next caller sees the registry.

use crate::registry::UserRegistry;
use crate::store::{JsonFileStore, UserStore};
use crate::{ExerciseKind, Result, UserRecord, WeightChange};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct SharedRegistry<S = JsonFileStore> {
    inner: Arc<Mutex<UserRegistry<S>>>,
}

impl<S> Clone for SharedRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: UserStore> SharedRegistry<S> {
    pub fn new(registry: UserRegistry<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, UserRegistry<S>> {
        // A panic mid-operation leaves the registry as consistent as a
        // failed persist does, so keep serving it
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` with exclusive access to the registry
    pub fn with<T>(&self, f: impl FnOnce(&mut UserRegistry<S>) -> T) -> T {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    pub fn create_user(&self, identifier: &str, body_weight: f64) -> Result<UserRecord> {
        self.lock().create_user(identifier, body_weight).cloned()
    }

    pub fn find_user(&self, identifier: &str) -> Result<UserRecord> {
        self.lock().find_user(identifier).cloned()
    }

    pub fn list_identifiers(&self) -> Vec<String> {
        self.lock().list_identifiers()
    }

    pub fn all(&self) -> Vec<UserRecord> {
        self.lock().all().to_vec()
    }

    pub fn record(
        &self,
        identifier: &str,
        kind: ExerciseKind,
        energy_kcal: f64,
    ) -> Result<UserRecord> {
        self.lock().record(identifier, kind, energy_kcal).cloned()
    }

    pub fn change_weight(&self, identifier: &str, new_weight: f64) -> Result<WeightChange> {
        self.lock().change_weight(identifier, new_weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::thread;

    #[test]
    fn test_concurrent_records_are_not_lost() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("users.json");

        let shared = SharedRegistry::new(UserRegistry::open(JsonFileStore::new(&path)));
        shared.create_user("alice", 70.0).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..5 {
                        shared.record("alice", ExerciseKind::Crunches, 1.0).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.find_user("alice").unwrap().history().len(), 40);

        let reopened = UserRegistry::open(JsonFileStore::new(&path));
        assert_eq!(reopened.find_user("alice").unwrap().history().len(), 40);
    }

    #[test]
    fn test_concurrent_creates_keep_identifiers_unique() {
        let temp_dir = tempfile::tempdir().unwrap();
        let shared = SharedRegistry::new(UserRegistry::open(JsonFileStore::new(
            temp_dir.path().join("users.json"),
        )));

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || shared.create_user("same", 60.0))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let created = results.iter().filter(|r| r.is_ok()).count();
        let duplicates = results
            .iter()
            .filter(|r| matches!(r, Err(Error::DuplicateIdentifier(_))))
            .count();

        assert_eq!(created, 1);
        assert_eq!(duplicates, 5);
        assert_eq!(shared.list_identifiers(), vec!["same"]);
    }

    #[test]
    fn test_with_gives_registry_access() {
        let temp_dir = tempfile::tempdir().unwrap();
        let shared = SharedRegistry::new(UserRegistry::open(JsonFileStore::new(
            temp_dir.path().join("users.json"),
        )));
        shared.create_user("alice", 70.0).unwrap();

        let count = shared.with(|registry| registry.len());
        assert_eq!(count, 1);
        assert_eq!(shared.all().len(), 1);
    }
}
