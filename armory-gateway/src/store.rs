//! In-memory registries for payload records, users, and sessions.
//!
//! The payload registry is the only shared mutable resource in the service;
//! each method takes and releases its lock inside one call, which is the
//! whole single-record atomicity story this service needs.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use armory_core::{GenerationStatus, Payload, PayloadId, User, UserId};
use indexmap::IndexMap;
use uuid::Uuid;

/// Registry of payload records, insertion-ordered.
///
/// Insertion order doubles as chronological history, so a user's listing
/// comes back oldest-first without a sort.
#[derive(Debug, Default)]
pub struct PayloadStore {
    records: RwLock<IndexMap<PayloadId, Payload>>,
}

impl PayloadStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist a new record and return its id. Synchronous; the id is
    /// observable as soon as this returns.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned (a previous thread
    /// panicked while holding the write lock).
    pub fn insert(&self, payload: Payload) -> PayloadId {
        let id = payload.id;
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        self.records
            .write()
            .expect("payload store write lock poisoned")
            .insert(id, payload);
        id
    }

    /// Ownership-checked lookup. A record that does not exist and a record
    /// owned by someone else are indistinguishable to the caller.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn get_owned(&self, id: PayloadId, owner: UserId) -> Option<Payload> {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let records = self
            .records
            .read()
            .expect("payload store read lock poisoned");
        records.get(&id).filter(|p| p.user_id == owner).cloned()
    }

    /// Ownership-checked delete. A missing or foreign id is a silent no-op;
    /// deletion is idempotent.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn remove_owned(&self, id: PayloadId, owner: UserId) {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let mut records = self
            .records
            .write()
            .expect("payload store write lock poisoned");
        if records.get(&id).is_some_and(|p| p.user_id == owner) {
            records.shift_remove(&id);
        }
    }

    /// The owner's records in creation order.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn history(&self, owner: UserId) -> Vec<Payload> {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let records = self
            .records
            .read()
            .expect("payload store read lock poisoned");
        records
            .values()
            .filter(|p| p.user_id == owner)
            .cloned()
            .collect()
    }

    /// Attach the generator's artifact path and mark the record generated.
    /// The one post-creation mutation on the success path.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn attach_artifact(&self, id: PayloadId, file_path: PathBuf) {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let mut records = self
            .records
            .write()
            .expect("payload store write lock poisoned");
        if let Some(payload) = records.get_mut(&id) {
            payload.file_path = Some(file_path);
            payload.status = GenerationStatus::Generated;
        }
    }

    /// Record a generation failure; the record stays in history.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn mark_failed(&self, id: PayloadId, reason: String) {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let mut records = self
            .records
            .write()
            .expect("payload store write lock poisoned");
        if let Some(payload) = records.get_mut(&id) {
            payload.status = GenerationStatus::Failed { reason };
        }
    }

    /// Total number of records, all owners.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let records = self
            .records
            .read()
            .expect("payload store read lock poisoned");
        records.len()
    }

    /// `true` if no records exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registry of users.
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl UserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn insert(&self, user: User) {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        self.users
            .write()
            .expect("user store write lock poisoned")
            .insert(user.id, user);
    }

    /// Look up a user by id.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn get(&self, id: UserId) -> Option<User> {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let users = self.users.read().expect("user store read lock poisoned");
        users.get(&id).cloned()
    }

    /// Look up a user by login name.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn by_username(&self, username: &str) -> Option<User> {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let users = self.users.read().expect("user store read lock poisoned");
        users.values().find(|u| u.username == username).cloned()
    }

    /// Store a new credential for the user. Returns `false` if the user is
    /// unknown.
    ///
    /// # Errors
    /// Returns [`armory_core::CoreError::PasswordHash`] if hashing fails.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn update_password(
        &self,
        id: UserId,
        new_password: &str,
    ) -> Result<bool, armory_core::CoreError> {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let mut users = self.users.write().expect("user store write lock poisoned");
        match users.get_mut(&id) {
            Some(user) => {
                user.set_password(new_password)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Bearer-token session registry.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, UserId>>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token for the user.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn issue(&self, user_id: UserId) -> Uuid {
        let token = Uuid::new_v4();
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        self.sessions
            .write()
            .expect("session store write lock poisoned")
            .insert(token, user_id);
        token
    }

    /// Resolve a token to its user, if the session exists.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn resolve(&self, token: Uuid) -> Option<UserId> {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let sessions = self
            .sessions
            .read()
            .expect("session store read lock poisoned");
        sessions.get(&token).copied()
    }
}
