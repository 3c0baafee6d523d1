// src/session/registry.rs

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use uuid::Uuid;

use super::controller::{Phase, ProgressionController};

struct LearnerSession {
    user_id: i64,
    controller: ProgressionController,
}

/// In-memory sessions of the running server. Nothing here survives a restart.
///
/// A learner holds at most one session per journey, and a session is dropped as
/// soon as it reaches `Phase::Completed`.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<Uuid, LearnerSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new session for `user_id` and returns its id. An earlier session of the
    /// same learner on the same journey is replaced.
    pub fn start(&self, user_id: i64, controller: ProgressionController) -> Uuid {
        let id = Uuid::new_v4();
        let journey_id = controller.journey_id();
        let mut sessions = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        sessions.retain(|_, s| !(s.user_id == user_id && s.controller.journey_id() == journey_id));
        sessions.insert(
            id,
            LearnerSession {
                user_id,
                controller,
            },
        );
        id
    }

    /// Runs `f` on the session if it exists and belongs to `user_id`.
    pub fn with_session<T>(
        &self,
        id: Uuid,
        user_id: i64,
        f: impl FnOnce(&mut ProgressionController) -> T,
    ) -> Option<T> {
        let mut sessions = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let session = sessions.get_mut(&id).filter(|s| s.user_id == user_id)?;
        let out = f(&mut session.controller);

        if session.controller.phase() == Phase::Completed {
            sessions.remove(&id);
            tracing::debug!(user_id, session_id = %id, "Session finished");
        }
        Some(out)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
