// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{config::Config, ledger::AchievementLedger, session::SessionRegistry, store::Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: SessionRegistry,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            sessions: SessionRegistry::new(),
            config,
        }
    }

    pub fn ledger(&self) -> AchievementLedger {
        AchievementLedger::new(self.store.clone())
    }
}

impl FromRef<AppState> for Arc<dyn Store> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for SessionRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for AchievementLedger {
    fn from_ref(state: &AppState) -> Self {
        state.ledger()
    }
}
