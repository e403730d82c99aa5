// src/state.rs

use std::sync::Arc;

use crate::{config::Config, models::attempt::AttemptRegistry, store::Store};
use axum::extract::FromRef;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub attempts: AttemptRegistry,
    /// Held across load-modify-save of the question bank.
    pub bank_lock: Arc<Mutex<()>>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            attempts: AttemptRegistry::default(),
            bank_lock: Arc::new(Mutex::new(())),
            config,
        }
    }
}

impl FromRef<AppState> for Arc<dyn Store> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for AttemptRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.attempts.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
