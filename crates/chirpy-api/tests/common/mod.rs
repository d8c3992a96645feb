//! Shared fixtures for the service-level tests.

use std::path::PathBuf;

use chirpy_api::config::Config;
use chirpy_api::{AppState, AppStateInner};

pub struct TestApp {
    pub state: AppState,
    dir: PathBuf,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config<F>(adjust: F) -> Self
    where
        F: FnOnce(&mut Config),
    {
        chirpy_api::telemetry::init_tracing(chirpy_api::telemetry::DEFAULT_FILTER);

        let dir = std::env::temp_dir().join(format!("chirpy-api-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");

        let mut config = Config {
            db_path: dir.join("database.json"),
            ..Config::default()
        };
        adjust(&mut config);
        let state = AppStateInner::open(config).expect("open state");
        Self { state, dir }
    }

    /// A second handle on the same data file, as after a restart.
    #[allow(dead_code)]
    pub fn restart(&self) -> AppState {
        AppStateInner::open(self.state.config.clone()).expect("reopen state")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}
