//! Common test utilities for pit integration tests.
//!
//! Provides `TestEnv` for isolated store roots that don't touch the user's
//! `~/.pit` directory.

#![allow(dead_code)]

pub use tempfile::TempDir;

use pit::Store;

/// A profile-store root isolated in a temp directory.
pub struct TestEnv {
    pub root: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an isolated root.
    pub fn new() -> Self {
        Self {
            root: TempDir::new().unwrap(),
        }
    }

    /// A store over the isolated root.
    pub fn store(&self) -> Store {
        Store::new(self.root.path())
    }

    /// Path of the isolated root.
    pub fn path(&self) -> &std::path::Path {
        self.root.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
