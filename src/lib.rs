//! Pit - a per-user store of named credential/config profiles.
//!
//! Profiles are string key/value maps kept in YAML files under `~/.pit`. A
//! caller asks for a profile by name and may declare required keys; when
//! some are missing, the store opens the user's `$EDITOR` on a scratch
//! document pre-seeded with prompts, then persists whatever the user saved.
//! Quitting the editor without saving means "no" and surfaces as
//! [`Error::NoChanges`].
//!
//! ```no_run
//! use pit::Requires;
//!
//! let mut requires = Requires::new();
//! requires.insert("username".to_string(), "username on example.com".to_string());
//! requires.insert("password".to_string(), "password on example.com".to_string());
//!
//! let profile = pit::get("example.com", &requires)?;
//! println!("signing in as {}", profile["username"]);
//! # Ok::<(), pit::Error>(())
//! ```

mod codec;
pub mod config;
mod editor;
pub mod store;

pub use config::Config;
pub use store::Store;

use std::collections::BTreeMap;

/// A single named collection of string key/value entries, e.g. the
/// credentials for one host.
pub type Profile = BTreeMap<String, String>;

/// The on-disk mapping from profile name to [`Profile`]; one per active
/// profile file.
pub type ProfileSet = BTreeMap<String, Profile>;

/// Required keys mapped to the human-readable prompts used to pre-seed the
/// editor scratch file.
pub type Requires = BTreeMap<String, String>;

/// Library-level error type for pit operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid profile data in {}: {}", .path.display(), .source)]
    Codec {
        path: std::path::PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config file {}: {}", .path.display(), .source)]
    Config {
        path: std::path::PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("editor `{command}` failed: {reason}")]
    Editor { command: String, reason: String },

    /// The user exited the editor without modifying the scratch file.
    #[error("no changes")]
    NoChanges,

    /// No `PIT_DIR` override and no home directory to anchor `~/.pit`.
    #[error("could not determine the home directory")]
    NoHomeDir,
}

/// Result type alias for pit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fetch the profile stored under `name` from the default store,
/// interactively filling in any missing `requires` keys through the user's
/// editor.
///
/// See [`Store::get`] for the full contract.
pub fn get(name: &str, requires: &Requires) -> Result<Profile> {
    Store::from_env()?.get(name, requires)
}

/// Replace the profile stored under `name` in the default store with
/// `data`.
///
/// See [`Store::set`].
pub fn set(name: &str, data: Profile) -> Result<()> {
    Store::from_env()?.set(name, data)
}
