//! The root config document.
//!
//! `<root>/pit.yaml` selects which profile file is active. The document is
//! read on every operation and is never written by this crate; an absent
//! file means the defaults apply.
//!
//! # Schema
//!
//! ```yaml
//! profile: default
//! ```
//!
//! `profile` names the active profile file's basename (without extension).
//! Unknown keys are ignored.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, codec};

fn default_profile() -> String {
    "default".to_string()
}

/// Settings read from `pit.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Basename (without extension) of the active profile file.
    #[serde(default = "default_profile")]
    pub profile: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: default_profile(),
        }
    }
}

impl Config {
    /// Load the config document at `path`.
    ///
    /// A missing file yields the default config; a file that exists but
    /// does not decode yields [`Error::Config`].
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(err.into()),
        };
        codec::decode(&bytes).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
