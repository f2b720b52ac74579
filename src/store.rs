//! On-disk layout and the two top-level operations.
//!
//! A [`Store`] owns the root directory (`~/.pit` unless overridden). Every
//! operation reloads the config document and the active profile file from
//! disk; nothing is cached between calls. Profile data is replaced wholesale
//! through an atomic rename, so a reader never observes a half-written file:
//! a crash mid-write leaves either the old contents or the new contents.
//!
//! Concurrent writers from independent processes are not coordinated; the
//! last rename wins.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::Config;
use crate::{Error, Profile, ProfileSet, Requires, Result, codec, editor};

/// Environment variable overriding the root directory.
///
/// This is the single process-wide knob for redirecting the store, used by
/// tests and embedding tools. [`Store::new`] bypasses it entirely.
pub const ROOT_ENV: &str = "PIT_DIR";

/// Name of the config document inside the root directory.
const CONFIG_FILE: &str = "pit.yaml";

/// A profile store rooted at a fixed directory.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Create a store over an explicit root directory.
    ///
    /// The directory does not need to exist yet; it is created (mode `0700`)
    /// on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a store over the default root: `$PIT_DIR` if set and
    /// non-empty, otherwise `~/.pit`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoHomeDir`] when no override is given and the home
    /// directory cannot be determined.
    pub fn from_env() -> Result<Self> {
        if let Some(dir) = env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(PathBuf::from(dir)));
        }
        let home = dirs::home_dir().ok_or(Error::NoHomeDir)?;
        Ok(Self::new(home.join(".pit")))
    }

    /// The root directory this store reads and writes under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the config document (`<root>/pit.yaml`).
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Path of the active profile file for `config`
    /// (`<root>/<profile>.yaml`).
    pub fn profile_file(&self, config: &Config) -> PathBuf {
        self.root.join(format!("{}.yaml", config.profile))
    }

    /// Create the root directory with mode `0700` if it does not exist yet.
    fn ensure_root(&self) -> Result<()> {
        let mut builder = fs::DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        match builder.create(&self.root) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Read the active profile file as a whole.
    ///
    /// A missing file is an empty [`ProfileSet`], not an error.
    pub fn read_profiles(&self) -> Result<ProfileSet> {
        let config = Config::load(&self.config_file())?;
        self.read_profiles_with(&config)
    }

    fn read_profiles_with(&self, config: &Config) -> Result<ProfileSet> {
        let path = self.profile_file(config);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(ProfileSet::new()),
            Err(err) => return Err(err.into()),
        };
        codec::decode(&bytes).map_err(|source| Error::Codec { path, source })
    }

    /// Replace the active profile file with an encoding of `profiles`.
    ///
    /// The bytes are staged in the OS temp directory and moved into place
    /// with a rename. When the temp directory sits on a different
    /// filesystem the rename fails, and the bytes are re-staged as a
    /// sibling of the target and renamed from there; either way the target
    /// changes in a single step and ends up with mode `0600`.
    fn write_profiles(&self, config: &Config, profiles: &ProfileSet) -> Result<()> {
        let bytes = codec::encode(profiles)?;
        self.ensure_root()?;
        let target = self.profile_file(config);

        let staged = stage(&bytes, None)?;
        if staged.persist(&target).is_err() {
            let sibling = stage(&bytes, Some(&self.root))?;
            sibling
                .persist(&target)
                .map_err(|err| Error::Io(err.error))?;
        }
        Ok(())
    }

    /// Fetch the profile stored under `name`.
    ///
    /// With an empty `requires` this is a plain lookup: an unknown name
    /// yields an empty profile and nothing is written. When `requires`
    /// names keys the stored profile lacks, the profile (seeded with the
    /// prompt text for each missing key) is opened in the user's editor;
    /// the edited document is then decoded, persisted under `name`, and
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoChanges`] when the editor exits without modifying
    /// the scratch file, and [`Error::Editor`] when it cannot be launched
    /// or exits with failure.
    pub fn get(&self, name: &str, requires: &Requires) -> Result<Profile> {
        let config = Config::load(&self.config_file())?;
        let profiles = self.read_profiles_with(&config)?;

        let mut profile = profiles.get(name).cloned().unwrap_or_default();

        let mut missing = false;
        for (key, prompt) in requires {
            if !profile.contains_key(key) {
                profile.insert(key.clone(), prompt.clone());
                missing = true;
            }
        }
        if !missing {
            return Ok(profile);
        }

        let profile = self.fill_in(&profile)?;
        self.set(name, profile.clone())?;
        Ok(profile)
    }

    /// Replace (or insert) the profile stored under `name` with `data`.
    ///
    /// Other profiles in the active file are preserved unchanged.
    pub fn set(&self, name: &str, data: Profile) -> Result<()> {
        let config = Config::load(&self.config_file())?;
        let mut profiles = self.read_profiles_with(&config)?;
        profiles.insert(name.to_string(), data);
        self.write_profiles(&config, &profiles)
    }

    /// Seed a scratch file with `profile`, run the editor on it, and decode
    /// what the user saved.
    ///
    /// The scratch file is deleted when this returns, on every path.
    fn fill_in(&self, profile: &Profile) -> Result<Profile> {
        let bytes = codec::encode(profile)?;
        let scratch = stage(&bytes, None)?;

        if !editor::edit_interactively(scratch.path())? {
            return Err(Error::NoChanges);
        }

        let edited = fs::read(scratch.path())?;
        codec::decode(&edited).map_err(|source| Error::Codec {
            path: scratch.path().to_path_buf(),
            source,
        })
    }
}

/// Write `bytes` to a new scratch file with mode `0600`, in `dir` or the OS
/// temp directory. The file is deleted when the handle is dropped.
fn stage(bytes: &[u8], dir: Option<&Path>) -> Result<NamedTempFile> {
    let mut file = match dir {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new()?,
    };
    file.write_all(bytes)?;
    restrict_mode(file.path())?;
    Ok(file)
}

#[cfg(unix)]
fn restrict_mode(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_mode(_path: &Path) -> io::Result<()> {
    Ok(())
}
