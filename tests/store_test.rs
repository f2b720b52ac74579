//! End-to-end tests for the profile store: lookups, round-trips, and the
//! on-disk layout, without any editor involvement.

mod common;

use common::{TempDir, TestEnv};
use pit::{Config, Error, Profile, Requires};
use serial_test::serial;
use std::fs;

fn profile(entries: &[(&str, &str)]) -> Profile {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_get_unknown_name_in_empty_root() {
    let env = TestEnv::new();

    let result = env.store().get("example.com", &Requires::new()).unwrap();

    assert!(result.is_empty());
    // A pure lookup must not create anything on disk.
    assert_eq!(fs::read_dir(env.path()).unwrap().count(), 0);
}

#[test]
fn test_set_then_get_roundtrip() {
    let env = TestEnv::new();
    let store = env.store();
    let written = profile(&[
        ("username", "example-user"),
        ("password", "example-password"),
    ]);

    store.set("example.com", written.clone()).unwrap();
    let read = store.get("example.com", &Requires::new()).unwrap();

    assert_eq!(read, written);
}

#[test]
fn test_prepopulated_file_is_read_and_preserved() {
    let env = TestEnv::new();
    let store = env.store();
    fs::write(
        env.path().join("default.yaml"),
        "a.example.com:\n  username: alice\nb.example.com:\n  token: xyz\n",
    )
    .unwrap();

    let second = store.get("b.example.com", &Requires::new()).unwrap();
    assert_eq!(second, profile(&[("token", "xyz")]));

    store
        .set("a.example.com", profile(&[("username", "bob")]))
        .unwrap();

    let profiles = store.read_profiles().unwrap();
    assert_eq!(profiles["a.example.com"], profile(&[("username", "bob")]));
    assert_eq!(profiles["b.example.com"], profile(&[("token", "xyz")]));
}

#[test]
fn test_config_selects_the_active_profile_file() {
    let env = TestEnv::new();
    let store = env.store();
    fs::write(env.path().join("pit.yaml"), "profile: work\n").unwrap();

    store
        .set("example.com", profile(&[("username", "hoge")]))
        .unwrap();

    assert!(env.path().join("work.yaml").exists());
    assert!(!env.path().join("default.yaml").exists());

    let read = store.get("example.com", &Requires::new()).unwrap();
    assert_eq!(read, profile(&[("username", "hoge")]));
}

#[test]
fn test_malformed_config_is_a_config_error() {
    let env = TestEnv::new();
    fs::write(env.path().join("pit.yaml"), "profile: [oops\n").unwrap();

    let err = env
        .store()
        .get("example.com", &Requires::new())
        .unwrap_err();

    assert!(matches!(err, Error::Config { .. }));
}

#[test]
fn test_rewrite_replaces_the_file_wholly() {
    let env = TestEnv::new();
    let store = env.store();

    store
        .set("example.com", profile(&[("username", "old"), ("extra", "x")]))
        .unwrap();
    store
        .set("example.com", profile(&[("username", "new")]))
        .unwrap();

    let bytes = fs::read(env.path().join("default.yaml")).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("new"));
    assert!(!text.contains("extra"));

    let read = store.get("example.com", &Requires::new()).unwrap();
    assert_eq!(read, profile(&[("username", "new")]));
}

#[test]
#[serial]
fn test_root_override_env_drives_the_free_functions() {
    let dir = TempDir::new().unwrap();
    unsafe { std::env::set_var("PIT_DIR", dir.path()) };

    pit::set("a.example.com", profile(&[("username", "alice")])).unwrap();
    pit::set("b.example.com", profile(&[("token", "xyz")])).unwrap();

    let a = pit::get("a.example.com", &Requires::new()).unwrap();
    let b = pit::get("b.example.com", &Requires::new()).unwrap();

    unsafe { std::env::remove_var("PIT_DIR") };

    assert_eq!(a, profile(&[("username", "alice")]));
    assert_eq!(b, profile(&[("token", "xyz")]));
}

#[test]
#[cfg(unix)]
fn test_written_layout_has_restricted_modes() {
    use std::os::unix::fs::PermissionsExt;

    let parent = TempDir::new().unwrap();
    let root = parent.path().join("pit-root");
    let store = pit::Store::new(&root);

    store
        .set("example.com", profile(&[("password", "secret")]))
        .unwrap();

    let dir_mode = fs::metadata(&root).unwrap().permissions().mode();
    assert_eq!(dir_mode & 0o777, 0o700);

    let file = store.profile_file(&Config::default());
    let file_mode = fs::metadata(&file).unwrap().permissions().mode();
    assert_eq!(file_mode & 0o777, 0o600);
}
