//! Log naming and retention tests.

use sqlkit_launcher::{LOG_SUBDIR, PRUNE_LIMIT, log_file_path, prune_logs_older_than};
use std::{
    fs,
    time::{Duration, SystemTime},
};

#[test]
fn log_path_includes_subdir_prefix_and_pid() {
    let dir = std::path::Path::new("/var/log/host");
    let path = log_file_path(dir, "credentialstore");

    let expected = dir
        .join(LOG_SUBDIR)
        .join(format!("credentialstore_{}.log", std::process::id()));
    assert_eq!(path, expected);
}

#[test]
fn distinct_prefixes_never_collide() {
    let dir = std::path::Path::new("/var/log/host");
    let credentials = log_file_path(dir, "credentialstore");
    let resource = log_file_path(dir, "resourceprovider");
    assert_ne!(credentials, resource);
}

#[test]
fn prune_deletes_only_files_past_cutoff() {
    let tmp = tempfile::tempdir().unwrap();
    let log = tmp.path().join("credentialstore_1.log");
    fs::write(&log, b"x").unwrap();

    // Cutoff in the past: the fresh file is newer, so it survives.
    let past = SystemTime::now() - Duration::from_secs(3600);
    let deleted = prune_logs_older_than(tmp.path(), "credentialstore", past, PRUNE_LIMIT);
    assert!(deleted.is_empty());
    assert!(log.exists());

    // Cutoff in the future: the file is older, so it goes.
    let future = SystemTime::now() + Duration::from_secs(3600);
    let deleted = prune_logs_older_than(tmp.path(), "credentialstore", future, PRUNE_LIMIT);
    assert_eq!(deleted, vec![log.clone()]);
    assert!(!log.exists());
}

#[test]
fn prune_filters_by_prefix_and_extension() {
    let tmp = tempfile::tempdir().unwrap();
    let mine = tmp.path().join("credentialstore_1.log");
    let other = tmp.path().join("resourceprovider_1.log");
    let not_a_log = tmp.path().join("credentialstore_notes.txt");
    for path in [&mine, &other, &not_a_log] {
        fs::write(path, b"x").unwrap();
    }

    let future = SystemTime::now() + Duration::from_secs(3600);
    let deleted = prune_logs_older_than(tmp.path(), "credentialstore", future, PRUNE_LIMIT);

    assert_eq!(deleted, vec![mine.clone()]);
    assert!(!mine.exists());
    assert!(other.exists());
    assert!(not_a_log.exists());
}

#[test]
fn prune_caps_deletions_per_invocation() {
    let tmp = tempfile::tempdir().unwrap();
    for i in 0..120 {
        fs::write(tmp.path().join(format!("credentialstore_{i}.log")), b"x").unwrap();
    }

    let future = SystemTime::now() + Duration::from_secs(3600);
    let deleted = prune_logs_older_than(tmp.path(), "credentialstore", future, PRUNE_LIMIT);
    assert_eq!(deleted.len(), PRUNE_LIMIT);

    let remaining = fs::read_dir(tmp.path()).unwrap().count();
    assert_eq!(remaining, 20);
}

#[test]
fn prune_missing_directory_is_a_noop() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("nope");
    let future = SystemTime::now() + Duration::from_secs(3600);
    let deleted = prune_logs_older_than(&missing, "credentialstore", future, PRUNE_LIMIT);
    assert!(deleted.is_empty());
}
