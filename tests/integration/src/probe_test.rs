//! Runtime discovery against real executables on a private search path.

#![cfg(unix)]

use calsync_core::{BootstrapError, EnvironmentProbe, RuntimeVersion, SystemRunner};
use pretty_assertions::assert_eq;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

fn install_script(bin: &Path, name: &str, body: &str) {
    let path = bin.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[tokio::test]
async fn test_probe_prefers_python3() {
    let bin = TempDir::new().unwrap();
    install_script(bin.path(), "python3", "echo 'Python 3.12.1'");
    install_script(bin.path(), "python", "echo 'Python 2.7.18'");
    let runner = SystemRunner::with_search_path(bin.path());

    let runtime = EnvironmentProbe::new().probe(&runner).await.unwrap();

    assert_eq!(runtime.program, "python3");
    assert_eq!(runtime.version, RuntimeVersion::new(3, 12));
    assert_eq!(runtime.version_line, "Python 3.12.1");
    assert!(runtime.path.starts_with(bin.path()));
}

#[tokio::test]
async fn test_probe_falls_back_to_python() {
    let bin = TempDir::new().unwrap();
    install_script(bin.path(), "python", "echo 'Python 3.10.0'");
    let runner = SystemRunner::with_search_path(bin.path());

    let runtime = EnvironmentProbe::new().probe(&runner).await.unwrap();

    assert_eq!(runtime.program, "python");
}

#[tokio::test]
async fn test_probe_reads_version_from_stderr() {
    let bin = TempDir::new().unwrap();
    install_script(bin.path(), "python3", "echo 'Python 3.7.17' >&2");
    let runner = SystemRunner::with_search_path(bin.path());

    let runtime = EnvironmentProbe::new().probe(&runner).await.unwrap();

    assert_eq!(runtime.version, RuntimeVersion::new(3, 7));
}

#[tokio::test]
async fn test_first_found_candidate_decides_even_when_too_old() {
    let bin = TempDir::new().unwrap();
    install_script(bin.path(), "python3", "echo 'Python 3.6.15'");
    install_script(bin.path(), "python", "echo 'Python 3.11.0'");
    let runner = SystemRunner::with_search_path(bin.path());

    let err = EnvironmentProbe::new().probe(&runner).await.unwrap_err();

    assert!(matches!(err, BootstrapError::RuntimeTooOld { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_failing_version_query_is_unreadable() {
    let bin = TempDir::new().unwrap();
    install_script(bin.path(), "python3", "exit 9");
    let runner = SystemRunner::with_search_path(bin.path());

    let err = EnvironmentProbe::new().probe(&runner).await.unwrap_err();

    assert!(
        matches!(err, BootstrapError::RuntimeVersionUnreadable { .. }),
        "got {err:?}"
    );
    assert!(err.to_string().contains("status 9"));
}

#[tokio::test]
async fn test_empty_search_path_finds_nothing() {
    let bin = TempDir::new().unwrap();
    let runner = SystemRunner::with_search_path(bin.path());

    let err = EnvironmentProbe::new().probe(&runner).await.unwrap_err();

    assert!(matches!(err, BootstrapError::RuntimeNotFound { .. }));
    assert!(err.to_string().contains("python3, python"));
}

#[tokio::test]
async fn test_non_executable_file_is_not_a_runtime() {
    let bin = TempDir::new().unwrap();
    fs::write(bin.path().join("python3"), "not a program").unwrap();
    let runner = SystemRunner::with_search_path(bin.path());

    let err = EnvironmentProbe::new().probe(&runner).await.unwrap_err();

    assert!(matches!(err, BootstrapError::RuntimeNotFound { .. }));
}
