//! Full bootstrap runs against real child processes.
//!
//! A fake `python3` on a private search path records its arguments; the
//! scheduler script and the generated launcher are executed for real.

#![cfg(unix)]

use calsync_core::{ErrorKind, Orchestrator, Phase, SystemRunner, Termination};
use calsync_fs::SetupPath;
use calsync_test_utils::TestWorkspace;
use pretty_assertions::assert_eq;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

struct Engine {
    ws: TestWorkspace,
    bin: TempDir,
}

impl Engine {
    /// Engine checkout whose scheduler drops a marker file when it runs.
    fn new() -> Self {
        let ws = TestWorkspace::engine_checkout();
        ws.write(
            "scripts/schedule_sync.sh",
            "#!/bin/sh\necho registered > scheduled.marker\n",
        );
        let engine = Self {
            ws,
            bin: TempDir::new().unwrap(),
        };
        engine.install_python("3.11.4", "");
        engine
    }

    /// `hook` is spliced in after the call is logged.
    fn install_python(&self, version: &str, hook: &str) {
        let script = format!(
            "#!/bin/sh\n\
             if [ \"$1\" = \"--version\" ]; then echo \"Python {version}\"; exit 0; fi\n\
             echo \"$*\" >> '{log}'\n\
             if [ \"$1\" = \"main.py\" ]; then pwd > synced.marker; fi\n\
             {hook}\n\
             exit 0\n",
            log = self.log_path().display(),
        );
        make_executable(&self.bin.path().join("python3"), &script);
    }

    fn log_path(&self) -> PathBuf {
        self.bin.path().join("calls.log")
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.log_path())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    async fn bootstrap(&self) -> calsync_core::BootstrapReport {
        let runner = Arc::new(SystemRunner::with_search_path(self.bin.path()));
        Orchestrator::new(self.ws.context(), runner).run().await
    }
}

fn make_executable(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[tokio::test]
async fn test_scaffold_then_edit_then_complete() {
    let engine = Engine::new();

    let first = engine.bootstrap().await;
    assert_eq!(first.termination(), Termination::AwaitingEdit);
    engine.ws.assert_file_exists("config.ini");
    engine.ws.assert_file_not_exists("scheduled.marker");
    engine.ws.assert_file_not_exists("synced.marker");

    engine
        .ws
        .write_config("abc", "Work", &[("db_1", "realid123")]);
    let second = engine.bootstrap().await;

    assert_eq!(second.termination(), Termination::Completed);
    assert_eq!(second.exit_code(), 0);
    engine.ws.assert_file_exists("scheduled.marker");
    engine.ws.assert_file_exists("synced.marker");
}

#[tokio::test]
async fn test_child_processes_see_expected_arguments() {
    let engine = Engine::new();
    engine
        .ws
        .write_config("abc", "Work", &[("db_1", "realid123")]);

    engine.bootstrap().await;

    let config = engine.ws.path("config.ini");
    assert_eq!(
        engine.calls(),
        vec![
            "-m pip install --upgrade pip".to_string(),
            "-m pip install -r requirements.txt".to_string(),
            format!("src/init_conf.py {}", config.display()),
            "main.py".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_initializer_reads_ini_document_beside_its_sources() {
    let engine = Engine::new();
    engine.install_python(
        "3.11.4",
        "if [ \"$1\" = \"src/init_conf.py\" ]; then\n\
         \x20 [ -f config.ini ] || exit 3\n\
         \x20 grep -q '^\\[global\\]$' config.ini || exit 4\n\
         \x20 grep -q '^token = abc$' config.ini || exit 5\n\
         \x20 grep -q '^db_1 = realid123$' config.ini || exit 6\n\
         fi",
    );
    engine
        .ws
        .write_config("abc", "Work", &[("db_1", "realid123")]);

    let report = engine.bootstrap().await;

    assert!(report.fatal.is_none(), "got {:?}", report.fatal);
    assert_eq!(report.termination(), Termination::Completed);
}

#[tokio::test]
async fn test_launcher_runs_engine_from_its_checkout() {
    let engine = Engine::new();
    engine
        .ws
        .write_config("abc", "Work", &[("db_1", "realid123")]);

    engine.bootstrap().await;

    let launcher = engine.ws.read(SetupPath::Launcher.as_str());
    assert!(launcher.starts_with("#!/bin/sh\n"));
    assert!(launcher.contains(&engine.bin.path().join("python3").display().to_string()));

    let mode = fs::metadata(engine.ws.path("run_sync.sh"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o111, 0o111);

    let synced_from = engine.ws.read("synced.marker");
    let root = fs::canonicalize(engine.ws.root()).unwrap();
    assert_eq!(PathBuf::from(synced_from.trim()), root);
}

#[tokio::test]
async fn test_rerun_leaves_identical_artifacts() {
    let engine = Engine::new();
    engine
        .ws
        .write_config("abc", "Work", &[("db_1", "realid123")]);
    let config_before = engine.ws.read("config.ini");

    engine.bootstrap().await;
    let launcher_first = engine.ws.read("run_sync.sh");
    engine.bootstrap().await;

    assert_eq!(engine.ws.read("run_sync.sh"), launcher_first);
    assert_eq!(engine.ws.read("config.ini"), config_before);
}

#[tokio::test]
async fn test_failing_scheduler_script_does_not_stop_sync() {
    let engine = Engine::new();
    engine.ws.write("scripts/schedule_sync.sh", "#!/bin/sh\nexit 5\n");
    engine
        .ws
        .write_config("abc", "Work", &[("db_1", "realid123")]);

    let report = engine.bootstrap().await;

    assert!(report.has_warning(ErrorKind::SchedulerRegistrationFailed));
    assert!(report.warnings[0].to_string().contains("status 5"));
    assert_eq!(report.termination(), Termination::Completed);
    engine.ws.assert_file_exists("synced.marker");
}

#[tokio::test]
async fn test_failing_engine_reports_sync_failure() {
    let engine = Engine::new();
    engine.install_python("3.11.4", "if [ \"$1\" = \"main.py\" ]; then exit 2; fi");
    engine
        .ws
        .write_config("abc", "Work", &[("db_1", "realid123")]);

    let report = engine.bootstrap().await;

    assert_eq!(report.termination(), Termination::SyncFailed);
    assert_eq!(report.exit_code(), 1);
    engine.ws.assert_file_exists("scheduled.marker");
}

#[tokio::test]
async fn test_failing_pip_stops_everything() {
    let engine = Engine::new();
    engine.install_python("3.11.4", "if [ \"$2\" = \"pip\" ]; then exit 1; fi");
    engine
        .ws
        .write_config("abc", "Work", &[("db_1", "realid123")]);

    let report = engine.bootstrap().await;

    assert_eq!(report.final_phase, Phase::FatalExit);
    assert_eq!(
        report.fatal.as_ref().map(|e| e.kind()),
        Some(ErrorKind::DependencyInstallFailed)
    );
    assert_eq!(engine.calls(), vec!["-m pip install --upgrade pip".to_string()]);
    engine.ws.assert_file_not_exists("run_sync.sh");
    engine.ws.assert_file_not_exists("scheduled.marker");
}
