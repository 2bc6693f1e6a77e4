//! [`FakeRunner`]: a scripted, recording [`CommandRunner`].
//!
//! Programs are "installed" by name with a fake absolute path. Responses are
//! chosen by matcher; the most recently added matching rule wins, and an
//! unmatched invocation succeeds with empty output.

use async_trait::async_trait;
use calsync_core::{CommandOutput, CommandRunner, Error, Invocation};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

type Matcher = Box<dyn Fn(&Invocation) -> bool + Send + Sync>;

enum Response {
    Output(CommandOutput),
    SpawnError,
}

struct Rule {
    matcher: Matcher,
    response: Response,
}

#[derive(Default)]
pub struct FakeRunner {
    installed: HashMap<String, PathBuf>,
    rules: Vec<Rule>,
    calls: Mutex<Vec<Invocation>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner with `python3` installed and reporting `Python {version}`.
    pub fn with_python(version: &str) -> Self {
        Self::new().install("python3", "/usr/bin/python3").respond(
            matchers::program_with_arg("python3", "--version"),
            CommandOutput::exited(0).with_stdout(format!("Python {}\n", version)),
        )
    }

    /// Make `name` resolvable on the fake search path.
    pub fn install(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.installed.insert(name.to_string(), path.into());
        self
    }

    pub fn respond(
        mut self,
        matcher: impl Fn(&Invocation) -> bool + Send + Sync + 'static,
        output: CommandOutput,
    ) -> Self {
        self.rules.push(Rule {
            matcher: Box::new(matcher),
            response: Response::Output(output),
        });
        self
    }

    /// Matching invocations exit with `code`.
    pub fn fail(
        self,
        matcher: impl Fn(&Invocation) -> bool + Send + Sync + 'static,
        code: i32,
    ) -> Self {
        self.respond(matcher, CommandOutput::exited(code))
    }

    /// Matching invocations cannot be started at all.
    pub fn refuse_spawn(
        mut self,
        matcher: impl Fn(&Invocation) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.rules.push(Rule {
            matcher: Box::new(matcher),
            response: Response::SpawnError,
        });
        self
    }

    /// Every invocation run so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matcher: impl Fn(&Invocation) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|i| matcher(*i)).count()
    }

    pub fn was_called(&self, matcher: impl Fn(&Invocation) -> bool) -> bool {
        self.count(matcher) > 0
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    fn find(&self, program: &str) -> Option<PathBuf> {
        self.installed.get(program).cloned()
    }

    async fn run(&self, invocation: &Invocation) -> calsync_core::Result<CommandOutput> {
        self.calls.lock().unwrap().push(invocation.clone());

        let rule = self.rules.iter().rev().find(|rule| (rule.matcher)(invocation));
        match rule.map(|r| &r.response) {
            Some(Response::Output(output)) => Ok(output.clone()),
            Some(Response::SpawnError) => Err(Error::Spawn {
                command: invocation.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted spawn failure"),
            }),
            None => Ok(CommandOutput::exited(0)),
        }
    }
}

/// Invocation matchers for [`FakeRunner`] rules and call assertions.
pub mod matchers {
    use calsync_core::Invocation;

    /// Program file name equals `name`.
    pub fn program(name: &str) -> impl Fn(&Invocation) -> bool + Send + Sync + 'static {
        let name = name.to_string();
        move |inv| inv.program_name() == name
    }

    /// Program file name equals `name` and `arg` is among the arguments.
    pub fn program_with_arg(
        name: &str,
        arg: &str,
    ) -> impl Fn(&Invocation) -> bool + Send + Sync + 'static {
        let name = name.to_string();
        let arg = arg.to_string();
        move |inv| inv.program_name() == name && inv.has_arg(&arg)
    }

    /// Any argument ends with `suffix`, e.g. the config path.
    pub fn arg_ending_with(suffix: &str) -> impl Fn(&Invocation) -> bool + Send + Sync + 'static {
        let suffix = suffix.to_string();
        move |inv| inv.args.iter().any(|a| a.ends_with(&suffix))
    }

    /// The pip self-upgrade.
    pub fn pip_upgrade() -> impl Fn(&Invocation) -> bool + Send + Sync + 'static {
        move |inv| inv.has_arg("pip") && inv.has_arg("--upgrade")
    }

    /// The manifest install.
    pub fn pip_install_manifest() -> impl Fn(&Invocation) -> bool + Send + Sync + 'static {
        move |inv| inv.has_arg("pip") && inv.has_arg("-r")
    }

    /// The configuration initializer.
    pub fn initializer() -> impl Fn(&Invocation) -> bool + Send + Sync + 'static {
        move |inv| inv.has_arg("src/init_conf.py")
    }

    /// The scheduler registrar.
    pub fn scheduler() -> impl Fn(&Invocation) -> bool + Send + Sync + 'static {
        move |inv| inv.program_name() == "schedule_sync.sh"
    }

    /// The launcher, i.e. the initial sync.
    pub fn launcher() -> impl Fn(&Invocation) -> bool + Send + Sync + 'static {
        move |inv| inv.program_name() == "run_sync.sh"
    }
}
