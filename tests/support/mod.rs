// ABOUTME: Test support utilities.
// ABOUTME: Scripted fakes for the runner, shell, connector, and prompter seams.

// Each test binary only uses some of these helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use vnollx_deploy::config::Settings;
use vnollx_deploy::exec::{self, CommandOutput, CommandRunner};
use vnollx_deploy::prompt::Prompter;
use vnollx_deploy::ssh::{self, Connector, RemoteShell, SessionConfig};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("vnollx_deploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn ok_output() -> CommandOutput {
    CommandOutput {
        exit_code: 0,
        stdout: String::new(),
        stderr: String::new(),
    }
}

pub fn failed_output(stderr: &str) -> CommandOutput {
    CommandOutput {
        exit_code: 1,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// Settings fixture pointing at a key file the test controls; no
/// environment reads involved.
pub fn test_settings(key_path: PathBuf) -> Settings {
    Settings {
        registry_user: "vnollx".to_string(),
        remote_host: "111.230.105.54".to_string(),
        remote_user: "root".to_string(),
        remote_port: 22,
        trust_first_connection: false,
        key_path,
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub command: String,
    pub cwd: Option<PathBuf>,
}

#[derive(Default)]
struct RunnerState {
    calls: Mutex<Vec<RecordedCall>>,
    failures: Mutex<Vec<(String, CommandOutput)>>,
}

/// Local command-runner fake: records every invocation and returns scripted
/// results, success by default. Clones share the same recorded state.
#[derive(Default, Clone)]
pub struct ScriptedRunner {
    state: Arc<RunnerState>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any command whose argv contains `fragment` returns `output`.
    pub fn fail_when(&self, fragment: &str, output: CommandOutput) {
        self.state
            .failures
            .lock()
            .unwrap()
            .push((fragment.to_string(), output));
    }

    pub fn commands(&self) -> Vec<String> {
        self.state
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|call| call.command.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> exec::Result<CommandOutput> {
        let command = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.state.calls.lock().unwrap().push(RecordedCall {
            command: command.clone(),
            cwd: cwd.map(Path::to_path_buf),
        });

        for (fragment, output) in self.state.failures.lock().unwrap().iter() {
            if command.contains(fragment.as_str()) {
                return Ok(output.clone());
            }
        }
        Ok(ok_output())
    }
}

/// Shared observable state of a scripted remote shell.
#[derive(Default)]
pub struct ShellState {
    commands: Mutex<Vec<String>>,
    closes: AtomicUsize,
    failures: Mutex<Vec<(String, CommandOutput)>>,
}

impl ShellState {
    pub fn fail_when(&self, fragment: &str, output: CommandOutput) {
        self.failures
            .lock()
            .unwrap()
            .push((fragment.to_string(), output));
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// Remote shell fake over a shared [`ShellState`].
pub struct ScriptedShell {
    state: Arc<ShellState>,
}

impl ScriptedShell {
    pub fn new(state: Arc<ShellState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl RemoteShell for ScriptedShell {
    async fn exec(&mut self, command: &str) -> ssh::Result<CommandOutput> {
        self.state
            .commands
            .lock()
            .unwrap()
            .push(command.to_string());

        for (fragment, output) in self.state.failures.lock().unwrap().iter() {
            if command.contains(fragment.as_str()) {
                return Ok(output.clone());
            }
        }
        Ok(ok_output())
    }

    async fn close(&mut self) -> ssh::Result<()> {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Connector fake handing out shells over one shared state, optionally
/// refusing to connect at all. Clones share the same state.
#[derive(Default, Clone)]
pub struct ScriptedConnector {
    state: Arc<ShellState>,
    refuse: Arc<AtomicBool>,
    connects: Arc<AtomicUsize>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shell_state(&self) -> &ShellState {
        &self.state
    }

    pub fn refuse_connection(&self) {
        self.refuse.store(true, Ordering::SeqCst);
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    type Shell = ScriptedShell;

    async fn connect(&self, _config: &SessionConfig) -> ssh::Result<ScriptedShell> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.refuse.load(Ordering::SeqCst) {
            return Err(ssh::Error::Connection("scripted refusal".to_string()));
        }
        Ok(ScriptedShell::new(Arc::clone(&self.state)))
    }
}

/// Prompter fake returning queued answers.
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
}

impl ScriptedPrompter {
    pub fn with_answers(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, _question: &str) -> io::Result<String> {
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left")
        })
    }
}
