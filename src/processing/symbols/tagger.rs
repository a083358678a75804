// src/processing/symbols/tagger.rs

//! Process plumbing for the external tagger.
//!
//! A [`TagEngine`] starts one tagger run per batch and hands back a
//! [`TagStream`] of raw output lines. Dropping a stream before it reached the
//! end kills and reaps the process, so an early stop never leaves an orphan.

use crate::cancellation::CancellationToken;
use crate::constants::{CTAGS_ENV_VAR, DEFAULT_CTAGS_PROGRAM};
use crate::errors::{Error, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, warn};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

/// How long the stream waits for a line before re-checking cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// One step of a tagger's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A raw output line without its trailing newline.
    Line(String),
    /// The process closed its output.
    End,
    /// The cancellation token fired while waiting.
    Cancelled,
}

/// Output of one running tagger process.
pub trait TagStream {
    /// Blocks until the next line, the end of output, or cancellation.
    fn next_event(&mut self, token: &CancellationToken) -> StreamEvent;

    /// Waits for the process to exit after [`StreamEvent::End`].
    ///
    /// Returns a description of the exit status if the process terminated abnormally.
    fn finish(&mut self) -> Option<String>;
}

/// Starts tagger runs over batches of absolute file paths.
pub trait TagEngine {
    /// Program name used in logs and errors.
    fn program(&self) -> &str;

    /// Starts the tagger on `files`.
    ///
    /// # Errors
    /// Returns [`Error::TaggerSpawn`] if the process cannot be started.
    fn run(&self, files: &[PathBuf]) -> Result<Box<dyn TagStream + '_>>;
}

/// Universal Ctags emitting JSON lines.
#[derive(Debug, Clone)]
pub struct CtagsEngine {
    program: PathBuf,
    program_name: String,
}

impl CtagsEngine {
    /// Uses the given ctags executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let program_name = program.display().to_string();
        Self {
            program,
            program_name,
        }
    }

    /// Resolves the executable with [`locate_ctags`].
    pub fn locate(explicit: Option<&Path>) -> Self {
        Self::new(locate_ctags(explicit))
    }
}

impl TagEngine for CtagsEngine {
    fn program(&self) -> &str {
        &self.program_name
    }

    fn run(&self, files: &[PathBuf]) -> Result<Box<dyn TagStream + '_>> {
        debug!(
            "Starting {} on {} file(s).",
            self.program_name,
            files.len()
        );
        let mut child = Command::new(&self.program)
            .args([
                "--output-format=json",
                "--sort=no",
                "--fields=+n",
                "-f",
                "-",
            ])
            .args(files)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| Error::TaggerSpawn {
                program: self.program_name.clone(),
                source,
            })?;

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::TaggerSpawn {
                    program: self.program_name.clone(),
                    source: std::io::Error::other("stdout was not captured"),
                });
            }
        };

        let (tx, rx) = crossbeam_channel::unbounded();
        let pump = std::thread::spawn(move || {
            let mut reader = BufReader::new(stdout);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => {
                        let line = String::from_utf8_lossy(&buf)
                            .trim_end_matches(['\r', '\n'])
                            .to_string();
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Error reading tagger output: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(Box::new(ProcessStream {
            child,
            lines: rx,
            pump: Some(pump),
            reaped: false,
        }))
    }
}

struct ProcessStream {
    child: Child,
    lines: Receiver<String>,
    pump: Option<JoinHandle<()>>,
    reaped: bool,
}

impl ProcessStream {
    fn join_pump(&mut self) {
        if let Some(pump) = self.pump.take() {
            if pump.join().is_err() {
                warn!("Tagger output reader thread panicked.");
            }
        }
    }
}

impl TagStream for ProcessStream {
    fn next_event(&mut self, token: &CancellationToken) -> StreamEvent {
        loop {
            if token.is_cancelled() {
                return StreamEvent::Cancelled;
            }
            match self.lines.recv_timeout(POLL_INTERVAL) {
                Ok(line) => return StreamEvent::Line(line),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return StreamEvent::End,
            }
        }
    }

    fn finish(&mut self) -> Option<String> {
        self.join_pump();
        self.reaped = true;
        match self.child.wait() {
            Ok(status) if status.success() => None,
            Ok(status) => Some(status.to_string()),
            Err(e) => Some(format!("wait failed: {}", e)),
        }
    }
}

impl Drop for ProcessStream {
    fn drop(&mut self) {
        if !self.reaped {
            debug!("Stopping tagger process {} early.", self.child.id());
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
        self.join_pump();
    }
}

/// Resolves the ctags executable.
///
/// Lookup order: `explicit`, the `SENTIAL_CTAGS` environment variable, a
/// bundled `bin/ctags-<os>-<arch>-*` next to the running executable, then
/// `ctags` on `PATH`.
pub fn locate_ctags(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(path) = std::env::var_os(CTAGS_ENV_VAR).filter(|v| !v.is_empty()) {
        return PathBuf::from(path);
    }
    if let Some(path) = bundled_ctags() {
        return path;
    }
    PathBuf::from(DEFAULT_CTAGS_PROGRAM)
}

fn bundled_ctags() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let bin_dir = exe.parent()?.join("bin");
    find_bundled_ctags(&bin_dir)
}

/// Last match (in lexical order) of `ctags-<os>-<arch>-*` inside `bin_dir`.
pub(crate) fn find_bundled_ctags(bin_dir: &Path) -> Option<PathBuf> {
    let (os, arch) = platform_tag();
    let dir = glob::Pattern::escape(&bin_dir.to_string_lossy());
    let pattern = format!("{}/ctags-{}-{}-*", dir, os, arch);
    let mut matches: Vec<PathBuf> = glob::glob(&pattern)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    matches.sort();
    matches.pop()
}

fn platform_tag() -> (&'static str, &'static str) {
    let os = match std::env::consts::OS {
        "macos" => "macos",
        "windows" => "windows",
        _ => "linux",
    };
    let arch = match std::env::consts::ARCH {
        "aarch64" if os == "macos" => "arm64",
        "aarch64" => "aarch64",
        _ => "x86_64",
    };
    (os, arch)
}

/// One canned tagger run for [`ScriptedTagEngine`].
#[doc(hidden)]
#[derive(Debug, Clone)]
pub enum ScriptedRun {
    /// The process starts, prints `lines` and exits successfully or not.
    Output {
        /// Raw output lines.
        lines: Vec<String>,
        /// Whether the exit status is zero.
        success: bool,
    },
    /// The process cannot be started.
    SpawnFailure,
}

impl ScriptedRun {
    /// A successful run printing one JSON tag per `(path, kind, name)`.
    pub fn tags<P: AsRef<Path>>(tags: &[(P, &str, &str)]) -> Self {
        ScriptedRun::Output {
            lines: tags
                .iter()
                .map(|(path, kind, name)| {
                    serde_json::json!({
                        "_type": "tag",
                        "name": name,
                        "path": path.as_ref().to_string_lossy(),
                        "kind": kind,
                    })
                    .to_string()
                })
                .collect(),
            success: true,
        }
    }

    /// A run that exits abnormally without printing anything.
    pub fn crash() -> Self {
        ScriptedRun::Output {
            lines: Vec::new(),
            success: false,
        }
    }
}

/// Test double that replays canned runs and records every dispatched batch.
///
/// Once the script is used up, further runs print nothing and succeed.
#[doc(hidden)]
#[derive(Debug, Default)]
pub struct ScriptedTagEngine {
    runs: RefCell<VecDeque<ScriptedRun>>,
    batches: RefCell<Vec<Vec<PathBuf>>>,
}

impl ScriptedTagEngine {
    /// Replays `runs` in order.
    pub fn new(runs: impl IntoIterator<Item = ScriptedRun>) -> Self {
        Self {
            runs: RefCell::new(runs.into_iter().collect()),
            batches: RefCell::new(Vec::new()),
        }
    }

    /// File lists passed to each run, including failed spawns.
    pub fn batches(&self) -> Vec<Vec<PathBuf>> {
        self.batches.borrow().clone()
    }
}

impl TagEngine for ScriptedTagEngine {
    fn program(&self) -> &str {
        "scripted-ctags"
    }

    fn run(&self, files: &[PathBuf]) -> Result<Box<dyn TagStream + '_>> {
        self.batches.borrow_mut().push(files.to_vec());
        let run = self
            .runs
            .borrow_mut()
            .pop_front()
            .unwrap_or(ScriptedRun::Output {
                lines: Vec::new(),
                success: true,
            });
        match run {
            ScriptedRun::SpawnFailure => Err(Error::TaggerSpawn {
                program: self.program().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted spawn failure"),
            }),
            ScriptedRun::Output { lines, success } => Ok(Box::new(ScriptedStream {
                lines: lines.into(),
                success,
            })),
        }
    }
}

struct ScriptedStream {
    lines: VecDeque<String>,
    success: bool,
}

impl TagStream for ScriptedStream {
    fn next_event(&mut self, token: &CancellationToken) -> StreamEvent {
        if token.is_cancelled() {
            return StreamEvent::Cancelled;
        }
        match self.lines.pop_front() {
            Some(line) => StreamEvent::Line(line),
            None => StreamEvent::End,
        }
    }

    fn finish(&mut self) -> Option<String> {
        if self.success {
            None
        } else {
            Some("exit status: 1".to_string())
        }
    }
}
