//! Running sub-commands implemented by other executables.
//!
//! `git remote` registered as an external command of `git` runs the
//! `git-remote` executable with whatever arguments are left over.

use std::{
    env, io,
    path::PathBuf,
    process::{self, ExitStatus},
};

/// Everything needed to run an external sub-command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegation {
    /// The delegating program, with the names of the in-process
    /// sub-commands leading to it joined by `-`.
    pub program: String,
    pub command: String,
    /// Positional arguments after the command name.
    pub args: Vec<String>,
    /// Options nobody in this process recognized.
    pub unknown: Vec<String>,
    /// The full argument vector handed to the parser.
    pub raw: Vec<String>,
}

impl Delegation {
    pub fn executable(&self) -> String {
        if self.program.is_empty() {
            return self.command.clone();
        }
        format!("{}-{}", self.program, self.command)
    }

    /// Arguments for the executable: positionals first, then unknown options.
    pub fn argv(&self) -> Vec<String> {
        self.args.iter().chain(&self.unknown).cloned().collect()
    }

    /// Prefers an executable next to the current one, then falls back to
    /// `PATH`.
    pub fn locate(&self) -> PathBuf {
        let name = format!("{}{}", self.executable(), env::consts::EXE_SUFFIX);
        let sibling = env::current_exe().ok().and_then(|it| it.parent().map(|dir| dir.join(&name)));
        match sibling {
            Some(it) if it.is_file() => it,
            _ => PathBuf::from(name),
        }
    }

    pub fn to_command(&self) -> process::Command {
        let mut cmd = process::Command::new(self.locate());
        cmd.args(self.argv());
        cmd
    }

    pub fn run(&self) -> io::Result<ExitStatus> {
        tracing::debug!(executable = %self.executable(), argv = ?self.argv(), "spawning");
        self.to_command().status()
    }

    /// Runs the executable and exits with its status.
    pub fn exec_or_exit(&self) -> ! {
        match self.run() {
            Ok(status) => process::exit(status.code().unwrap_or(1)),
            Err(err) => {
                let exe = self.executable();
                match err.kind() {
                    io::ErrorKind::NotFound => eprintln!("error: `{exe}` does not exist, try --help"),
                    io::ErrorKind::PermissionDenied => eprintln!("error: `{exe}` is not executable"),
                    _ => eprintln!("error: failed to run `{exe}`: {err}"),
                }
                process::exit(127)
            }
        }
    }
}
