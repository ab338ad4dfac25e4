//! Small command line parser with nested and delegated sub-commands.
//!
//! A program is described with a tree of [`Command`]s. Each command carries
//! options, positional argument placeholders, an optional action and its
//! own sub-commands:
//!
//! ```
//! use lightcmd::{value, Command, Outcome};
//!
//! let mut program = Command::new("pm");
//! program
//!     .version("0.0.1")
//!     .option_with("-j, --jobs <n>", "number of parallel jobs", value::parse::<i64>());
//! program
//!     .command("install <pkg> [pkgs...]")
//!     .alias("i")
//!     .description("install packages")
//!     .action(|inv| {
//!         assert_eq!(inv.arg("pkg").as_str(), Some("serde"));
//!         assert_eq!(inv.arg("pkgs").as_slice(), ["anyhow".to_string()]);
//!         Ok(())
//!     });
//!
//! let outcome = program.parse(["--jobs=4", "i", "serde", "anyhow"]).unwrap();
//! assert_eq!(outcome, Outcome::Dispatched(vec!["install".to_string()]));
//! assert_eq!(program.value("jobs").and_then(|it| it.as_int()), Some(4));
//! ```
//!
//! Help text and running external sub-commands live in [`help`] and [`exec`];
//! the parser itself only hands them data.

use std::ffi::OsString;

use thiserror::Error;

mod arg;
mod cmd;
pub mod event;
pub mod exec;
pub mod help;
mod opt;
mod rt;
pub mod value;

pub use crate::{
    arg::Arg,
    cmd::{Command, CommandOpts, Invocation, Outcome},
    event::Event,
    exec::Delegation,
    opt::{DefinitionError, Opt},
    value::{Bound, Value},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that stops a parse.
///
/// Help and version requests are reported through this type as well, see
/// [`Error::is_help`] and [`Error::exit`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required argument `{0}`")]
    MissingArgument(String),

    #[error("option `{0}` argument missing")]
    MissingOptionArgument(String),

    #[error("unknown option `{0}`")]
    UnknownOption(String),

    #[error("can't parse `{flag}`, {reason}")]
    InvalidValue { flag: String, reason: String },

    #[error("invalid utf8 argument: {0:?}")]
    NonUtf8Argument(OsString),

    /// A handler or listener failed.
    #[error(transparent)]
    Action(anyhow::Error),

    #[error("{0}")]
    Help(String),

    #[error("{0}")]
    Version(String),
}

impl Error {
    pub fn is_help(&self) -> bool {
        matches!(self, Error::Help(_))
    }

    pub fn is_version(&self) -> bool {
        matches!(self, Error::Version(_))
    }

    /// Prints the error and exits the process.
    ///
    /// Help and version go to stdout with status 0, real errors to stderr
    /// with status 1.
    pub fn exit(self) -> ! {
        match self {
            Error::Help(help) => {
                print!("{help}");
                std::process::exit(0)
            }
            Error::Version(version) => {
                println!("{version}");
                std::process::exit(0)
            }
            err => {
                eprintln!("error: {err}");
                std::process::exit(1)
            }
        }
    }
}
