//! Shell error types and diagnostic formatting.
//!
//! Two kinds of failure flow through the evaluator: syntax errors, which
//! are printed bare, and everything else, which is printed prefixed with
//! the program name and, for system-call failures, suffixed with the
//! `strerror(3)` text for the captured errno.

use std::ffi::CStr;
use std::fmt;
use std::num::IntErrorKind;

use thiserror::Error;

/// A captured `errno` value, rendered through `strerror(3)` so that
/// diagnostics carry the C library's wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Errno(pub i32);

impl Errno {
    /// Snapshot the calling thread's current errno.
    pub fn last() -> Self {
        Errno(std::io::Error::last_os_error().raw_os_error().unwrap_or(0))
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ptr = unsafe { libc::strerror(self.0) };
        if ptr.is_null() {
            write!(f, "unknown error {}", self.0)
        } else {
            let msg = unsafe { CStr::from_ptr(ptr) }.to_string_lossy();
            f.write_str(&msg)
        }
    }
}

/// Errors detected while parsing a command line.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("syntax error: unclosed quotation")]
    UnclosedQuote,
    #[error("syntax error: missing redirection target")]
    MissingRedirTarget,
}

/// Any failure that aborts evaluation of one command.
#[derive(Debug, Error)]
pub enum ShellError {
    Syntax(#[from] SyntaxError),
    /// A system call failed in the shell process.
    Sys {
        call: &'static str,
        arg: Option<String>,
        errno: Errno,
    },
    /// An operand that should have been a small integer was not.
    BadNumber(&'static str),
    /// Filename matching failed for a reason other than "no match".
    Glob(String),
}

impl ShellError {
    pub fn sys(call: &'static str) -> Self {
        ShellError::Sys { call, arg: None, errno: Errno::last() }
    }

    pub fn sys_with(call: &'static str, arg: impl Into<String>) -> Self {
        ShellError::Sys { call, arg: Some(arg.into()), errno: Errno::last() }
    }
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Syntax(e) => write!(f, "{e}"),
            ShellError::Sys { call, arg: Some(arg), errno } => {
                write!(f, "{call} {arg}: {errno}")
            }
            ShellError::Sys { call, arg: None, errno } => write!(f, "{call}: {errno}"),
            ShellError::BadNumber(what) => {
                write!(f, "converting string to integer: {what}")
            }
            ShellError::Glob(msg) => write!(f, "glob: {msg}"),
        }
    }
}

/// Print one diagnostic the way the shell reports everything: syntax
/// errors bare, anything else prefixed with the program name.
pub fn print_diag(argv0: &str, err: &ShellError) {
    match err {
        ShellError::Syntax(e) => eprintln!("{e}"),
        other => eprintln!("{argv0}: {other}"),
    }
}

/// `"<name>: <message>"` on stderr, the builtin diagnostic form.
pub fn diag(name: &str, msg: impl fmt::Display) {
    eprintln!("{name}: {msg}");
}

/// Strict string-to-int conversion with the classic diagnostics.
pub fn parse_int(s: &str) -> Result<i32, ShellError> {
    let leading_ok = s
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-');
    if !leading_ok {
        return Err(ShellError::BadNumber("not a number"));
    }
    s.parse::<i32>().map_err(|e| {
        ShellError::BadNumber(match e.kind() {
            IntErrorKind::PosOverflow => "integer overflow",
            IntErrorKind::NegOverflow => "integer underflow",
            _ => "extra characters at end of input",
        })
    })
}
