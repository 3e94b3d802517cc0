//! Parsed-command types shared across the parser modules.

use std::borrow::Cow;
use std::ffi::CString;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};

use crate::sys;

/// One parsed command: an argv whose slots either borrow the input line
/// or own a string produced by quoting removal or expansion. The per-slot
/// ownership means dropping a command can neither double-free a slice of
/// the line nor leak an expansion result.
#[derive(Debug, Default)]
pub struct Command<'a> {
    pub args: Vec<Cow<'a, str>>,
}

impl<'a> Command<'a> {
    pub fn argc(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Argument `i` as a plain string slice. Panics if out of range.
    pub fn arg(&self, i: usize) -> &str {
        &self.args[i]
    }

    /// The argv in the form `execvp(3)` wants it.
    pub fn to_cstrings(&self) -> Vec<CString> {
        self.args.iter().map(|a| sys::to_cstring(a)).collect()
    }
}

/// Where redirected data comes from.
#[derive(Debug)]
pub enum RedirSource {
    /// A file opened by the redirection parser; closed when the plan drops.
    File(OwnedFd),
    /// An existing descriptor named with a `<&N` / `>&N` operand.
    Fd(RawFd),
}

impl RedirSource {
    pub fn as_raw_fd(&self) -> RawFd {
        match self {
            RedirSource::File(fd) => fd.as_raw_fd(),
            RedirSource::Fd(fd) => *fd,
        }
    }
}

/// Redirection plan for one command.
///
/// `target_fd` is the descriptor the command will see (0 or 1 unless a
/// numeric prefix overrode it); `source` is where that descriptor is
/// routed from; `close_fd` is a descriptor to close outright (`N>&-`).
/// `target_fd` and `close_fd` are deliberately independent fields.
#[derive(Debug, Default)]
pub struct RedirPlan {
    pub source: Option<RedirSource>,
    pub target_fd: Option<RawFd>,
    pub close_fd: Option<RawFd>,
    /// Set when the raw line held a glob metacharacter, so pathname
    /// expansion may be needed.
    pub can_expand_path: bool,
}

impl RedirPlan {
    /// The (source, target) descriptor pair, when both halves are set.
    pub fn redirects(&self) -> Option<(RawFd, RawFd)> {
        match (&self.source, self.target_fd) {
            (Some(src), Some(tgt)) => Some((src.as_raw_fd(), tgt)),
            _ => None,
        }
    }
}
