//! Shell state and the line-level sequence driver.

pub mod options;

pub use options::Opts;

use std::os::fd::RawFd;

use crate::errors::print_diag;
use crate::interpreter::{self, MISC_FAILURE_STATUS};
use crate::sys;

/// The prompt shown after a successful command.
pub const DEFAULT_PROMPT: &str = "$ ";

/// Process-wide shell state, created once at startup.
pub struct Shell {
    pub opts: Opts,
    /// Exit status of the most recent command.
    pub last_status: i32,
    /// Largest nonzero status seen in the pipeline being run.
    pub last_fail: i32,
    pub prompt: String,
    /// Terminal descriptor when interactive, else -1.
    pub term: RawFd,
    /// The shell's own process group when interactive, else -1.
    pub shell_pgid: sys::Pid,
    /// Program name used to prefix diagnostics.
    pub argv0: String,
}

impl Shell {
    pub fn new(argv0: String) -> Self {
        Shell {
            opts: Opts::default(),
            last_status: 0,
            last_fail: 0,
            prompt: DEFAULT_PROMPT.to_string(),
            term: -1,
            shell_pgid: -1,
            argv0,
        }
    }

    pub fn interactive(&self) -> bool {
        self.term >= 0
    }

    /// Enter interactive mode: ignore SIGTTOU so our own foreground-group
    /// swaps cannot stop us, and remember the terminal and our pgid.
    pub fn make_interactive(&mut self) -> Result<(), crate::errors::ShellError> {
        sys::ignore_sigttou()?;
        self.term = libc::STDOUT_FILENO;
        self.shell_pgid = sys::getpgrp();
        Ok(())
    }

    /// Record a finished command's status, folding nonzero statuses into
    /// the pipeline failure summary.
    pub fn record_status(&mut self, status: i32) {
        self.last_status = status;
        if status > self.last_fail {
            self.last_fail = status;
        }
    }

    /// Rebuild the prompt from the last status.
    pub fn rebuild_prompt(&mut self) {
        self.prompt = if self.last_status > 0 {
            format!("{} {}", self.last_status, DEFAULT_PROMPT)
        } else {
            DEFAULT_PROMPT.to_string()
        };
    }

    /// Drive one input line: echo it when verbose, split it on `;`, and
    /// evaluate each segment. A failed segment becomes a misc-failure
    /// status but never stops the segments after it.
    pub fn take_line(&mut self, line: &str) {
        if self.opts.contains(Opts::VERBOSE) {
            eprint!("{line}");
            if !line.ends_with('\n') {
                eprintln!();
            }
        }

        // Nothing to do for the user just pressing enter.
        if line.is_empty() || line.starts_with('\n') {
            return;
        }
        let line = line.strip_suffix('\n').unwrap_or(line);

        for segment in line.split(';').map(|s| s.trim_matches(' ')) {
            if let Err(err) = interpreter::eval_segment(self, segment) {
                print_diag(&self.argv0, &err);
                self.last_status = MISC_FAILURE_STATUS;
                self.last_fail = MISC_FAILURE_STATUS;
            }
            self.rebuild_prompt();
        }
    }
}
