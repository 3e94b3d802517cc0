//! Builtin table, dispatch, and the descriptor plumbing that lets a
//! builtin run inside the shell process with redirections applied.

pub mod cd_cmd;
pub mod exit_cmd;
pub mod set_cmd;
pub mod type_cmd;

use std::io::Write;
use std::os::fd::RawFd;

use crate::errors::{print_diag, ShellError};
use crate::interpreter::MISC_FAILURE_STATUS;
use crate::parser::types::{Command, RedirPlan};
use crate::shell::Shell;
use crate::sys;

/// A builtin's body: runs with stdio already routed, prints its own
/// diagnostics under its own name, and returns its exit status.
pub type BuiltinFn = fn(&mut Shell, &Command<'_>) -> i32;

/// The fixed builtin table; dispatch order is table order.
const BUILTINS: &[(&str, BuiltinFn)] = &[
    ("cd", cd_cmd::run),
    ("exit", exit_cmd::run),
    ("set", set_cmd::run),
    ("type", type_cmd::run),
];

pub fn lookup(name: &str) -> Option<BuiltinFn> {
    BUILTINS.iter().find(|(n, _)| *n == name).map(|(_, f)| *f)
}

pub fn is_builtin(name: &str) -> bool {
    lookup(name).is_some()
}

pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|(n, _)| *n)
}

/// Run `argv[0]` as a builtin in the shell process, bracketed by the
/// plan's redirections. `None` means "not a builtin" and the caller
/// forks instead; this sentinel is distinct from every exit status.
pub fn dispatch(shell: &mut Shell, cmd: &Command<'_>, plan: &RedirPlan) -> Option<i32> {
    let builtin = lookup(cmd.args.first()?.as_ref())?;
    let status = match start_redir(plan) {
        Err(err) => {
            print_diag(&shell.argv0, &err);
            MISC_FAILURE_STATUS
        }
        Ok(saved) => {
            let status = builtin(shell, cmd);
            match end_redir(saved) {
                Ok(()) => status,
                Err(err) => {
                    print_diag(&shell.argv0, &err);
                    MISC_FAILURE_STATUS
                }
            }
        }
    };
    shell.record_status(status);
    Some(status)
}

/// Descriptors saved so the shell's own stdio can be put back after an
/// in-process builtin: (saved copy, original descriptor) pairs.
#[derive(Default)]
struct SavedFds {
    target: Option<(RawFd, RawFd)>,
    closed: Option<(RawFd, RawFd)>,
}

/// Apply the plan to the shell itself, keeping dup'd copies of whatever
/// it displaces.
fn start_redir(plan: &RedirPlan) -> Result<SavedFds, ShellError> {
    let mut saved = SavedFds::default();
    if let Some((src, tgt)) = plan.redirects() {
        let save = sys::dup(tgt)?;
        if let Err(err) = sys::dup2(src, tgt) {
            let _ = sys::close(save);
            return Err(err);
        }
        saved.target = Some((save, tgt));
    }
    if let Some(fd) = plan.close_fd {
        match sys::dup(fd) {
            Ok(save) => {
                let _ = sys::close(fd);
                saved.closed = Some((save, fd));
            }
            // Closing a descriptor that was never open needs no undo.
            Err(ShellError::Sys { errno, .. }) if errno.0 == libc::EBADF => {}
            Err(err) => {
                let _ = end_redir(saved);
                return Err(err);
            }
        }
    }
    Ok(saved)
}

/// Undo [`start_redir`]. The save descriptors are released on every
/// path, so nothing above stderr survives the builtin.
fn end_redir(saved: SavedFds) -> Result<(), ShellError> {
    // Builtin output must land before the descriptors swap back.
    let _ = std::io::stdout().flush();
    let mut result = Ok(());
    if let Some((save, tgt)) = saved.target {
        if let Err(err) = sys::dup2(save, tgt) {
            result = Err(err);
        }
        let _ = sys::close(save);
    }
    if let Some((save, fd)) = saved.closed {
        if let Err(err) = sys::dup2(save, fd) {
            if result.is_ok() {
                result = Err(err);
            }
        }
        let _ = sys::close(save);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn test_table_contents() {
        let listed: Vec<&str> = names().collect();
        assert_eq!(listed, ["cd", "exit", "set", "type"]);
        assert!(is_builtin("cd"));
        assert!(is_builtin("type"));
        assert!(!is_builtin("echo"));
        assert!(!is_builtin(""));
    }

    #[test]
    fn test_dispatch_sentinel_for_externals() {
        let mut shell = Shell::new("sh".to_string());
        let cmd = Command {
            args: vec![Cow::Borrowed("ls")],
        };
        let plan = RedirPlan::default();
        assert!(dispatch(&mut shell, &cmd, &plan).is_none());
        // The sentinel must not disturb recorded status.
        assert_eq!(shell.last_status, 0);
    }

    #[test]
    fn test_dispatch_runs_builtin_and_records_status() {
        let mut shell = Shell::new("sh".to_string());
        let cmd = Command {
            args: vec![
                Cow::Borrowed("cd"),
                Cow::Borrowed("/a"),
                Cow::Borrowed("/b"),
            ],
        };
        let plan = RedirPlan::default();
        // Too many operands: status 1, recorded as the last failure.
        assert_eq!(dispatch(&mut shell, &cmd, &plan), Some(1));
        assert_eq!(shell.last_status, 1);
        assert_eq!(shell.last_fail, 1);
    }
}
