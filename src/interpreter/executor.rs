//! Single-command execution: parse, expand, redirect, then dispatch a
//! builtin in-process or fork and exec an external program.

use crate::errors::{print_diag, ShellError};
use crate::expansion::glob_expander;
use crate::interpreter::{builtins, report, MISC_FAILURE_STATUS};
use crate::parser::types::{Command, RedirPlan};
use crate::parser::{self, parse_redir};
use crate::shell::{Opts, Shell};
use crate::sys::{self, ForkResult};

/// Evaluate one simple command.
pub fn run(shell: &mut Shell, segment: &str) -> Result<(), ShellError> {
    let (mut cmd, can_glob) = parser::parse_cmd(segment)?;
    if can_glob && shell.opts.contains(Opts::GLOB) {
        cmd = glob_expander::expand_path(cmd)?;
    }
    let plan = parse_redir(&mut cmd, shell.opts.contains(Opts::CLOBBER), can_glob)?;

    // An empty command "succeeds" with the not-found status, no fork.
    if cmd.is_empty() {
        shell.record_status(127);
        return Ok(());
    }

    if builtins::dispatch(shell, &cmd, &plan).is_some() {
        return Ok(());
    }

    log::debug!("forking for external command {:?}", cmd.arg(0));
    match sys::fork()? {
        ForkResult::Child => exec_child(shell, &cmd, &plan),
        ForkResult::Parent(pid) => {
            report::report(shell, pid);
            // Take the terminal back from the finished child.
            if shell.interactive() {
                if let Err(err) = sys::tcsetpgrp(shell.term, shell.shell_pgid) {
                    print_diag(&shell.argv0, &err);
                }
            }
            Ok(())
        }
    }
}

/// Child side of a standalone external command. Never returns.
fn exec_child(shell: &Shell, cmd: &Command<'_>, plan: &RedirPlan) -> ! {
    if shell.interactive() {
        // Lead a fresh process group and make it the foreground group,
        // so terminal signals reach the command rather than the shell.
        if let Err(err) = sys::setpgid(0, 0) {
            print_diag(&shell.argv0, &err);
            sys::exit_now(MISC_FAILURE_STATUS);
        }
        if let Err(err) = sys::tcsetpgrp(shell.term, sys::getpgrp()) {
            print_diag(&shell.argv0, &err);
            sys::exit_now(MISC_FAILURE_STATUS);
        }
    }
    if let Err(err) = apply_redirections(plan) {
        print_diag(&shell.argv0, &err);
        sys::exit_now(MISC_FAILURE_STATUS);
    }

    let argv = cmd.to_cstrings();
    let errno = sys::execvp(&argv);
    eprintln!("{}: execvp {}: {}", shell.argv0, cmd.arg(0), errno);
    sys::exit_now(match errno.0 {
        libc::ENOENT => 127,
        libc::ENOEXEC => 126,
        _ => MISC_FAILURE_STATUS,
    })
}

/// Route the planned descriptors in a child that is about to exec (or
/// run a builtin on the pipes it was given).
pub(crate) fn apply_redirections(plan: &RedirPlan) -> Result<(), ShellError> {
    if let Some(fd) = plan.close_fd {
        let _ = sys::close(fd);
    }
    if let Some((src, tgt)) = plan.redirects() {
        sys::dup2(src, tgt)?;
    }
    Ok(())
}
