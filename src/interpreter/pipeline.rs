//! Pipeline execution.
//!
//! Splits on `|`, forks every stage with its stdin/stdout wired to
//! pipes, and waits left to right. At most two stages are unwaited at
//! any moment: the one just forked and its predecessor. That keeps the
//! reader of a full pipe alive while its writer finishes, so the chain
//! cannot deadlock. Builtins on a stage run in the forked child too,
//! which is why `cd` or `set` inside a pipeline cannot affect the shell.

use std::io::Write;
use std::os::fd::{AsRawFd, OwnedFd};

use crate::errors::{print_diag, ShellError};
use crate::expansion::glob_expander;
use crate::interpreter::builtins::{self, BuiltinFn};
use crate::interpreter::executor::apply_redirections;
use crate::interpreter::{report, MISC_FAILURE_STATUS};
use crate::parser::types::{Command, RedirPlan};
use crate::parser::{self, parse_redir};
use crate::shell::{Opts, Shell};
use crate::sys::{self, ForkResult};

/// Run a `|`-separated segment of at least two stages.
pub fn run(shell: &mut Shell, segment: &str) -> Result<(), ShellError> {
    let stages: Vec<&str> = segment.split('|').map(|s| s.trim_matches(' ')).collect();

    // Failure summary for this pipeline only.
    shell.last_fail = 0;

    let mut pgid: Option<sys::Pid> = None;
    let mut feed: Option<(OwnedFd, OwnedFd)> = None;
    let mut prev_pid: Option<sys::Pid> = None;

    let count = stages.len();
    for (i, stage) in stages.iter().enumerate() {
        let out = if i + 1 < count { Some(sys::pipe()?) } else { None };
        let pid = spawn_stage(shell, stage, &mut pgid, feed.as_ref(), out.as_ref())?;
        // The pipe feeding this stage has served both its ends; closing
        // it in the parent lets EOF propagate down the chain.
        feed = out;
        if let Some(prev) = prev_pid.replace(pid) {
            report::report(shell, prev);
        }
    }
    if let Some(last) = prev_pid {
        report::report(shell, last);
    }

    if shell.interactive() {
        sys::tcsetpgrp(shell.term, shell.shell_pgid)?;
    }

    if shell.opts.contains(Opts::PIPEFAIL) {
        shell.last_status = shell.last_fail;
        shell.last_fail = 0;
    }
    Ok(())
}

/// Parse and fork one stage. The first stage forked becomes the
/// pipeline's process-group leader; the parent mirrors the child's
/// setpgid so neither side depends on winning the race.
fn spawn_stage(
    shell: &mut Shell,
    stage: &str,
    pgid: &mut Option<sys::Pid>,
    feed: Option<&(OwnedFd, OwnedFd)>,
    out: Option<&(OwnedFd, OwnedFd)>,
) -> Result<sys::Pid, ShellError> {
    let (mut cmd, can_glob) = parser::parse_cmd(stage)?;
    if can_glob && shell.opts.contains(Opts::GLOB) {
        cmd = glob_expander::expand_path(cmd)?;
    }
    let plan = parse_redir(&mut cmd, shell.opts.contains(Opts::CLOBBER), can_glob)?;

    let builtin = if cmd.is_empty() {
        None
    } else {
        builtins::lookup(cmd.arg(0))
    };

    match sys::fork()? {
        ForkResult::Child => stage_child(shell, &cmd, &plan, builtin, *pgid, feed, out),
        ForkResult::Parent(pid) => {
            if shell.interactive() {
                let group = pgid.unwrap_or(pid);
                // Losing to the child's own setpgid (or to a fast exit)
                // is fine; the group is settled either way.
                if let Err(err) = sys::setpgid(pid, group) {
                    log::debug!("parent setpgid({pid}, {group}): {err}");
                }
            }
            if pgid.is_none() {
                *pgid = Some(pid);
            }
            log::trace!("stage {stage:?} running as pid {pid}");
            Ok(pid)
        }
    }
}

/// Child side of one pipeline stage. Never returns.
fn stage_child(
    shell: &mut Shell,
    cmd: &Command<'_>,
    plan: &RedirPlan,
    builtin: Option<BuiltinFn>,
    pgid: Option<sys::Pid>,
    feed: Option<&(OwnedFd, OwnedFd)>,
    out: Option<&(OwnedFd, OwnedFd)>,
) -> ! {
    if shell.interactive() {
        match pgid {
            None => {
                // First stage: lead a fresh group and take the terminal.
                if let Err(err) = sys::setpgid(0, 0) {
                    print_diag(&shell.argv0, &err);
                    sys::exit_now(MISC_FAILURE_STATUS);
                }
                if let Err(err) = sys::tcsetpgrp(shell.term, sys::getpgrp()) {
                    print_diag(&shell.argv0, &err);
                    sys::exit_now(MISC_FAILURE_STATUS);
                }
            }
            Some(group) => {
                if let Err(err) = sys::setpgid(0, group) {
                    print_diag(&shell.argv0, &err);
                    sys::exit_now(MISC_FAILURE_STATUS);
                }
            }
        }
    }

    // Wire the pipes onto stdio; every end this stage does not use gets
    // closed so readers see EOF when the writers are done.
    if let Some((read, write)) = feed {
        if let Err(err) = sys::dup2(read.as_raw_fd(), libc::STDIN_FILENO) {
            print_diag(&shell.argv0, &err);
            sys::exit_now(MISC_FAILURE_STATUS);
        }
        let _ = sys::close(read.as_raw_fd());
        let _ = sys::close(write.as_raw_fd());
    }
    if let Some((read, write)) = out {
        if let Err(err) = sys::dup2(write.as_raw_fd(), libc::STDOUT_FILENO) {
            print_diag(&shell.argv0, &err);
            sys::exit_now(MISC_FAILURE_STATUS);
        }
        let _ = sys::close(read.as_raw_fd());
        let _ = sys::close(write.as_raw_fd());
    }

    if let Err(err) = apply_redirections(plan) {
        print_diag(&shell.argv0, &err);
        sys::exit_now(MISC_FAILURE_STATUS);
    }

    if cmd.is_empty() {
        sys::exit_now(127);
    }
    if let Some(run_builtin) = builtin {
        // A builtin on a pipeline stage runs right here, attached to the
        // pipes, and its status becomes this child's exit status.
        let status = run_builtin(shell, cmd);
        let _ = std::io::stdout().flush();
        sys::exit_now(status);
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

#[cfg(test)]
mod tests {
    #[test]
    fn test_stage_splitting_trims_spaces() {
        let stages: Vec<&str> = "echo abcd | rev |  wc -c"
            .split('|')
            .map(|s| s.trim_matches(' '))
            .collect();
        assert_eq!(stages, ["echo abcd", "rev", "wc -c"]);
    }
}
