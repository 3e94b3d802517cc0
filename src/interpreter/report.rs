//! Child status collection and signal reporting.

use crate::interpreter::SIGNAL_STATUS_BASE;
use crate::shell::Shell;
use crate::sys;

/// Wait for `pid` and fold its status into the shell state. A child
/// killed by a signal gets `SIGNAL_STATUS_BASE + signo` and, for the
/// signals this build reports, its descriptive name on stderr.
pub fn report(shell: &mut Shell, pid: sys::Pid) {
    if pid <= 0 {
        return;
    }
    let Ok(wstatus) = sys::waitpid(pid) else {
        return;
    };
    let status = if libc::WIFSIGNALED(wstatus) {
        let sig = libc::WTERMSIG(wstatus);
        if let Some(name) = reported_signal(sig) {
            eprintln!("{name}");
        }
        SIGNAL_STATUS_BASE + sig
    } else if libc::WIFEXITED(wstatus) {
        libc::WEXITSTATUS(wstatus)
    } else {
        0
    };
    shell.record_status(status);
}

/// `strsignal(3)`, returning `None` for signals this build was told not
/// to report.
fn reported_signal(sig: libc::c_int) -> Option<String> {
    if sig == libc::SIGINT && !cfg!(feature = "report-sigint") {
        return None;
    }
    if sig == libc::SIGPIPE && !cfg!(feature = "report-sigpipe") {
        return None;
    }
    sys::strsignal(sig)
}
