//! Thin wrappers over the libc calls the shell depends on.
//!
//! Every wrapper converts the C return-value convention into `Result`,
//! capturing errno at the failure site. Nothing here prints; callers
//! decide how a failure is reported.

use std::ffi::{CStr, CString};
use std::mem;
use std::os::fd::{FromRawFd, OwnedFd, RawFd};
use std::ptr;

use crate::errors::{Errno, ShellError};

pub type Pid = libc::pid_t;

/// Outcome of `fork(2)` as seen by each side.
pub enum ForkResult {
    Parent(Pid),
    Child,
}

/// Convert a `&str` into a `CString`, truncating at an interior NUL the
/// way a C string would end there anyway.
pub fn to_cstring(s: &str) -> CString {
    let bytes = match s.find('\0') {
        Some(i) => &s.as_bytes()[..i],
        None => s.as_bytes(),
    };
    CString::new(bytes).expect("NUL bytes were stripped above")
}

fn check(res: libc::c_int, call: &'static str) -> Result<libc::c_int, ShellError> {
    if res < 0 {
        Err(ShellError::sys(call))
    } else {
        Ok(res)
    }
}

pub fn fork() -> Result<ForkResult, ShellError> {
    match unsafe { libc::fork() } {
        -1 => Err(ShellError::sys("fork")),
        0 => Ok(ForkResult::Child),
        pid => Ok(ForkResult::Parent(pid)),
    }
}

pub fn pipe() -> Result<(OwnedFd, OwnedFd), ShellError> {
    let mut fds = [0 as libc::c_int; 2];
    check(unsafe { libc::pipe(fds.as_mut_ptr()) }, "pipe")?;
    unsafe { Ok((OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1]))) }
}

pub fn open(path: &str, flags: libc::c_int, mode: libc::mode_t) -> Result<OwnedFd, ShellError> {
    let cpath = to_cstring(path);
    let fd = unsafe { libc::open(cpath.as_ptr(), flags, mode as libc::c_uint) };
    if fd < 0 {
        Err(ShellError::sys_with("open", path))
    } else {
        Ok(unsafe { OwnedFd::from_raw_fd(fd) })
    }
}

pub fn dup(fd: RawFd) -> Result<RawFd, ShellError> {
    check(unsafe { libc::dup(fd) }, "dup")
}

pub fn dup2(src: RawFd, dst: RawFd) -> Result<(), ShellError> {
    check(unsafe { libc::dup2(src, dst) }, "dup2").map(|_| ())
}

pub fn close(fd: RawFd) -> Result<(), ShellError> {
    check(unsafe { libc::close(fd) }, "close").map(|_| ())
}

/// Blocking wait for one child; returns the raw wait status.
pub fn waitpid(pid: Pid) -> Result<libc::c_int, ShellError> {
    let mut wstatus = 0;
    check(unsafe { libc::waitpid(pid, &mut wstatus, 0) }, "waitpid")?;
    Ok(wstatus)
}

/// Replace the process image. Only returns on failure, yielding the
/// errno that `execvp(3)` left behind.
pub fn execvp(argv: &[CString]) -> Errno {
    debug_assert!(!argv.is_empty());
    let mut ptrs: Vec<*const libc::c_char> = argv.iter().map(|a| a.as_ptr()).collect();
    ptrs.push(ptr::null());
    unsafe { libc::execvp(ptrs[0], ptrs.as_ptr()) };
    Errno::last()
}

pub fn chdir(path: &str) -> Result<(), Errno> {
    let cpath = to_cstring(path);
    if unsafe { libc::chdir(cpath.as_ptr()) } < 0 {
        Err(Errno::last())
    } else {
        Ok(())
    }
}

pub fn setpgid(pid: Pid, pgid: Pid) -> Result<(), ShellError> {
    check(unsafe { libc::setpgid(pid, pgid) }, "setpgid").map(|_| ())
}

pub fn getpgrp() -> Pid {
    unsafe { libc::getpgrp() }
}

pub fn tcsetpgrp(fd: RawFd, pgid: Pid) -> Result<(), ShellError> {
    check(unsafe { libc::tcsetpgrp(fd, pgid) }, "tcsetpgrp").map(|_| ())
}

pub fn isatty(fd: RawFd) -> bool {
    unsafe { libc::isatty(fd) == 1 }
}

/// Ignore SIGTTOU so the shell's own foreground-group swaps cannot stop it.
pub fn ignore_sigttou() -> Result<(), ShellError> {
    unsafe {
        let mut sa: libc::sigaction = mem::zeroed();
        sa.sa_sigaction = libc::SIG_IGN;
        libc::sigemptyset(&mut sa.sa_mask);
        check(
            libc::sigaction(libc::SIGTTOU, &sa, ptr::null_mut()),
            "sigaction",
        )?;
    }
    Ok(())
}

/// Descriptive name for a signal, per `strsignal(3)`.
pub fn strsignal(sig: libc::c_int) -> Option<String> {
    let ptr = unsafe { libc::strsignal(sig) };
    if ptr.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
    }
}

/// Home directory of a named user, via `getpwnam(3)`.
pub fn user_home(name: &str) -> Option<String> {
    let cname = CString::new(name).ok()?;
    let pw = unsafe { libc::getpwnam(cname.as_ptr()) };
    if pw.is_null() {
        return None;
    }
    let dir = unsafe { (*pw).pw_dir };
    if dir.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(dir) }.to_string_lossy().into_owned())
}

/// True if `path` names a regular file the caller may execute.
pub fn is_executable(path: &str) -> bool {
    let cpath = to_cstring(path);
    let mut st: libc::stat = unsafe { mem::zeroed() };
    if unsafe { libc::stat(cpath.as_ptr(), &mut st) } < 0 {
        return false;
    }
    if st.st_mode & libc::S_IFMT != libc::S_IFREG {
        return false;
    }
    unsafe { libc::access(cpath.as_ptr(), libc::X_OK) == 0 }
}

/// Immediate process termination without unwinding or flushing.
pub fn exit_now(status: i32) -> ! {
    unsafe { libc::_exit(status) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cstring_truncates_at_nul() {
        assert_eq!(to_cstring("abc").as_bytes(), b"abc");
        assert_eq!(to_cstring("ab\0cd").as_bytes(), b"ab");
        assert_eq!(to_cstring("").as_bytes(), b"");
    }

    #[test]
    fn test_pipe_round_trip() {
        use std::os::fd::AsRawFd;
        let (r, w) = pipe().unwrap();
        let msg = b"ok";
        unsafe {
            assert_eq!(libc::write(w.as_raw_fd(), msg.as_ptr().cast(), 2), 2);
        }
        drop(w);
        let mut buf = [0u8; 8];
        let n = unsafe { libc::read(r.as_raw_fd(), buf.as_mut_ptr().cast(), 8) };
        assert_eq!(&buf[..n as usize], msg);
    }

    #[test]
    fn test_is_executable() {
        assert!(is_executable("/bin/sh"));
        assert!(!is_executable("/definitely/not/here"));
        // A directory is not an executable regular file.
        assert!(!is_executable("/"));
    }
}
