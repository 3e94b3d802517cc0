//! Redirection extraction and descriptor planning.
//!
//! Scans argv (from index 1) for tokens carrying `<` or `>` and turns
//! them into a [`RedirPlan`]. Argv is truncated at the first redirection
//! token: everything after it belongs to the redirection, not the
//! command.

use std::os::fd::RawFd;

use crate::errors::{parse_int, ShellError, SyntaxError};
use crate::parser::types::{Command, RedirPlan, RedirSource};
use crate::sys;

/// Redirection targets are created rw for everyone, minus umask.
const REDIR_OPEN_MODE: libc::mode_t = 0o666;

/// Extract redirections from `cmd`, opening or planning the descriptors
/// involved. On failure everything already opened is closed when the
/// partial plan drops.
pub fn parse_redir(
    cmd: &mut Command<'_>,
    clobber: bool,
    can_expand_path: bool,
) -> Result<RedirPlan, ShellError> {
    let mut plan = RedirPlan {
        can_expand_path,
        ..RedirPlan::default()
    };
    let mut argend: Option<usize> = None;

    let mut i = 1;
    while i < cmd.argc() {
        let tok = cmd.arg(i).to_string();
        let Some(op_pos) = tok.find(['<', '>']) else {
            i += 1;
            continue;
        };
        argend.get_or_insert(i);

        let bytes = tok.as_bytes();
        let (flags, mut target_fd, op_end) = match bytes[op_pos] {
            b'<' => (libc::O_RDONLY, libc::STDIN_FILENO, op_pos + 1),
            _ if bytes.get(op_pos + 1) == Some(&b'|') => (
                libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC,
                libc::STDOUT_FILENO,
                op_pos + 2,
            ),
            _ if clobber => (
                libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC,
                libc::STDOUT_FILENO,
                op_pos + 1,
            ),
            _ => (
                libc::O_WRONLY | libc::O_CREAT | libc::O_EXCL,
                libc::STDOUT_FILENO,
                op_pos + 1,
            ),
        };

        // The operand is the rest of this token, or the next token when
        // the operator ends this one.
        let operand = if op_end < tok.len() {
            tok[op_end..].to_string()
        } else {
            match cmd.args.get(i + 1) {
                Some(next) => next.to_string(),
                None => return Err(SyntaxError::MissingRedirTarget.into()),
            }
        };

        // A numeric prefix before the operator (`2>`) renames the
        // descriptor the command sees. Non-numbers are ignored.
        if op_pos > 0 {
            if let Some(n) = quiet_int(&tok[..op_pos]) {
                target_fd = n;
            }
        }

        if let Some(rest) = operand.strip_prefix('&') {
            if rest.is_empty() {
                return Err(SyntaxError::MissingRedirTarget.into());
            }
            if rest == "-" {
                plan.close_fd = Some(target_fd);
            } else {
                plan.source = Some(RedirSource::Fd(parse_int(rest)?));
                plan.target_fd = Some(target_fd);
            }
        } else {
            let fd = sys::open(&operand, flags, REDIR_OPEN_MODE)?;
            plan.source = Some(RedirSource::File(fd));
            plan.target_fd = Some(target_fd);
        }
        i += 1;
    }

    if let Some(end) = argend {
        cmd.args.truncate(end);
    }
    Ok(plan)
}

/// The forgiving converter used for numeric prefixes: any failure just
/// means "no override".
fn quiet_int(s: &str) -> Option<RawFd> {
    let leading_ok = s
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-');
    if !leading_ok {
        return None;
    }
    s.parse::<RawFd>().ok()
}
