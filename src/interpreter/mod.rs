//! Command evaluation: builtin dispatch, fork/exec, pipelines.

pub mod builtins;
pub mod executor;
pub mod pipeline;
pub mod report;

use crate::errors::ShellError;
use crate::shell::Shell;

/// Exit status for shell-internal failures; never 0, 126 or 127.
pub const MISC_FAILURE_STATUS: i32 = 125;

/// Added to the signal number to form the status of a signal-killed child.
pub const SIGNAL_STATUS_BASE: i32 = 384;

/// Evaluate one `;`-segment: a pipeline when it holds a `|` that is not
/// the tail of a `>|` operator, a single command otherwise.
pub fn eval_segment(shell: &mut Shell, segment: &str) -> Result<(), ShellError> {
    if let Some(pos) = segment.find('|') {
        if pos > 0 && segment.as_bytes()[pos - 1] != b'>' {
            return pipeline::run(shell, segment);
        }
    }
    executor::run(shell, segment)
}
