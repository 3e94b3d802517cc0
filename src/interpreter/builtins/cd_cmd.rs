//! The `cd` builtin.

use crate::errors::diag;
use crate::parser::types::Command;
use crate::shell::Shell;
use crate::sys;

/// `cd [--] [dir]`. With no operand, go to `$HOME` (a no-op when HOME
/// is unset). More than one operand is refused.
pub fn run(_shell: &mut Shell, cmd: &Command<'_>) -> i32 {
    let name = cmd.arg(0);
    let mut arg = 1;
    if cmd.argc() > 1 && cmd.arg(1) == "--" {
        arg += 1;
    }

    if cmd.argc() > arg {
        if cmd.argc() > arg + 1 {
            diag(name, "too many operands specified");
            return 1;
        }
        if let Err(errno) = sys::chdir(cmd.arg(arg)) {
            diag(name, format_args!("chdir: {errno}"));
            return 1;
        }
        0
    } else {
        match std::env::var("HOME") {
            Ok(home) => {
                if let Err(errno) = sys::chdir(&home) {
                    diag(name, format_args!("chdir: {errno}"));
                    return 1;
                }
                0
            }
            Err(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    fn cmd_of(parts: &[&str]) -> Command<'static> {
        Command {
            args: parts
                .iter()
                .map(|s| Cow::Owned((*s).to_string()))
                .collect(),
        }
    }

    // One test owns every chdir so parallel test threads cannot race on
    // the process working directory.
    #[test]
    fn test_cd_operand_handling() {
        let mut shell = Shell::new("sh".to_string());

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().canonicalize().unwrap();
        let path = target.display().to_string();
        assert_eq!(run(&mut shell, &cmd_of(&["cd", &path])), 0);
        assert_eq!(std::env::current_dir().unwrap(), target);

        let other = tempfile::tempdir().unwrap();
        let target = other.path().canonicalize().unwrap();
        let path = target.display().to_string();
        assert_eq!(run(&mut shell, &cmd_of(&["cd", "--", &path])), 0);
        assert_eq!(std::env::current_dir().unwrap(), target);

        // Failures leave the working directory alone.
        assert_eq!(run(&mut shell, &cmd_of(&["cd", "/definitely/nope"])), 1);
        assert_eq!(run(&mut shell, &cmd_of(&["cd", "/a", "/b"])), 1);
        assert_eq!(std::env::current_dir().unwrap(), target);
    }
}
