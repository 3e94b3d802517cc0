//! The `exit` builtin.

use crate::errors::{diag, parse_int};
use crate::parser::types::Command;
use crate::shell::Shell;

/// `exit [--] [status]`. Terminates the shell immediately; a status
/// outside 0..=255 is refused and the shell stays alive.
pub fn run(_shell: &mut Shell, cmd: &Command<'_>) -> i32 {
    let name = cmd.arg(0);
    let mut arg = 1;
    if cmd.argc() > 1 && cmd.arg(1) == "--" {
        arg += 1;
    }

    if cmd.argc() <= arg {
        std::process::exit(0);
    }
    if cmd.argc() > arg + 1 {
        diag(name, "too many operands specified");
        return 1;
    }
    match parse_int(cmd.arg(arg)) {
        Err(err) => {
            diag(name, err);
            1
        }
        Ok(status) if !(0..=255).contains(&status) => {
            diag(name, "exit status must be between 0 and 255");
            1
        }
        Ok(status) => std::process::exit(status),
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

    // Only the refusal paths can be tested in-process; an accepted
    // operand terminates the test runner.
    #[test]
    fn test_exit_refuses_bad_operands() {
        let mut shell = Shell::new("sh".to_string());
        assert_eq!(run(&mut shell, &cmd_of(&["exit", "notanumber"])), 1);
        assert_eq!(run(&mut shell, &cmd_of(&["exit", "256"])), 1);
        assert_eq!(run(&mut shell, &cmd_of(&["exit", "-1"])), 1);
        assert_eq!(run(&mut shell, &cmd_of(&["exit", "0", "1"])), 1);
    }
}
