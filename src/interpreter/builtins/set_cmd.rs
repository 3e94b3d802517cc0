//! The `set` builtin: runtime access to the option parser.

use crate::parser::types::Command;
use crate::shell::options;
use crate::shell::Shell;

/// `set [options]`. Re-runs the startup option parser in initialized
/// mode, so `-o` / `+o` list the current state and the startup-only
/// options refuse to change.
pub fn run(shell: &mut Shell, cmd: &Command<'_>) -> i32 {
    if cmd.argc() > 1 && cmd.arg(1) != "--" {
        let args: Vec<String> = cmd.args[1..].iter().map(|a| a.to_string()).collect();
        let mut cmdline = None;
        if !options::optparse(&mut shell.opts, true, cmd.arg(0), &args, &mut cmdline) {
            return 1;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::Opts;
    use std::borrow::Cow;

    fn cmd_of(parts: &[&str]) -> Command<'static> {
        Command {
            args: parts
                .iter()
                .map(|s| Cow::Owned((*s).to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_set_toggles_options() {
        let mut shell = Shell::new("sh".to_string());
        assert_eq!(run(&mut shell, &cmd_of(&["set", "-o", "pipefail"])), 0);
        assert!(shell.opts.contains(Opts::PIPEFAIL));
        assert_eq!(run(&mut shell, &cmd_of(&["set", "+o", "pipefail"])), 0);
        assert!(!shell.opts.contains(Opts::PIPEFAIL));
    }

    #[test]
    fn test_set_without_operands_is_a_no_op() {
        let mut shell = Shell::new("sh".to_string());
        let before = shell.opts;
        assert_eq!(run(&mut shell, &cmd_of(&["set"])), 0);
        assert_eq!(run(&mut shell, &cmd_of(&["set", "--"])), 0);
        assert_eq!(shell.opts, before);
    }

    #[test]
    fn test_set_rejects_unknown_flag() {
        let mut shell = Shell::new("sh".to_string());
        assert_eq!(run(&mut shell, &cmd_of(&["set", "-Z"])), 1);
    }

    #[test]
    fn test_set_cannot_change_startup_options() {
        let mut shell = Shell::new("sh".to_string());
        assert_eq!(run(&mut shell, &cmd_of(&["set", "-o", "cmdline", "echo"])), 0);
        assert!(!shell.opts.contains(Opts::CMDLINE));
        assert!(shell.opts.contains(Opts::STDIN));
    }
}
