//! The `type` builtin: classify names as builtins or external commands.

use crate::errors::diag;
use crate::parser::types::Command;
use crate::shell::Shell;
use crate::sys;

/// `type name...`. Builtins are named as such; anything else is looked
/// up on `PATH` (or stat'd directly when the name holds a slash).
pub fn run(_shell: &mut Shell, cmd: &Command<'_>) -> i32 {
    let name = cmd.arg(0);
    let pathenv = match std::env::var("PATH") {
        Ok(path) => path,
        Err(_) => {
            diag(name, "$PATH is not set");
            String::new()
        }
    };

    let mut status = 0;
    for i in 1..cmd.argc() {
        let target = cmd.arg(i);
        if target == "--" {
            continue;
        }
        if super::is_builtin(target) {
            println!("{target}: a builtin");
            continue;
        }
        if !which(&pathenv, target) {
            diag(name, format_args!("no such command '{target}'"));
            status = 1;
        }
    }
    status
}

/// Search for an executable and print where it was found. A name with a
/// slash is tested against the filesystem as-is.
fn which(pathenv: &str, name: &str) -> bool {
    if name.contains('/') {
        if sys::is_executable(name) {
            println!("{name}: an external command at {name}");
            return true;
        }
        return false;
    }
    for dir in pathenv.split(':') {
        if dir.is_empty() {
            continue;
        }
        let full = if dir.ends_with('/') {
            format!("{dir}{name}")
        } else {
            format!("{dir}/{name}")
        };
        if sys::is_executable(&full) {
            println!("{name}: an external command at {full}");
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn cmd_of(parts: &[&str]) -> Command<'static> {
        Command {
            args: parts
                .iter()
                .map(|s| Cow::Owned((*s).to_string()))
                .collect(),
        }
    }

    fn make_exe(dir: &std::path::Path, name: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_which_searches_path_dirs() {
        let dir = tempfile::tempdir().unwrap();
        make_exe(dir.path(), "mytool");
        let pathenv = format!("/nonexistent:{}", dir.path().display());
        assert!(which(&pathenv, "mytool"));
        assert!(!which(&pathenv, "missingtool"));
    }

    #[test]
    fn test_which_slash_names_skip_path() {
        let dir = tempfile::tempdir().unwrap();
        let exe = make_exe(dir.path(), "direct");
        assert!(which("", &exe));
        // Not executable: a plain data file.
        let plain = dir.path().join("data");
        fs::write(&plain, "x").unwrap();
        assert!(!which("", &plain.display().to_string()));
    }

    #[test]
    fn test_type_classifies_builtins_and_commands() {
        let dir = tempfile::tempdir().unwrap();
        make_exe(dir.path(), "sometool");
        let old_path = std::env::var("PATH").ok();
        std::env::set_var("PATH", dir.path());

        let mut shell = Shell::new("sh".to_string());
        assert_eq!(run(&mut shell, &cmd_of(&["type", "cd"])), 0);
        assert_eq!(run(&mut shell, &cmd_of(&["type", "sometool"])), 0);
        assert_eq!(run(&mut shell, &cmd_of(&["type", "nosuchtool"])), 1);
        // One hit and one miss still fails overall.
        assert_eq!(run(&mut shell, &cmd_of(&["type", "cd", "nosuchtool"])), 1);

        if let Some(path) = old_path {
            std::env::set_var("PATH", path);
        }
    }
}
