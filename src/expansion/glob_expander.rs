//! Filename (pathname) expansion.
//!
//! Tokens holding `?`, `*` or `[` are matched against the filesystem;
//! each match becomes its own argv slot, in the sorted order the matcher
//! yields. A token with no matches passes through untouched.

use std::borrow::Cow;

use crate::errors::ShellError;
use crate::parser::types::Command;

/// True if `s` contains a glob metacharacter.
pub fn has_glob_chars(s: &str) -> bool {
    s.contains(['?', '*', '['])
}

/// Expand every argv slot that carries a glob metacharacter. Slots
/// without one are moved over as-is. A read error while matching aborts
/// the whole command.
pub fn expand_path(cmd: Command<'_>) -> Result<Command<'_>, ShellError> {
    let mut args: Vec<Cow<'_, str>> = Vec::with_capacity(cmd.args.len());
    for arg in cmd.args {
        if !has_glob_chars(&arg) {
            args.push(arg);
            continue;
        }
        match glob::glob(&arg) {
            // An unparsable pattern is no different from one that
            // matches nothing: the token stands.
            Err(_) => args.push(arg),
            Ok(paths) => {
                let before = args.len();
                for entry in paths {
                    let path = entry.map_err(|e| ShellError::Glob(e.to_string()))?;
                    args.push(Cow::Owned(path.to_string_lossy().into_owned()));
                }
                if args.len() == before {
                    args.push(arg);
                }
            }
        }
    }
    Ok(Command { args })
}
