//! Tilde expansion.
//!
//! A leading `~` becomes `$HOME`; `~name` becomes that user's home
//! directory. Anything that cannot be resolved leaves the token alone.

use crate::sys;

/// Expand a leading tilde in one token. Returns `None` when the token is
/// unchanged (no leading `~`, unset `HOME`, unknown user), so the caller
/// can keep its borrowed slot.
pub fn expand(home: Option<&str>, token: &str) -> Option<String> {
    if !token.starts_with('~') {
        return None;
    }
    // The head runs to the first `/` or space; quoting can put spaces
    // inside a token.
    let (head, tail) = match token.find(['/', ' ']) {
        Some(i) => (&token[..i], &token[i..]),
        None => (token, ""),
    };
    let dir = resolve_head(home, head)?;
    if tail.is_empty() {
        Some(dir)
    } else {
        Some(format!("{dir}{tail}"))
    }
}

fn resolve_head(home: Option<&str>, head: &str) -> Option<String> {
    if head == "~" {
        home.map(str::to_owned)
    } else {
        sys::user_home(&head[1..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: Option<&str> = Some("/home/testuser");

    #[test]
    fn test_no_tilde_is_identity() {
        assert_eq!(expand(HOME, "plain"), None);
        assert_eq!(expand(HOME, "/usr/bin"), None);
        assert_eq!(expand(HOME, "a~b"), None);
    }

    #[test]
    fn test_lone_tilde() {
        assert_eq!(expand(HOME, "~").as_deref(), Some("/home/testuser"));
    }

    #[test]
    fn test_tilde_with_tail() {
        assert_eq!(expand(HOME, "~/bin").as_deref(), Some("/home/testuser/bin"));
        // A quoted space ends the head just like a slash.
        assert_eq!(
            expand(HOME, "~ and more").as_deref(),
            Some("/home/testuser and more")
        );
    }

    #[test]
    fn test_unset_home_leaves_token() {
        assert_eq!(expand(None, "~"), None);
        assert_eq!(expand(None, "~/bin"), None);
    }

    #[test]
    fn test_named_user_root() {
        // Every Unix box has root; its home comes from the passwd database.
        let expanded = expand(HOME, "~root");
        if let Some(dir) = expanded {
            assert!(dir.starts_with('/'), "got: {dir}");
        }
    }

    #[test]
    fn test_unknown_user_leaves_token() {
        assert_eq!(expand(HOME, "~no-such-user-here"), None);
        assert_eq!(expand(HOME, "~no-such-user-here/x"), None);
    }
}
