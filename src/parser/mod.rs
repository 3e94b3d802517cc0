//! Command-line parsing: tokenization, tilde expansion, redirections.

pub mod redirect;
pub mod tokenizer;
pub mod types;

pub use redirect::parse_redir;
pub use types::{Command, RedirPlan, RedirSource};

use std::borrow::Cow;

use crate::errors::SyntaxError;
use crate::expansion::tilde;

/// Tokenize one command's worth of input and tilde-expand every slot.
/// The second return value reports whether the raw text held a glob
/// metacharacter, a hint that pathname expansion may be needed later
/// (quoting does not suppress it).
pub fn parse_cmd(input: &str) -> Result<(Command<'_>, bool), SyntaxError> {
    let can_expand_path = input.contains(['?', '*', '[']);
    let home = std::env::var("HOME").ok();
    let args = tokenizer::tokenize(input)?
        .into_iter()
        .map(|tok| match tilde::expand(home.as_deref(), &tok) {
            Some(expanded) => Cow::Owned(expanded),
            None => tok,
        })
        .collect();
    Ok((Command { args }, can_expand_path))
}
