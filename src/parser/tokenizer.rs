//! Tokenizer for one command's worth of input.
//!
//! Tokens are separated by ASCII space only. A backslash escapes the
//! following character; single and double quotes open a region in which
//! the matching quote is the only separator. Quote characters and
//! escaping backslashes are removed from the result. A token that needed
//! no rewriting is returned as a borrowed slice of the input line.

use std::borrow::Cow;

use crate::errors::SyntaxError;

/// Split `line` into argv slots. Input past the first newline is
/// ignored; empty tokens are elided. Fails if the line ends inside a
/// quoted region.
pub fn tokenize(line: &str) -> Result<Vec<Cow<'_, str>>, SyntaxError> {
    let line = match line.find('\n') {
        Some(i) => &line[..i],
        None => line,
    };

    let mut args: Vec<Cow<'_, str>> = Vec::new();
    let mut buf = String::new();
    let mut dirty = false;
    let mut start: Option<usize> = None;
    let mut quote: Option<char> = None;

    let mut it = line.char_indices();
    while let Some((i, c)) = it.next() {
        match c {
            '\\' => {
                make_dirty(line, &mut buf, &mut dirty, &mut start, i);
                // The escaped character is taken literally, whatever it is.
                if let Some((_, escaped)) = it.next() {
                    buf.push(escaped);
                }
            }
            c if quote == Some(c) => {
                // The closing quote ends both the region and the token.
                quote = None;
                flush(line, &mut args, &mut start, i, &mut buf, &mut dirty);
            }
            '\'' | '"' if quote.is_none() => {
                make_dirty(line, &mut buf, &mut dirty, &mut start, i);
                quote = Some(c);
            }
            ' ' if quote.is_none() => {
                flush(line, &mut args, &mut start, i, &mut buf, &mut dirty);
            }
            _ => {
                if dirty {
                    buf.push(c);
                } else if start.is_none() {
                    start = Some(i);
                }
            }
        }
    }

    if quote.is_some() {
        return Err(SyntaxError::UnclosedQuote);
    }
    flush(line, &mut args, &mut start, line.len(), &mut buf, &mut dirty);
    Ok(args)
}

/// Switch the current token from borrowed to owned accumulation,
/// copying whatever of it was already scanned.
fn make_dirty(
    line: &str,
    buf: &mut String,
    dirty: &mut bool,
    start: &mut Option<usize>,
    upto: usize,
) {
    if !*dirty {
        *dirty = true;
        if let Some(s) = *start {
            buf.push_str(&line[s..upto]);
        }
        start.get_or_insert(upto);
    }
}

/// Finish the current token, if any, ending at byte offset `end`.
fn flush<'a>(
    line: &'a str,
    args: &mut Vec<Cow<'a, str>>,
    start: &mut Option<usize>,
    end: usize,
    buf: &mut String,
    dirty: &mut bool,
) {
    if *dirty {
        *dirty = false;
        *start = None;
        let tok = std::mem::take(buf);
        if !tok.is_empty() {
            args.push(Cow::Owned(tok));
        }
    } else if let Some(s) = start.take() {
        if s < end {
            args.push(Cow::Borrowed(&line[s..end]));
        }
    }
}
