//! Quote-aware scanning for trailing comments and heredoc markers.
//!
//! Tracks open `"`, `'`, backtick, `${` and `$((` spans on a stack while
//! walking a line left to right. A match only counts while the stack is
//! empty. Unterminated spans simply run to the end of the line.

const SINGLE: char = '\'';
const DOUBLE: char = '"';
const BACKTICK: char = '`';
const EXPANSION: char = '{';
/// Open `$((` arithmetic span
const ARITHMETIC: char = '%';
/// Parenthesized group nested inside an arithmetic span
const GROUP: char = '(';

/// Byte offset of the first occurrence of `needle` outside any quoted or
/// parameter-expansion span.
pub fn find_unquoted(text: &str, needle: &str) -> Option<usize> {
    let mut stack: Vec<char> = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let top = stack.last().copied();

        // Single quotes are literal up to the closing quote
        if top == Some(SINGLE) {
            if c == SINGLE {
                stack.pop();
            }
            continue;
        }

        match c {
            '\\' => {
                chars.next();
            }
            SINGLE if top == Some(DOUBLE) => {}
            DOUBLE | SINGLE | BACKTICK => {
                if top == Some(c) {
                    stack.pop();
                } else {
                    stack.push(c);
                }
            }
            '$' => match chars.peek() {
                Some((_, EXPANSION)) => {
                    chars.next();
                    stack.push(EXPANSION);
                }
                // `<<` inside `$((...))` is a shift, not a heredoc
                Some((_, '(')) if text[i + 1..].starts_with("((") => {
                    chars.next();
                    chars.next();
                    stack.push(ARITHMETIC);
                }
                // `$#` is the shell's argument count, not a comment
                Some((_, '#')) => {
                    chars.next();
                }
                _ => {}
            },
            '}' if top == Some(EXPANSION) => {
                stack.pop();
            }
            '(' if matches!(top, Some(ARITHMETIC | GROUP)) => stack.push(GROUP),
            ')' if top == Some(GROUP) => {
                stack.pop();
            }
            ')' if top == Some(ARITHMETIC) && matches!(chars.peek(), Some((_, ')'))) => {
                chars.next();
                stack.pop();
            }
            _ if stack.is_empty() && text[i..].starts_with(needle) => return Some(i),
            _ => {}
        }
    }

    None
}

/// Split a line remainder into content and an optional trailing comment.
///
/// The content is right-trimmed; the comment text after `#` is kept verbatim.
pub fn split_comment(text: &str) -> (String, Option<String>) {
    match find_unquoted(text, "#") {
        Some(idx) => (
            text[..idx].trim_end().to_string(),
            Some(text[idx + 1..].to_string()),
        ),
        None => (text.trim_end().to_string(), None),
    }
}
