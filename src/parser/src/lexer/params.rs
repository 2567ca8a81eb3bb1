//! Flag parameter scanner.
//!
//! Pulls leading `--key=value` and bare `--key` flags off an instruction's
//! remaining text. A bare flag means `true`.

use std::collections::HashMap;

/// One scanned flag plus the text that follows it.
#[derive(Debug, PartialEq)]
pub struct Param<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub rest: &'a str,
}

/// Scan a single leading flag. Returns `None` when the text does not start
/// with a well-formed `--key`.
pub fn take_param(input: &str) -> Option<Param<'_>> {
    let body = input.trim_start().strip_prefix("--")?;
    let end = body.find(char::is_whitespace).unwrap_or(body.len());
    let word = &body[..end];

    let (key, value) = match word.split_once('=') {
        Some((key, value)) => (key, value),
        None => (word, "true"),
    };
    if key.is_empty() {
        return None;
    }

    Some(Param {
        key,
        value,
        rest: body[end..].trim_start(),
    })
}

/// Consume every leading flag, accumulating repeated keys in order.
/// Returns the collected flags and the remaining text.
pub fn take_params(input: &str) -> (HashMap<String, Vec<String>>, &str) {
    let mut params: HashMap<String, Vec<String>> = HashMap::new();
    let mut rest = input.trim_start();

    while let Some(param) = take_param(rest) {
        params
            .entry(param.key.to_string())
            .or_default()
            .push(param.value.to_string());
        rest = param.rest;
    }

    (params, rest)
}
