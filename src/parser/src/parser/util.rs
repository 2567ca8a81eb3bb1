//! Content helpers shared by the per-instruction builders.

use std::collections::BTreeMap;

use crate::ast::{PortInfo, Protocol};

/// Parse an exec-form `["a", "b"]` array, or split shell-form text into words.
///
/// Bracketed text that is not a valid string array is split like shell form.
pub fn parse_word_list(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.starts_with('[') {
        if let Ok(words) = serde_json::from_str::<Vec<String>>(text) {
            return words;
        }
        tracing::debug!(text, "Bracketed content is not a string array, splitting words");
    }
    shell_split(text)
}

/// Whitespace split that keeps quote characters in place.
fn shell_split(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}

/// Parse `ENV`/`LABEL` content into key/value pairs.
///
/// A word without `=` extends the previous value (the legacy `ENV KEY value`
/// form ends up here too); a lone bare key gets an empty value.
pub fn parse_assigns(text: &str) -> BTreeMap<String, String> {
    parse_pairs(text, false)
}

/// Parse `ARG` content into name/default pairs. Bare words are names
/// without a default.
pub fn parse_arg_pairs(text: &str) -> BTreeMap<String, String> {
    parse_pairs(text, true)
}

fn parse_pairs(text: &str, bare_words_are_keys: bool) -> BTreeMap<String, String> {
    let mut pairs: Vec<(String, String)> = Vec::new();

    for word in text.split_whitespace() {
        if let Some((_, value)) = pairs.last_mut() {
            if has_open_quote(value) {
                value.push(' ');
                value.push_str(word);
                continue;
            }
        }

        match word.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                pairs.push((key.to_string(), value.to_string()));
            }
            _ => match pairs.last_mut() {
                Some((_, value)) if !bare_words_are_keys => {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(word);
                }
                _ => pairs.push((word.to_string(), String::new())),
            },
        }
    }

    pairs.into_iter().collect()
}

/// Whether `value` has an unterminated double-quoted span.
fn has_open_quote(value: &str) -> bool {
    let mut open = false;
    let mut escaped = false;
    for c in value.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => open = !open,
            _ => {}
        }
    }
    open
}

/// Split `FROM` content into image and optional `AS` alias.
pub fn parse_from_content(content: &str) -> (String, Option<String>) {
    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.len() >= 3 && parts[1].eq_ignore_ascii_case("AS") {
        (parts[0].to_string(), Some(parts[2..].join(" ")))
    } else {
        (content.trim().to_string(), None)
    }
}

/// Parse `EXPOSE` content into ports; the protocol defaults to tcp.
pub fn parse_ports(content: &str) -> Vec<PortInfo> {
    content
        .split_whitespace()
        .map(|part| match part.split_once('/') {
            Some((port, proto)) if proto.eq_ignore_ascii_case("udp") => {
                PortInfo::new(port, Protocol::Udp)
            }
            Some((port, _)) => PortInfo::new(port, Protocol::Tcp),
            None => PortInfo::new(part, Protocol::Tcp),
        })
        .collect()
}

/// Drop a leading `CMD` word from `HEALTHCHECK` content.
pub fn strip_cmd_prefix(content: &str) -> &str {
    let content = content.trim_start();
    match content.split_once(char::is_whitespace) {
        Some((word, rest)) if word.eq_ignore_ascii_case("CMD") => rest.trim_start(),
        None if content.eq_ignore_ascii_case("CMD") => "",
        _ => content,
    }
}

/// Split file-staging words into sources and destination.
///
/// Fewer than two words leaves the source list empty.
pub fn split_sources(mut words: Vec<String>) -> (Vec<String>, String) {
    let destination = words.pop().unwrap_or_default();
    if words.is_empty() {
        return (Vec::new(), destination);
    }
    (words, destination)
}
