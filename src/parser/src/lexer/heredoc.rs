//! Heredoc (block literal) scanner.

/// A captured block literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Heredoc {
    /// `<<-` was used
    pub strip_tabs: bool,
    /// Terminator word, with any surrounding quotes removed
    pub delimiter: String,
    /// Opening-line remainder followed by every captured line, terminator included
    pub lines: Vec<String>,
    /// Number of lines consumed after the opening line
    pub consumed: usize,
}

/// Open a heredoc from the text right after a `<<` marker and capture its
/// body from `following`.
///
/// Returns `None` when no delimiter word follows the marker (or the marker
/// is really a `<<<` here-string). The delimiter is the first word with
/// surrounding quotes removed. A body that never sees its terminator is
/// closed at end of input.
pub fn scan_heredoc(after_marker: &str, following: &[String]) -> Option<Heredoc> {
    if after_marker.starts_with('<') {
        return None;
    }

    let (strip_tabs, opening) = match after_marker.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, after_marker),
    };

    let delimiter = opening
        .split_whitespace()
        .next()
        .map(|word| word.trim_matches(|c| c == '\'' || c == '"'))
        .unwrap_or("");
    if delimiter.is_empty() {
        return None;
    }

    let mut lines = vec![opening.to_string()];
    let mut consumed = 0;
    for line in following {
        lines.push(line.clone());
        consumed += 1;
        if line.starts_with(delimiter) {
            break;
        }
    }

    Some(Heredoc {
        strip_tabs,
        delimiter: delimiter.to_string(),
        lines,
        consumed,
    })
}
