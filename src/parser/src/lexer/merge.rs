//! Line merger.
//!
//! Joins physical lines ending in `\` into logical lines. Every physical line
//! is trimmed first, blank lines survive as empty logical lines, and comment
//! lines found inside an open continuation are dropped.

/// Join lines ending with `\` into single logical lines.
pub fn merge_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut logical_lines = Vec::new();
    let mut current = String::new();
    let mut continuing = false;

    for line in lines {
        let line = line.as_ref().trim();

        if continuing && line.starts_with('#') {
            continue;
        }

        if let Some(stripped) = line.strip_suffix('\\') {
            // Remove the marker and keep accumulating, no separator
            current.push_str(stripped);
            continuing = true;
        } else {
            current.push_str(line);
            logical_lines.push(std::mem::take(&mut current));
            continuing = false;
        }
    }

    // Handle trailing continuation without final line
    if continuing {
        logical_lines.push(current);
    }

    logical_lines
}

/// Split raw text into physical lines.
pub fn split_lines(content: &str) -> Vec<&str> {
    content.lines().collect()
}
