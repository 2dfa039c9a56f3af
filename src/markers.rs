//! Doc-comment markers and struct tags.

use crate::model::{Markers, Tags};

/// Parses the comments of one group into markers.
///
/// Each non-empty line splits on its first `=`: the trimmed left side is the
/// key and the trimmed right side the value (empty without `=`). Later keys
/// overwrite earlier ones.
pub fn parse_markers<'a>(comments: impl IntoIterator<Item = &'a str>) -> Markers {
    let mut markers = Markers::new();
    for comment in comments {
        for line in comment_lines(comment) {
            let (key, value) = line.split_once('=').unwrap_or((line, ""));
            markers.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    markers
}

/// Text lines of one comment with delimiters removed.
fn comment_lines(comment: &str) -> impl Iterator<Item = &str> {
    let body = match comment.strip_prefix("//") {
        Some(rest) => rest,
        None => {
            let rest = comment.strip_prefix("/*").unwrap_or(comment);
            rest.strip_suffix("*/").unwrap_or(rest)
        }
    };
    body.lines()
        .map(|line| {
            let line = line.trim();
            // Continuation lines of block comments often start with `*`.
            line.strip_prefix('*').map_or(line, str::trim_start)
        })
        .filter(|line| !line.is_empty())
}

/// Parses a struct tag literal as written (backquoted or double-quoted).
///
/// Groups are separated by spaces; each splits on its first `:` into a
/// namespace and a comma-separated value list. Groups without `:` are dropped.
pub fn parse_tags(literal: &str) -> Tags {
    let raw = unquote_tag(literal);
    let mut tags = Tags::new();
    for group in raw.split(' ').filter(|g| !g.is_empty()) {
        let Some((namespace, values)) = group.split_once(':') else {
            continue;
        };
        let values = values.replace('"', "");
        tags.insert(
            namespace.to_string(),
            values.split(',').map(str::to_string).collect(),
        );
    }
    tags
}

fn unquote_tag(literal: &str) -> String {
    if let Some(inner) = literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        return inner.to_string();
    }
    let Some(inner) = literal.strip_prefix('"').and_then(|s| s.strip_suffix('"')) else {
        return literal.replace('`', "");
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
