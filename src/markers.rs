use crate::document::Document;
use regex::Regex;
use std::sync::OnceLock;

/// Inline footnote reference `[^N]`: a byte span on one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reference {
    pub line: usize,
    pub start_col: usize,
    pub end_col: usize,
    pub label: u32,
}

/// Content definition line `[^N]: ...` (label always starts at column 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentLine {
    pub line: usize,
    pub label: u32,
}

pub fn reference_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\^(\d+)\]").expect("reference pattern compiles"))
}

pub fn content_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[\^(\d+)\]:").expect("content pattern compiles"))
}

/// One scan of the whole document: references and content definitions in
/// reading order, plus a tombstone flag per reference so entries can be
/// deleted mid-iteration without invalidating indices.
#[derive(Debug, Clone)]
pub struct FootnoteScan {
    pub refs: Vec<Reference>,
    pub removed: Vec<bool>,
    pub content: Vec<ContentLine>,
}

/// Scan every line once. A line matching the content pattern is classified
/// exclusively as content; its body is not searched for references.
pub fn scan(doc: &Document) -> FootnoteScan {
    let mut refs = Vec::new();
    let mut content = Vec::new();

    for line_idx in 0..doc.line_count() {
        let Some(line) = doc.get_line(line_idx) else {
            continue;
        };
        if let Some(caps) = content_regex().captures(line) {
            if let Ok(label) = caps[1].parse::<u32>() {
                content.push(ContentLine {
                    line: line_idx,
                    label,
                });
            }
            continue;
        }
        for caps in reference_regex().captures_iter(line) {
            let m = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            if let Ok(label) = caps[1].parse::<u32>() {
                refs.push(Reference {
                    line: line_idx,
                    start_col: m.start(),
                    end_col: m.end(),
                    label,
                });
            }
        }
    }

    let removed = vec![false; refs.len()];
    FootnoteScan {
        refs,
        removed,
        content,
    }
}

impl FootnoteScan {
    pub fn content_has_label(&self, label: u32) -> bool {
        self.content.iter().any(|c| c.label == label)
    }

    pub fn find_content(&self, label: u32) -> Option<&ContentLine> {
        self.content.iter().find(|c| c.label == label)
    }

    /// After a span on `line` was replaced by text `delta` bytes longer
    /// (negative: shorter), shift every reference on that line whose start
    /// column is at or past `from_col`. Keeps the rest of this scan's
    /// coordinates valid without a re-scan. Lists are row-contiguous, so
    /// the walk stops at the first entry past `line`.
    pub fn shift_columns(&mut self, line: usize, from_col: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        for r in self.refs.iter_mut() {
            if r.line < line {
                continue;
            }
            if r.line > line {
                break;
            }
            if r.start_col >= from_col {
                r.start_col = (r.start_col as isize + delta) as usize;
                r.end_col = (r.end_col as isize + delta) as usize;
            }
        }
    }

    /// Next free label: one past the highest label anywhere in the scan.
    /// Content labels count too, so a stale orphan definition can never
    /// collide with a freshly minted reference.
    pub fn next_label(&self) -> u32 {
        self.refs
            .iter()
            .map(|r| r.label)
            .chain(self.content.iter().map(|c| c.label))
            .max()
            .map_or(1, |m| m + 1)
    }
}
