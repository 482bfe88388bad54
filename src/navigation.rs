use crate::document::Document;
use crate::markers;

/// First reference strictly after (line, col) in reading order. Content
/// definition lines never appear in the reference list, so navigation can
/// never land inside the definition block. No wrap-around.
pub fn find_next(doc: &Document, line: usize, col: usize) -> Option<(usize, usize)> {
    let scan = markers::scan(doc);
    scan.refs
        .iter()
        .find(|r| r.line > line || (r.line == line && r.start_col > col))
        .map(|r| (r.line, r.start_col))
}

/// Last reference strictly before (line, col). Symmetric to `find_next`.
pub fn find_prev(doc: &Document, line: usize, col: usize) -> Option<(usize, usize)> {
    let scan = markers::scan(doc);
    scan.refs
        .iter()
        .rev()
        .find(|r| r.line < line || (r.line == line && r.start_col < col))
        .map(|r| (r.line, r.start_col))
}
