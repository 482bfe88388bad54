use crate::document::Document;
use crate::markers::{self, FootnoteScan};

/// What one organize pass did, for the status line.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrganizeReport {
    pub renumbered: usize,
    pub orphans_removed: usize,
    pub lines_reordered: usize,
}

impl OrganizeReport {
    pub fn changed(&self) -> bool {
        self.renumbered > 0 || self.orphans_removed > 0 || self.lines_reordered > 0
    }

    pub fn summary(&self) -> String {
        if !self.changed() {
            return "Footnotes already organized".to_string();
        }
        format!(
            "Footnotes organized: {} renumbered, {} orphans removed, {} lines reordered",
            self.renumbered, self.orphans_removed, self.lines_reordered
        )
    }
}

/// Batch organize pass: renumber references into first-occurrence order,
/// delete orphan references, then reorder content lines to match. Content
/// definitions with no reference are left in place.
pub fn organize(doc: &mut Document) -> OrganizeReport {
    let mut report = OrganizeReport::default();
    let mut scan = markers::scan(doc);
    let assigned = renumber(doc, &mut scan, &mut report);
    sort_content(doc, assigned, &mut report);
    doc.clamp_cursor_column();
    report
}

/// Single left-to-right pass over the reference list. The counter starts at
/// 1 and advances only when a label gets (or already holds) its canonical
/// value; labels below the counter were assigned on an earlier step. Swapping
/// rather than overwriting keeps every pre-existing label resolvable at each
/// intermediate step. Returns the number of labels assigned.
fn renumber(doc: &mut Document, scan: &mut FootnoteScan, report: &mut OrganizeReport) -> u32 {
    let mut counter: u32 = 1;
    for idx in 0..scan.refs.len() {
        if scan.removed[idx] {
            continue;
        }
        let label = scan.refs[idx].label;
        if label < counter {
            continue;
        }
        if resolve_orphan(doc, scan, label, report) {
            continue;
        }
        if label != counter {
            swap_labels(doc, scan, label, counter);
            report.renumbered += 1;
        }
        counter += 1;
    }
    counter - 1
}

/// OrphanResolver: if no content definition carries `label`, delete every
/// reference carrying it (text span removed, tombstone set, later same-row
/// columns shifted) and return true. Otherwise mutate nothing.
fn resolve_orphan(
    doc: &mut Document,
    scan: &mut FootnoteScan,
    label: u32,
    report: &mut OrganizeReport,
) -> bool {
    if scan.content_has_label(label) {
        return false;
    }
    for idx in 0..scan.refs.len() {
        if !scan.removed[idx] && scan.refs[idx].label == label {
            remove_reference_text(doc, scan, idx);
            report.orphans_removed += 1;
        }
    }
    true
}

fn remove_reference_text(doc: &mut Document, scan: &mut FootnoteScan, idx: usize) {
    let r = scan.refs[idx];
    doc.replace_span(r.line, r.start_col, r.end_col, "");
    scan.removed[idx] = true;
    scan.shift_columns(r.line, r.end_col, -((r.end_col - r.start_col) as isize));
}

/// True swap: every live reference and every content line carrying `a` is
/// rewritten to `b` and vice versa, so an entity already numbered `b` keeps
/// a resolvable pair instead of being clobbered.
fn swap_labels(doc: &mut Document, scan: &mut FootnoteScan, a: u32, b: u32) {
    for idx in 0..scan.refs.len() {
        if scan.removed[idx] {
            continue;
        }
        let old = scan.refs[idx].label;
        let new = match old {
            l if l == a => b,
            l if l == b => a,
            _ => continue,
        };
        rewrite_reference(doc, scan, idx, new);
    }
    for idx in 0..scan.content.len() {
        let old = scan.content[idx].label;
        let new = match old {
            l if l == a => b,
            l if l == b => a,
            _ => continue,
        };
        rewrite_content_label(doc, scan, idx, new);
    }
}

/// Rewrite one reference's marker text in place; a digit-width change (e.g.
/// 9 -> 10) shifts every later reference on the same row.
fn rewrite_reference(doc: &mut Document, scan: &mut FootnoteScan, idx: usize, new_label: u32) {
    let r = scan.refs[idx];
    let text = format!("[^{new_label}]");
    doc.replace_span(r.line, r.start_col, r.end_col, &text);
    let delta = text.len() as isize - (r.end_col - r.start_col) as isize;
    scan.refs[idx].label = new_label;
    scan.refs[idx].end_col = r.start_col + text.len();
    scan.shift_columns(r.line, r.end_col, delta);
}

/// Content labels start at column 0; no references share the line, so no
/// column shifting is needed.
fn rewrite_content_label(doc: &mut Document, scan: &mut FootnoteScan, idx: usize, new_label: u32) {
    let c = scan.content[idx];
    let old_width = format!("[^{}]", c.label).len();
    doc.replace_span(c.line, 0, old_width, &format!("[^{new_label}]"));
    scan.content[idx].label = new_label;
}

/// ContentSorter: put content line `i` (label `i`) at the `i`-th content
/// position by swapping whole line texts. Coordinates come from a fresh scan
/// because renumbering already edited the document. The cursor follows its
/// content through each swap.
fn sort_content(doc: &mut Document, assigned: u32, report: &mut OrganizeReport) {
    let scan = markers::scan(doc);
    let mut content = scan.content;
    for target in 1..=assigned {
        let pos = (target - 1) as usize;
        if pos >= content.len() {
            break;
        }
        let Some(found) = (pos..content.len()).find(|&j| content[j].label == target) else {
            continue;
        };
        if found == pos {
            continue;
        }
        let row_a = content[pos].line;
        let row_b = content[found].line;
        swap_line_text(doc, row_a, row_b);
        // entries keep their rows; only the labels travel with the text
        let tmp = content[pos].label;
        content[pos].label = content[found].label;
        content[found].label = tmp;
        report.lines_reordered += 1;
    }
}

fn swap_line_text(doc: &mut Document, row_a: usize, row_b: usize) {
    let a = doc.get_line(row_a).map(str::to_string);
    let b = doc.get_line(row_b).map(str::to_string);
    if let (Some(a), Some(b)) = (a, b) {
        doc.replace_line(row_a, b);
        doc.replace_line(row_b, a);
    }
    if doc.cursor_line == row_a {
        doc.cursor_line = row_b;
    } else if doc.cursor_line == row_b {
        doc.cursor_line = row_a;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> Document {
        Document::from_lines(lines.iter().map(|s| s.to_string()).collect())
    }

    fn lines(doc: &Document) -> Vec<&str> {
        doc.lines.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_round_trip_scenario() {
        let mut d = doc(&["Hello world[^5].", "", "[^5]: definition"]);
        let report = organize(&mut d);
        assert_eq!(lines(&d), vec!["Hello world[^1].", "", "[^1]: definition"]);
        assert_eq!(report.renumbered, 1);
        assert_eq!(report.orphans_removed, 0);
    }

    #[test]
    fn test_swap_scenario_literal_oracle() {
        let mut d = doc(&["A[^2] B[^1].", "", "[^1]: one", "[^2]: two"]);
        organize(&mut d);
        assert_eq!(
            lines(&d),
            vec!["A[^1] B[^2].", "", "[^1]: two", "[^2]: one"]
        );
    }

    #[test]
    fn test_orphan_reference_is_deleted() {
        let mut d = doc(&["keep[^1] drop[^7] tail", "", "[^1]: kept"]);
        let report = organize(&mut d);
        assert_eq!(lines(&d), vec!["keep[^1] drop tail", "", "[^1]: kept"]);
        assert_eq!(report.orphans_removed, 1);
        // no content line was invented for the orphan
        assert!(!d.lines.iter().any(|l| l.starts_with("[^7]:")));
    }

    #[test]
    fn test_orphan_content_is_left_alone() {
        let mut d = doc(&["word[^3]", "", "[^3]: live", "[^9]: stale"]);
        organize(&mut d);
        assert_eq!(lines(&d), vec!["word[^1]", "", "[^1]: live", "[^9]: stale"]);
    }

    #[test]
    fn test_multi_reference_preserved() {
        let mut d = doc(&["first[^4] and again[^4]", "", "[^4]: shared"]);
        organize(&mut d);
        assert_eq!(
            lines(&d),
            vec!["first[^1] and again[^1]", "", "[^1]: shared"]
        );
    }

    #[test]
    fn test_idempotence() {
        let mut d = doc(&["A[^2] B[^1] C[^9]", "", "[^1]: one", "[^2]: two"]);
        organize(&mut d);
        let after_first = d.lines.clone();
        let report = organize(&mut d);
        assert_eq!(d.lines, after_first);
        assert!(!report.changed());
        assert_eq!(report.summary(), "Footnotes already organized");
    }

    #[test]
    fn test_first_occurrence_order_across_lines() {
        let mut d = doc(&[
            "late[^9] early[^2]",
            "middle[^5]",
            "",
            "[^2]: b",
            "[^5]: c",
            "[^9]: a",
        ]);
        organize(&mut d);
        assert_eq!(
            lines(&d),
            vec![
                "late[^1] early[^2]",
                "middle[^3]",
                "",
                "[^1]: a",
                "[^2]: b",
                "[^3]: c",
            ]
        );
    }

    #[test]
    fn test_width_change_keeps_same_row_spans_valid() {
        // [^10] shrinks to [^1] and the old [^1]s widen to [^10] mid-pass;
        // every later marker on the row must stay addressable throughout
        let mut d = doc(&["x[^10] y[^1] z[^1]", "", "[^10]: ten", "[^1]: one"]);
        organize(&mut d);
        assert_eq!(
            lines(&d),
            vec!["x[^1] y[^2] z[^2]", "", "[^1]: ten", "[^2]: one"]
        );
    }

    #[test]
    fn test_orphans_among_live_references_on_one_line() {
        let mut d = doc(&["a[^3] b[^7] c[^3]", "", "[^3]: x"]);
        let report = organize(&mut d);
        assert_eq!(lines(&d), vec!["a[^1] b c[^1]", "", "[^1]: x"]);
        assert_eq!(report.orphans_removed, 1);
    }

    #[test]
    fn test_cursor_follows_swapped_content_line() {
        let mut d = doc(&["A[^2] B[^1].", "", "[^1]: one", "[^2]: two"]);
        d.cursor_line = 3; // on "[^2]: two", whose text ends up on row 2
        d.cursor_column = 6;
        organize(&mut d);
        assert_eq!(d.cursor_line, 2);
        assert_eq!(d.lines[2], "[^1]: two");
    }

    #[test]
    fn test_organize_empty_document_is_noop() {
        let mut d = doc(&["nothing to see"]);
        let report = organize(&mut d);
        assert_eq!(lines(&d), vec!["nothing to see"]);
        assert!(!report.changed());
    }
}
