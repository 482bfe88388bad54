use crate::controller::{Controller, Mode};
use crate::document::Document;
use crate::markers::{self, FootnoteScan, Reference};
use crate::navigation;
use crate::organize;
use std::collections::HashMap;

impl Controller {
    /// Act on the footnote context at the cursor: jump between a reference
    /// and its content, clean up an orphan, reuse a label for a repeated
    /// word, or mint a brand-new footnote with an empty content stub.
    pub fn handle_footnote_command(&mut self) {
        let line = self.document.cursor_line;
        let col = self.document.cursor_column;
        let scan = markers::scan(&self.document);

        // On a reference, or on the word one annotates
        if let Some(r) = reference_at_cursor(&self.document, &scan, line, col) {
            if let Some(c) = scan.find_content(r.label) {
                self.document.cursor_line = c.line;
                self.document.cursor_column = self.document.line_len(c.line);
                self.mode = Mode::Insert;
                self.status_message = format!("Footnote {}", r.label);
            } else {
                self.document.replace_span(r.line, r.start_col, r.end_col, "");
                self.document.clamp_cursor_column();
                self.status_message = "Orphan footnote reference removed".to_string();
            }
            return;
        }

        // On a content definition line
        if let Some(c) = scan.content.iter().find(|c| c.line == line).copied() {
            if let Some(r) = scan.refs.iter().find(|r| r.label == c.label) {
                self.document.cursor_line = r.line;
                self.document.cursor_column = r.start_col;
                self.status_message = format!("Footnote {}", c.label);
            } else {
                self.document.remove_line(line);
                self.status_message = "Orphan footnote content removed".to_string();
            }
            return;
        }

        // On a plain word: reuse an existing label for the same word
        let Some((start, end)) = self.document.big_word_span_at_cursor() else {
            self.status_message = "No word under cursor".to_string();
            return;
        };
        let word = self
            .document
            .get_line(line)
            .map(|l| l[start..end].to_string())
            .unwrap_or_default();
        if let Some(&label) = word_label_map(&self.document).get(&word) {
            self.document.insert_text(line, end, &format!("[^{label}]"));
            self.status_message = format!("Reused footnote {label}");
            return;
        }

        // Mint a fresh footnote
        let label = scan.next_label();
        self.document.insert_text(line, end, &format!("[^{label}]"));
        self.document.append_line(String::new());
        self.document.append_line(format!("[^{label}]: "));
        self.document.cursor_line = self.document.line_count() - 1;
        self.document.cursor_column = self.document.line_len(self.document.cursor_line);
        if self.config.organize_on_new {
            organize::organize(&mut self.document);
            // the stub may have been renumbered or moved; stay at its end
            self.document.cursor_column = self.document.line_len(self.document.cursor_line);
        }
        self.mode = Mode::Insert;
        self.status_message = "New footnote created".to_string();
    }

    pub fn handle_organize_command(&mut self) {
        let report = organize::organize(&mut self.document);
        self.status_message = if self.config.debug_print {
            report.summary()
        } else if report.changed() {
            "Footnotes organized".to_string()
        } else {
            "Footnotes already organized".to_string()
        };
    }

    pub fn handle_next_footnote(&mut self) {
        let line = self.document.cursor_line;
        let col = self.document.cursor_column;
        match navigation::find_next(&self.document, line, col) {
            Some((l, c)) => {
                self.document.cursor_line = l;
                self.document.cursor_column = c;
                self.status_message.clear();
            }
            None => self.status_message = "No more footnotes".to_string(),
        }
    }

    pub fn handle_prev_footnote(&mut self) {
        let line = self.document.cursor_line;
        let col = self.document.cursor_column;
        match navigation::find_prev(&self.document, line, col) {
            Some((l, c)) => {
                self.document.cursor_line = l;
                self.document.cursor_column = c;
                self.status_message.clear();
            }
            None => self.status_message = "No previous footnote".to_string(),
        }
    }

    /// Propagate existing references: every bare occurrence of a word that
    /// already carries a `[^N]` somewhere gets the same reference appended.
    pub fn handle_auto_reference_all(&mut self) {
        let map = word_label_map(&self.document);
        if map.is_empty() {
            self.status_message = "No footnote references to propagate".to_string();
            return;
        }

        let mut added = 0;
        for line_idx in 0..self.document.line_count() {
            let is_content = self
                .document
                .get_line(line_idx)
                .is_some_and(|l| markers::content_regex().is_match(l));
            if is_content {
                continue;
            }

            let mut insertions: Vec<(usize, u32)> = Vec::new();
            for (start, end) in self.document.big_word_spans(line_idx) {
                let Some(text) = self.document.get_line(line_idx) else {
                    break;
                };
                let word = &text[start..end];
                if word.contains("[^") {
                    continue;
                }
                if let Some(&label) = map.get(word) {
                    insertions.push((end, label));
                }
            }

            // apply left to right, sliding later columns by what was inserted
            let mut delta = 0;
            for (end, label) in insertions {
                let marker = format!("[^{label}]");
                self.document.insert_text(line_idx, end + delta, &marker);
                delta += marker.len();
                added += 1;
            }
        }

        self.document.clamp_cursor_column();
        self.status_message = if added == 0 {
            "No new references to add".to_string()
        } else {
            format!("{added} footnote references added")
        };
    }
}

/// The reference whose span contains the cursor, or failing that, the first
/// reference inside the non-whitespace run the cursor sits on. Pressing the
/// footnote key on the word a marker annotates acts on that marker.
fn reference_at_cursor(
    doc: &Document,
    scan: &FootnoteScan,
    line: usize,
    col: usize,
) -> Option<Reference> {
    if let Some(r) = scan
        .refs
        .iter()
        .find(|r| r.line == line && r.start_col <= col && col < r.end_col)
    {
        return Some(*r);
    }
    let (start, end) = doc.big_word_span_at_cursor()?;
    scan.refs
        .iter()
        .find(|r| r.line == line && r.start_col >= start && r.end_col <= end)
        .copied()
}

/// Map WORD -> label for every `WORD[^N]` in the document, where WORD is the
/// maximal non-whitespace run immediately preceding the marker. First
/// occurrence in reading order wins.
fn word_label_map(doc: &Document) -> HashMap<String, u32> {
    let mut map = HashMap::new();
    let scan = markers::scan(doc);
    for r in &scan.refs {
        let Some(line) = doc.get_line(r.line) else {
            continue;
        };
        let before = &line[..r.start_col];
        let start = match before.rfind(|c: char| c.is_whitespace()) {
            Some(i) => i + before[i..].chars().next().map_or(1, char::len_utf8),
            None => 0,
        };
        let word = &before[start..];
        if word.is_empty() {
            continue;
        }
        map.entry(word.to_string()).or_insert(r.label);
    }
    map
}
