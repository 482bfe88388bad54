use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineEnding {
    Unix,    // \n (LF)
    Windows, // \r\n (CRLF)
    Mac,     // \r (CR)
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Unix => "\n",
            LineEnding::Windows => "\r\n",
            LineEnding::Mac => "\r",
        }
    }

    pub fn system_default() -> Self {
        if cfg!(windows) {
            LineEnding::Windows
        } else {
            LineEnding::Unix
        }
    }

    pub fn detect(content: &str) -> Self {
        if content.contains("\r\n") {
            LineEnding::Windows
        } else if content.contains('\r') {
            LineEnding::Mac
        } else {
            LineEnding::Unix
        }
    }
}

/// Line-addressable text buffer with cursor tracking.
///
/// Lines are 0-indexed; columns are byte offsets into the line string.
/// All marker edits happen on ASCII span boundaries, so byte arithmetic
/// stays on char boundaries; cursor motion steps char-by-char.
#[derive(Clone)]
pub struct Document {
    pub lines: Vec<String>,
    pub cursor_line: usize,
    pub cursor_column: usize,
    pub filename: Option<PathBuf>,
    pub modified: bool,
    pub line_ending: LineEnding,
}

impl Document {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_line: 0,
            cursor_column: 0,
            filename: None,
            modified: false,
            line_ending: LineEnding::system_default(),
        }
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        let mut doc = Self::new();
        if !lines.is_empty() {
            doc.lines = lines;
        }
        doc
    }

    pub fn from_file(filename: PathBuf) -> Result<Self, std::io::Error> {
        let content = fs::read_to_string(&filename)?;
        let line_ending = LineEnding::detect(&content);
        let lines: Vec<String> = if content.is_empty() {
            vec![String::new()]
        } else {
            content.lines().map(|s| s.to_string()).collect()
        };

        Ok(Self {
            lines,
            cursor_line: 0,
            cursor_column: 0,
            filename: Some(filename),
            modified: false,
            line_ending,
        })
    }

    pub fn save(&mut self) -> Result<usize, std::io::Error> {
        if let Some(ref filename) = self.filename {
            self.save_as(filename.clone())
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "No filename specified",
            ))
        }
    }

    pub fn save_as(&mut self, filename: PathBuf) -> Result<usize, std::io::Error> {
        let content = self.lines.join(self.line_ending.as_str());
        let byte_count = content.len();
        fs::write(&filename, &content)?;
        self.filename = Some(filename);
        self.modified = false;
        Ok(byte_count)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn get_line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn line_len(&self, index: usize) -> usize {
        self.lines.get(index).map_or(0, String::len)
    }

    // --- span and line mutation (the host interface the footnote core uses) ---

    /// Replace the byte span [start, end) on `line` with `text`.
    pub fn replace_span(&mut self, line: usize, start: usize, end: usize, text: &str) {
        if let Some(l) = self.lines.get_mut(line) {
            let len = l.len();
            let start = start.min(len);
            let end = end.min(len).max(start);
            l.replace_range(start..end, text);
            self.modified = true;
        }
    }

    pub fn insert_text(&mut self, line: usize, col: usize, text: &str) {
        self.replace_span(line, col, col, text);
    }

    pub fn replace_line(&mut self, line: usize, text: String) {
        if let Some(l) = self.lines.get_mut(line) {
            *l = text;
            self.modified = true;
        }
    }

    pub fn remove_line(&mut self, line: usize) {
        if line < self.lines.len() {
            self.lines.remove(line);
            if self.lines.is_empty() {
                self.lines.push(String::new());
            }
            if self.cursor_line >= self.lines.len() {
                self.cursor_line = self.lines.len() - 1;
            }
            self.clamp_cursor_column();
            self.modified = true;
        }
    }

    pub fn append_line(&mut self, text: String) {
        self.lines.push(text);
        self.modified = true;
    }

    // --- cursor motion ---

    pub fn move_cursor_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.clamp_cursor_column();
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.clamp_cursor_column();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_column > 0 {
            let line = &self.lines[self.cursor_line];
            self.cursor_column = line[..self.cursor_column]
                .char_indices()
                .next_back()
                .map_or(0, |(i, _)| i);
        }
    }

    pub fn move_cursor_right(&mut self) {
        let line = &self.lines[self.cursor_line];
        if self.cursor_column < line.len() {
            let ch_len = line[self.cursor_column..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            self.cursor_column += ch_len;
        }
    }

    pub fn move_line_start(&mut self) {
        self.cursor_column = 0;
    }

    pub fn move_line_end(&mut self) {
        self.cursor_column = self.line_len(self.cursor_line);
    }

    pub fn move_document_start(&mut self) {
        self.cursor_line = 0;
        self.cursor_column = 0;
    }

    pub fn move_document_end(&mut self) {
        self.cursor_line = self.lines.len().saturating_sub(1);
        self.cursor_column = 0;
    }

    /// Whitespace-delimited word motion, vi's W.
    pub fn move_word_forward(&mut self) {
        let line = &self.lines[self.cursor_line];
        let col = self.cursor_column.min(line.len());
        let after_word = line[col..]
            .find(|c: char| c.is_whitespace())
            .map_or(line.len(), |i| col + i);
        let next = line[after_word..]
            .find(|c: char| !c.is_whitespace())
            .map(|i| after_word + i);

        match next {
            Some(c) => self.cursor_column = c,
            None => {
                if self.cursor_line + 1 < self.lines.len() {
                    self.cursor_line += 1;
                    let l = &self.lines[self.cursor_line];
                    self.cursor_column = l.find(|c: char| !c.is_whitespace()).unwrap_or(0);
                } else {
                    self.cursor_column = line.len();
                }
            }
        }
    }

    pub fn move_word_backward(&mut self) {
        let line = &self.lines[self.cursor_line];
        let col = self.cursor_column.min(line.len());
        let before = line[..col].trim_end();
        if before.is_empty() {
            // nothing but whitespace behind us: land on the previous line's last word
            if self.cursor_line > 0 {
                self.cursor_line -= 1;
                self.cursor_column = Self::last_word_start(&self.lines[self.cursor_line]);
            } else {
                self.cursor_column = 0;
            }
            return;
        }
        self.cursor_column = Self::last_word_start(before);
    }

    fn last_word_start(text: &str) -> usize {
        let trimmed = text.trim_end();
        match trimmed.rfind(|c: char| c.is_whitespace()) {
            Some(i) => i + trimmed[i..].chars().next().map_or(1, char::len_utf8),
            None => 0,
        }
    }

    pub fn clamp_cursor_column(&mut self) {
        let len = self.line_len(self.cursor_line);
        if self.cursor_column > len {
            self.cursor_column = len;
        }
        // snap to a char boundary in case the line shrank mid-character
        if let Some(line) = self.lines.get(self.cursor_line) {
            while self.cursor_column > 0 && !line.is_char_boundary(self.cursor_column) {
                self.cursor_column -= 1;
            }
        }
    }

    // --- insert-mode editing ---

    pub fn insert_char(&mut self, c: char) {
        self.clamp_cursor_column();
        if let Some(line) = self.lines.get_mut(self.cursor_line) {
            line.insert(self.cursor_column, c);
            self.cursor_column += c.len_utf8();
            self.modified = true;
        }
    }

    pub fn insert_newline(&mut self) {
        self.clamp_cursor_column();
        if let Some(line) = self.lines.get_mut(self.cursor_line) {
            let rest = line.split_off(self.cursor_column);
            self.lines.insert(self.cursor_line + 1, rest);
            self.cursor_line += 1;
            self.cursor_column = 0;
            self.modified = true;
        }
    }

    /// Backspace: delete the char before the cursor, joining lines at column 0.
    pub fn delete_char(&mut self) {
        if self.cursor_column > 0 {
            let line = &mut self.lines[self.cursor_line];
            let prev = line[..self.cursor_column]
                .char_indices()
                .next_back()
                .map_or(0, |(i, _)| i);
            line.replace_range(prev..self.cursor_column, "");
            self.cursor_column = prev;
            self.modified = true;
        } else if self.cursor_line > 0 {
            let current = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_column = self.lines[self.cursor_line].len();
            self.lines[self.cursor_line].push_str(&current);
            self.modified = true;
        }
    }

    /// vi's x: delete the char under the cursor.
    pub fn delete_char_forward(&mut self) {
        self.clamp_cursor_column();
        let line = &mut self.lines[self.cursor_line];
        if self.cursor_column < line.len() {
            let ch_len = line[self.cursor_column..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            line.replace_range(self.cursor_column..self.cursor_column + ch_len, "");
            self.modified = true;
            self.clamp_cursor_column();
        }
    }

    pub fn delete_line(&mut self) {
        self.remove_line(self.cursor_line);
    }

    pub fn open_line_below(&mut self) {
        self.lines.insert(self.cursor_line + 1, String::new());
        self.cursor_line += 1;
        self.cursor_column = 0;
        self.modified = true;
    }

    pub fn open_line_above(&mut self) {
        self.lines.insert(self.cursor_line, String::new());
        self.cursor_column = 0;
        self.modified = true;
    }

    // --- word boundaries for the footnote commands ---

    /// Byte span of the maximal non-whitespace run containing the cursor.
    /// A cursor sitting just past the end of a word anchors to that word.
    pub fn big_word_span_at_cursor(&self) -> Option<(usize, usize)> {
        let line = self.lines.get(self.cursor_line)?;
        if line.is_empty() {
            return None;
        }
        let mut col = self.cursor_column.min(line.len());
        if col == line.len() {
            col = line[..col].char_indices().next_back().map(|(i, _)| i)?;
        }
        let anchor = line[col..].chars().next()?;
        if anchor.is_whitespace() {
            return None;
        }
        let start = match line[..col].rfind(|c: char| c.is_whitespace()) {
            Some(i) => i + line[i..].chars().next().map_or(1, char::len_utf8),
            None => 0,
        };
        let end = line[col..]
            .find(|c: char| c.is_whitespace())
            .map_or(line.len(), |i| col + i);
        Some((start, end))
    }

    /// Byte spans of every maximal non-whitespace run on `line`.
    pub fn big_word_spans(&self, line: usize) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let Some(text) = self.get_line(line) else {
            return spans;
        };
        let mut pos = 0;
        while pos < text.len() {
            match text[pos..].find(|c: char| !c.is_whitespace()) {
                Some(i) => {
                    let start = pos + i;
                    let end = text[start..]
                        .find(|c: char| c.is_whitespace())
                        .map_or(text.len(), |j| start + j);
                    spans.push((start, end));
                    pos = end;
                }
                None => break,
            }
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> Document {
        Document::from_lines(lines.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_replace_span_shrinks_and_grows() {
        let mut d = doc(&["Hello world[^5]."]);
        d.replace_span(0, 11, 15, "[^10]");
        assert_eq!(d.lines[0], "Hello world[^10].");
        d.replace_span(0, 11, 16, "");
        assert_eq!(d.lines[0], "Hello world.");
        assert!(d.modified);
    }

    #[test]
    fn test_replace_span_out_of_range_is_ignored() {
        let mut d = doc(&["short"]);
        d.replace_span(5, 0, 2, "xx");
        assert_eq!(d.lines, vec!["short".to_string()]);
    }

    #[test]
    fn test_insert_text_at_column() {
        let mut d = doc(&["alpha beta"]);
        d.insert_text(0, 5, "[^3]");
        assert_eq!(d.lines[0], "alpha[^3] beta");
    }

    #[test]
    fn test_remove_line_clamps_cursor() {
        let mut d = doc(&["one", "two longer", "three"]);
        d.cursor_line = 2;
        d.cursor_column = 4;
        d.remove_line(2);
        assert_eq!(d.lines, vec!["one".to_string(), "two longer".to_string()]);
        assert_eq!(d.cursor_line, 1);
        assert_eq!(d.cursor_column, 4);
    }

    #[test]
    fn test_remove_last_line_keeps_one_empty() {
        let mut d = doc(&["only"]);
        d.remove_line(0);
        assert_eq!(d.lines, vec![String::new()]);
        assert_eq!(d.cursor_line, 0);
        assert_eq!(d.cursor_column, 0);
    }

    #[test]
    fn test_big_word_span_at_cursor() {
        let mut d = doc(&["Hello world[^5]."]);
        d.cursor_column = 7; // inside "world[^5]."
        assert_eq!(d.big_word_span_at_cursor(), Some((6, 16)));
        d.cursor_column = 2; // inside "Hello"
        assert_eq!(d.big_word_span_at_cursor(), Some((0, 5)));
        d.cursor_column = 5; // on the separating space
        assert_eq!(d.big_word_span_at_cursor(), None);
        d.cursor_column = 16; // end of line anchors back onto the last word
        assert_eq!(d.big_word_span_at_cursor(), Some((6, 16)));
    }

    #[test]
    fn test_big_word_span_on_whitespace_is_none() {
        let mut d = doc(&["a  b"]);
        d.cursor_column = 1;
        assert_eq!(d.big_word_span_at_cursor(), None);
        let e = doc(&[""]);
        assert_eq!(e.big_word_span_at_cursor(), None);
    }

    #[test]
    fn test_big_word_spans() {
        let d = doc(&["  one two  three "]);
        assert_eq!(d.big_word_spans(0), vec![(2, 5), (6, 9), (11, 16)]);
        assert_eq!(d.big_word_spans(3), Vec::new());
    }

    #[test]
    fn test_word_motion_forward_and_back() {
        let mut d = doc(&["one two", "  three"]);
        d.move_word_forward();
        assert_eq!((d.cursor_line, d.cursor_column), (0, 4));
        d.move_word_forward();
        assert_eq!((d.cursor_line, d.cursor_column), (1, 2));
        d.move_word_backward();
        assert_eq!((d.cursor_line, d.cursor_column), (0, 4));
        d.move_word_backward();
        assert_eq!((d.cursor_line, d.cursor_column), (0, 0));
    }

    #[test]
    fn test_insert_and_delete_chars() {
        let mut d = doc(&["ab"]);
        d.cursor_column = 1;
        d.insert_char('x');
        assert_eq!(d.lines[0], "axb");
        assert_eq!(d.cursor_column, 2);
        d.delete_char();
        assert_eq!(d.lines[0], "ab");
        assert_eq!(d.cursor_column, 1);
        d.delete_char_forward();
        assert_eq!(d.lines[0], "a");
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut d = doc(&["one", "two"]);
        d.cursor_line = 1;
        d.cursor_column = 0;
        d.delete_char();
        assert_eq!(d.lines, vec!["onetwo".to_string()]);
        assert_eq!((d.cursor_line, d.cursor_column), (0, 3));
    }

    #[test]
    fn test_insert_newline_splits_line() {
        let mut d = doc(&["oneTwo"]);
        d.cursor_column = 3;
        d.insert_newline();
        assert_eq!(d.lines, vec!["one".to_string(), "Two".to_string()]);
        assert_eq!((d.cursor_line, d.cursor_column), (1, 0));
    }

    #[test]
    fn test_save_load_round_trip_preserves_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "first\r\nsecond\r\nthird").unwrap();

        let mut d = Document::from_file(path.clone()).unwrap();
        assert_eq!(d.line_ending, LineEnding::Windows);
        assert_eq!(d.lines.len(), 3);
        d.lines[1] = "changed".to_string();
        d.modified = true;
        d.save().unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "first\r\nchanged\r\nthird");
    }
}
