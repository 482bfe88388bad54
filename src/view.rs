use crate::controller::Mode;
use crate::document::Document;
use crossterm::{
    cursor, queue,
    style::Print,
    terminal::{Clear, ClearType, size},
};
use std::io::{self, Write, stdout};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub struct View {
    scroll_offset: usize,
}

impl View {
    pub fn new() -> Self {
        Self { scroll_offset: 0 }
    }

    fn scroll_to_cursor(&mut self, cursor_line: usize, text_rows: usize) {
        if text_rows == 0 {
            return;
        }
        if cursor_line < self.scroll_offset {
            self.scroll_offset = cursor_line;
        } else if cursor_line >= self.scroll_offset + text_rows {
            self.scroll_offset = cursor_line + 1 - text_rows;
        }
    }

    pub fn render(
        &mut self,
        doc: &Document,
        mode: Mode,
        command_buffer: &str,
        status_message: &str,
    ) -> io::Result<()> {
        let (cols, rows) = size()?;
        let cols = cols as usize;
        let text_rows = rows.saturating_sub(1) as usize;
        self.scroll_to_cursor(doc.cursor_line, text_rows);

        let mut out = stdout();
        queue!(out, cursor::Hide)?;
        for row in 0..text_rows {
            queue!(out, cursor::MoveTo(0, row as u16), Clear(ClearType::CurrentLine))?;
            let idx = self.scroll_offset + row;
            match doc.get_line(idx) {
                Some(line) => queue!(out, Print(truncate_to_width(line, cols)))?,
                None => queue!(out, Print("~"))?,
            }
        }

        let status = status_line(doc, mode, command_buffer, status_message);
        queue!(
            out,
            cursor::MoveTo(0, rows.saturating_sub(1)),
            Clear(ClearType::CurrentLine),
            Print(truncate_to_width(&status, cols))
        )?;

        let cursor_row = doc.cursor_line.saturating_sub(self.scroll_offset);
        let cursor_x = doc.get_line(doc.cursor_line).map_or(0, |line| {
            let col = doc.cursor_column.min(line.len());
            line[..col].width()
        });
        queue!(
            out,
            cursor::MoveTo(
                cursor_x.min(cols.saturating_sub(1)) as u16,
                cursor_row as u16
            ),
            cursor::Show
        )?;
        out.flush()
    }
}

fn status_line(doc: &Document, mode: Mode, command_buffer: &str, status_message: &str) -> String {
    match mode {
        Mode::Command => format!(":{command_buffer}"),
        Mode::Insert => {
            if status_message.is_empty() {
                "-- INSERT --".to_string()
            } else {
                format!("-- INSERT -- {status_message}")
            }
        }
        Mode::Normal => {
            if status_message.is_empty() {
                let name = doc
                    .filename
                    .as_ref()
                    .map_or("[No Name]".to_string(), |p| p.display().to_string());
                format!(
                    "\"{}\" {}L  {},{}",
                    name,
                    doc.line_count(),
                    doc.cursor_line + 1,
                    doc.cursor_column + 1
                )
            } else {
                status_message.to_string()
            }
        }
    }
}

fn truncate_to_width(line: &str, max: usize) -> String {
    let mut used = 0;
    let mut result = String::new();
    for c in line.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max {
            break;
        }
        used += w;
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("hello", 3), "hel");
        assert_eq!(truncate_to_width("hello", 10), "hello");
        // wide chars count double
        assert_eq!(truncate_to_width("日本語", 4), "日本");
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let mut v = View::new();
        v.scroll_to_cursor(0, 10);
        assert_eq!(v.scroll_offset, 0);
        v.scroll_to_cursor(25, 10);
        assert_eq!(v.scroll_offset, 16);
        v.scroll_to_cursor(5, 10);
        assert_eq!(v.scroll_offset, 5);
    }

    #[test]
    fn test_status_line_shows_mode_and_message() {
        let doc = Document::new();
        assert_eq!(status_line(&doc, Mode::Command, "wq", ""), ":wq");
        assert_eq!(status_line(&doc, Mode::Insert, "", ""), "-- INSERT --");
        assert_eq!(
            status_line(&doc, Mode::Normal, "", "New footnote created"),
            "New footnote created"
        );
        assert_eq!(status_line(&doc, Mode::Normal, "", ""), "\"[No Name]\" 1L  1,1");
    }
}
