use crate::document::Document;
use crate::rc::RcConfig;
use crate::view::View;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use std::io::stdout;
use std::path::PathBuf;

pub enum Command {
    // Basic movement
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,

    // Word movement
    MoveWordForward,
    MoveWordBackward,

    // Line and document movement
    MoveLineStart,
    MoveLineEnd,
    MoveDocumentStart,
    MoveDocumentEnd,

    // Insert modes
    EnterInsertMode,
    EnterInsertModeAfter,
    EnterInsertModeLineEnd,
    OpenLineBelow,
    OpenLineAbove,

    // Edit commands
    DeleteCharForward,
    DeleteLine,

    // Footnote commands
    NewFootnote,
    OrganizeFootnotes,
    NextFootnote,
    PrevFootnote,

    EnterCommandMode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Normal,
    Insert,
    Command,
}

pub struct Controller {
    pub document: Document,
    pub view: View,
    pub mode: Mode,
    pub command_buffer: String,
    pub status_message: String,
    pub config: RcConfig,
    pending_key: Option<char>,
}

impl Controller {
    pub fn new(config: RcConfig) -> Self {
        Self {
            document: Document::new(),
            view: View::new(),
            mode: Mode::Normal,
            command_buffer: String::new(),
            status_message: String::new(),
            config,
            pending_key: None,
        }
    }

    pub fn new_with_file(filename: PathBuf, config: RcConfig) -> Result<Self, std::io::Error> {
        let mut controller = Self::new(config);
        controller.document = Document::from_file(filename)?;
        Ok(controller)
    }

    pub fn get_display_filename(&self) -> String {
        self.document
            .filename
            .as_ref()
            .map_or("[No Name]".to_string(), |p| p.display().to_string())
    }

    pub fn run(mut self) -> Result<(), std::io::Error> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen)?;

        let result = self.run_loop();

        disable_raw_mode()?;
        execute!(stdout(), LeaveAlternateScreen)?;
        result
    }

    fn run_loop(&mut self) -> Result<(), std::io::Error> {
        loop {
            self.view.render(
                &self.document,
                self.mode,
                &self.command_buffer,
                &self.status_message,
            )?;

            match event::read()? {
                Event::Key(key_event) => {
                    if self.handle_key_event(key_event) {
                        break;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) -> bool {
        match self.mode {
            Mode::Normal => self.handle_normal_key(key_event),
            Mode::Insert => {
                self.handle_insert_key(key_event);
                false
            }
            Mode::Command => self.handle_command_key(key_event),
        }
    }

    fn handle_normal_key(&mut self, key_event: KeyEvent) -> bool {
        // Two-key sequences (dd)
        if let Some(pending) = self.pending_key.take() {
            if pending == 'd' && key_event.code == KeyCode::Char('d') {
                self.execute_command(Command::DeleteLine);
            }
            return false;
        }

        let command = match key_event.code {
            KeyCode::Char(c) => self.map_normal_key(c),
            KeyCode::Up => Some(Command::MoveUp),
            KeyCode::Down => Some(Command::MoveDown),
            KeyCode::Left => Some(Command::MoveLeft),
            KeyCode::Right => Some(Command::MoveRight),
            KeyCode::Home => Some(Command::MoveLineStart),
            KeyCode::End => Some(Command::MoveLineEnd),
            KeyCode::Esc => {
                self.status_message.clear();
                None
            }
            _ => None,
        };

        if let Some(command) = command {
            self.execute_command(command);
        }
        false
    }

    /// The configurable footnote keys take precedence over the built-ins,
    /// so a user can rebind over any default motion they don't want.
    pub fn map_normal_key(&mut self, c: char) -> Option<Command> {
        if c == self.config.key_new_footnote {
            return Some(Command::NewFootnote);
        }
        if c == self.config.key_organize {
            return Some(Command::OrganizeFootnotes);
        }
        if c == self.config.key_next_footnote {
            return Some(Command::NextFootnote);
        }
        if c == self.config.key_prev_footnote {
            return Some(Command::PrevFootnote);
        }

        match c {
            'h' => Some(Command::MoveLeft),
            'j' => Some(Command::MoveDown),
            'k' => Some(Command::MoveUp),
            'l' => Some(Command::MoveRight),
            'w' => Some(Command::MoveWordForward),
            'b' => Some(Command::MoveWordBackward),
            '0' => Some(Command::MoveLineStart),
            '$' => Some(Command::MoveLineEnd),
            'g' => Some(Command::MoveDocumentStart),
            'G' => Some(Command::MoveDocumentEnd),
            'i' => Some(Command::EnterInsertMode),
            'a' => Some(Command::EnterInsertModeAfter),
            'A' => Some(Command::EnterInsertModeLineEnd),
            'o' => Some(Command::OpenLineBelow),
            'O' => Some(Command::OpenLineAbove),
            'x' => Some(Command::DeleteCharForward),
            'd' => {
                self.pending_key = Some('d');
                None
            }
            ':' => Some(Command::EnterCommandMode),
            _ => None,
        }
    }

    pub fn execute_command(&mut self, command: Command) {
        match command {
            Command::MoveUp => self.document.move_cursor_up(),
            Command::MoveDown => self.document.move_cursor_down(),
            Command::MoveLeft => self.document.move_cursor_left(),
            Command::MoveRight => self.document.move_cursor_right(),
            Command::MoveWordForward => self.document.move_word_forward(),
            Command::MoveWordBackward => self.document.move_word_backward(),
            Command::MoveLineStart => self.document.move_line_start(),
            Command::MoveLineEnd => self.document.move_line_end(),
            Command::MoveDocumentStart => self.document.move_document_start(),
            Command::MoveDocumentEnd => self.document.move_document_end(),
            Command::EnterInsertMode => {
                self.status_message.clear();
                self.mode = Mode::Insert;
            }
            Command::EnterInsertModeAfter => {
                self.document.move_cursor_right();
                self.status_message.clear();
                self.mode = Mode::Insert;
            }
            Command::EnterInsertModeLineEnd => {
                self.document.move_line_end();
                self.status_message.clear();
                self.mode = Mode::Insert;
            }
            Command::OpenLineBelow => {
                self.document.open_line_below();
                self.status_message.clear();
                self.mode = Mode::Insert;
            }
            Command::OpenLineAbove => {
                self.document.open_line_above();
                self.status_message.clear();
                self.mode = Mode::Insert;
            }
            Command::DeleteCharForward => self.document.delete_char_forward(),
            Command::DeleteLine => self.document.delete_line(),
            Command::NewFootnote => self.handle_footnote_command(),
            Command::OrganizeFootnotes => self.handle_organize_command(),
            Command::NextFootnote => self.handle_next_footnote(),
            Command::PrevFootnote => self.handle_prev_footnote(),
            Command::EnterCommandMode => {
                self.command_buffer.clear();
                self.mode = Mode::Command;
            }
        }
    }

    fn handle_insert_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.document.clamp_cursor_column();
            }
            KeyCode::Char(c) => self.document.insert_char(c),
            KeyCode::Enter => self.document.insert_newline(),
            KeyCode::Backspace => self.document.delete_char(),
            KeyCode::Tab => {
                for _ in 0..4 {
                    self.document.insert_char(' ');
                }
            }
            KeyCode::Up => self.document.move_cursor_up(),
            KeyCode::Down => self.document.move_cursor_down(),
            KeyCode::Left => self.document.move_cursor_left(),
            KeyCode::Right => self.document.move_cursor_right(),
            _ => {}
        }
    }

    fn handle_command_key(&mut self, key_event: KeyEvent) -> bool {
        match key_event.code {
            KeyCode::Char(c) => {
                self.command_buffer.push(c);
                false
            }
            KeyCode::Backspace => {
                if self.command_buffer.pop().is_none() {
                    self.mode = Mode::Normal;
                }
                false
            }
            KeyCode::Enter => {
                let cmd = std::mem::take(&mut self.command_buffer);
                self.mode = Mode::Normal;
                self.execute_command_line(&cmd)
            }
            KeyCode::Esc => {
                self.command_buffer.clear();
                self.mode = Mode::Normal;
                false
            }
            _ => false,
        }
    }

    /// Execute an ex-style command line. Returns true when the editor
    /// should quit.
    pub fn execute_command_line(&mut self, cmd: &str) -> bool {
        let cmd = cmd.trim();
        match cmd {
            "" => false,
            "w" => self.handle_save_command(),
            "q" => self.handle_quit_command(),
            "q!" => true,
            "wq" | "x" => self.handle_save_and_quit_command(),
            "fn" => {
                self.handle_footnote_command();
                false
            }
            "fnorg" | "organize" => {
                self.handle_organize_command();
                false
            }
            "fnall" => {
                self.handle_auto_reference_all();
                false
            }
            "fnnext" => {
                self.handle_next_footnote();
                false
            }
            "fnprev" => {
                self.handle_prev_footnote();
                false
            }
            _ => {
                if let Some(name) = cmd.strip_prefix("w ") {
                    self.handle_save_as_command(name.trim())
                } else {
                    self.status_message = format!("Not an editor command: {cmd}");
                    false
                }
            }
        }
    }
}
