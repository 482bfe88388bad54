use crate::controller::Controller;
use crate::organize;
use std::path::PathBuf;

impl Controller {
    pub fn handle_save_command(&mut self) -> bool {
        self.organize_before_save();
        match self.document.save() {
            Ok(bytes) => {
                let filename = self.get_display_filename();
                self.status_message = format!("\"{filename}\" {bytes}B written");
            }
            Err(_) => {
                self.status_message = "Error: Could not save file".to_string();
            }
        }
        false
    }

    pub fn handle_save_as_command(&mut self, filename: &str) -> bool {
        if filename.is_empty() {
            return false;
        }
        self.organize_before_save();
        match self.document.save_as(PathBuf::from(filename)) {
            Ok(bytes) => {
                self.status_message = format!("\"{filename}\" {bytes}B written");
            }
            Err(_) => {
                self.status_message = "Error: Could not save file".to_string();
            }
        }
        false
    }

    pub fn handle_save_and_quit_command(&mut self) -> bool {
        self.organize_before_save();
        match self.document.save() {
            Ok(_) => true,
            Err(_) => {
                self.status_message = "Error: Could not save file".to_string();
                false
            }
        }
    }

    pub fn handle_quit_command(&mut self) -> bool {
        if self.document.modified {
            self.status_message = "No write since last change (add ! to override)".to_string();
            false
        } else {
            true
        }
    }

    fn organize_before_save(&mut self) {
        if self.config.organize_on_save {
            organize::organize(&mut self.document);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, LineEnding};
    use crate::rc::RcConfig;

    #[test]
    fn test_save_runs_organize_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.txt");

        let mut config = RcConfig::default();
        config.organize_on_save = true;
        let mut c = Controller::new(config);
        c.document = Document::from_lines(vec![
            "word[^5] gone[^9]".to_string(),
            "".to_string(),
            "[^5]: note".to_string(),
        ]);
        c.document.line_ending = LineEnding::Unix;
        c.document.filename = Some(path.clone());
        c.document.modified = true;

        assert!(!c.handle_save_command());
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "word[^1] gone\n\n[^1]: note");
        assert!(c.status_message.contains("written"));
    }

    #[test]
    fn test_save_without_hook_writes_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.txt");

        let mut c = Controller::new(RcConfig::default());
        c.document = Document::from_lines(vec!["word[^5]".to_string()]);
        c.document.filename = Some(path.clone());

        c.handle_save_command();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "word[^5]");
    }

    #[test]
    fn test_save_without_filename_reports_error() {
        let mut c = Controller::new(RcConfig::default());
        c.handle_save_command();
        assert_eq!(c.status_message, "Error: Could not save file");
    }

    #[test]
    fn test_save_and_quit_requests_exit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.txt");

        let mut c = Controller::new(RcConfig::default());
        c.document.filename = Some(path);
        assert!(c.handle_save_and_quit_command());
    }
}
