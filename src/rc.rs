use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Process-wide configuration, merged once at startup and read-only after.
#[derive(Debug, Clone, PartialEq)]
pub struct RcConfig {
    pub organize_on_save: bool,
    pub organize_on_new: bool,
    pub debug_print: bool,
    pub key_new_footnote: char,
    pub key_organize: char,
    pub key_next_footnote: char,
    pub key_prev_footnote: char,
}

impl Default for RcConfig {
    fn default() -> Self {
        Self {
            organize_on_save: false,
            organize_on_new: true,
            debug_print: false,
            key_new_footnote: 'f',
            key_organize: 'F',
            key_next_footnote: ']',
            key_prev_footnote: '[',
        }
    }
}

pub struct RcLoader;

impl RcLoader {
    /// Get the path to the RC file
    /// Looks for .vinoterc in:
    /// 1. Current directory
    /// 2. Home directory (~/.vinoterc)
    pub fn get_rc_path() -> Option<PathBuf> {
        let current_rc = Path::new(".vinoterc");
        if current_rc.exists() {
            return Some(current_rc.to_path_buf());
        }

        if let Ok(home) = env::var("HOME") {
            let home_rc = Path::new(&home).join(".vinoterc");
            if home_rc.exists() {
                return Some(home_rc);
            }
        }

        None
    }

    /// Load and parse the RC file
    pub fn load_config() -> RcConfig {
        let mut config = RcConfig::default();

        if let Some(rc_path) = Self::get_rc_path() {
            match fs::read_to_string(&rc_path) {
                Ok(content) => {
                    Self::parse_config_content(&content, &mut config);
                }
                Err(_) => {
                    // Silently fail if we can't read the file
                }
            }
        }

        config
    }

    pub fn parse_config_content(content: &str, config: &mut RcConfig) {
        for line in content.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') || line.starts_with('"') {
                continue;
            }

            Self::parse_config_line(line, config);
        }
    }

    fn parse_config_line(line: &str, config: &mut RcConfig) {
        // Remove inline comments
        let line = if let Some(pos) = line.find('#') {
            &line[..pos]
        } else {
            line
        }
        .trim();

        // Handle "set" commands (vim-style)
        if let Some(stripped) = line.strip_prefix("set ") {
            match stripped.trim() {
                "organize_on_save" => config.organize_on_save = true,
                "noorganize_on_save" => config.organize_on_save = false,
                "organize_on_new" => config.organize_on_new = true,
                "noorganize_on_new" => config.organize_on_new = false,
                "debug" | "debug_print" => config.debug_print = true,
                "nodebug" | "nodebug_print" => config.debug_print = false,
                _ => {} // Unknown setting, ignore
            }
        }
        // Handle direct key-value pairs
        else if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim();

            match key {
                "organize_on_save" => config.organize_on_save = Self::parse_bool(value),
                "organize_on_new" => config.organize_on_new = Self::parse_bool(value),
                "debug" | "debug_print" => config.debug_print = Self::parse_bool(value),
                "key_new_footnote" => Self::parse_key(value, &mut config.key_new_footnote),
                "key_organize" => Self::parse_key(value, &mut config.key_organize),
                "key_next_footnote" => Self::parse_key(value, &mut config.key_next_footnote),
                "key_prev_footnote" => Self::parse_key(value, &mut config.key_prev_footnote),
                _ => {} // Unknown setting, ignore
            }
        }
    }

    fn parse_bool(value: &str) -> bool {
        value == "true" || value == "1" || value == "yes"
    }

    fn parse_key(value: &str, slot: &mut char) {
        let mut chars = value.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            *slot = c;
        }
        // Anything longer than a single char is ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RcConfig::default();
        assert!(!config.organize_on_save);
        assert!(config.organize_on_new);
        assert_eq!(config.key_new_footnote, 'f');
        assert_eq!(config.key_next_footnote, ']');
    }

    #[test]
    fn test_set_style_lines() {
        let mut config = RcConfig::default();
        RcLoader::parse_config_content(
            "set organize_on_save\nset noorganize_on_new\nset debug",
            &mut config,
        );
        assert!(config.organize_on_save);
        assert!(!config.organize_on_new);
        assert!(config.debug_print);
    }

    #[test]
    fn test_key_value_lines() {
        let mut config = RcConfig::default();
        RcLoader::parse_config_content(
            "organize_on_save = yes\nkey_new_footnote = n\nkey_organize=O",
            &mut config,
        );
        assert!(config.organize_on_save);
        assert_eq!(config.key_new_footnote, 'n');
        assert_eq!(config.key_organize, 'O');
    }

    #[test]
    fn test_malformed_lines_are_ignored() {
        let mut config = RcConfig::default();
        RcLoader::parse_config_content(
            "# a comment\n\" vim-style comment\n\nset unknown_flag\nkey_new_footnote = toolong\nnonsense line",
            &mut config,
        );
        assert_eq!(config, RcConfig::default());
    }

    #[test]
    fn test_inline_comments_are_stripped() {
        let mut config = RcConfig::default();
        RcLoader::parse_config_content("set organize_on_save # tidy on :w", &mut config);
        assert!(config.organize_on_save);
    }
}
