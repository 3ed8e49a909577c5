use std::path::PathBuf;

use anyhow::{Result, anyhow};
use directories::ProjectDirs;

pub fn trim_line(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

pub fn strip_controls_and_escapes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            // ANSI escape sequence (ESC … letter)
            '\x1b' => {
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next.is_ascii_alphabetic() {
                        break;
                    }
                }
            }

            c if c.is_control() => {}

            c => out.push(c),
        }
    }

    out.trim().to_string()
}

pub fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "cardfather")
        .ok_or_else(|| anyhow!("Could not determine project directory"))?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_controls_and_escapes() {
        let input = "\x1b[1mHello\x1b[0m";
        let expected = "Hello";
        assert_eq!(strip_controls_and_escapes(input), expected);
    }

    #[test]
    fn strip_drops_pasted_newlines() {
        assert_eq!(strip_controls_and_escapes("  sk-abc\r\n"), "sk-abc");
    }

    #[test]
    fn test_trim_line() {
        assert_eq!(trim_line("  run  "), Some("run"));
        assert_eq!(trim_line(" \t "), None);
        assert_eq!(trim_line(""), None);
    }
}
