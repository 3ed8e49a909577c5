use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::card::CardRequest;
use crate::utils::trim_line;

pub const DELIMITER: char = '|';

/// Splits one line on its first delimiter. Returns `Ok(None)` for blank lines.
pub fn parse_card_line(line: &str) -> Result<Option<CardRequest>> {
    if trim_line(line).is_none() {
        return Ok(None);
    }

    let Some((phrase, example)) = line.split_once(DELIMITER) else {
        bail!("Expected `<phrase>{DELIMITER}<example>`, found: {line}");
    };

    if trim_line(phrase).is_none() {
        bail!("Missing phrase before `{DELIMITER}`: {line}");
    }
    if trim_line(example).is_none() {
        bail!("Missing example after `{DELIMITER}`: {line}");
    }

    Ok(Some(CardRequest::new(phrase, example)))
}

/// Parses a whole word list. Any malformed line fails the entire document.
pub fn parse_card_requests(contents: &str) -> Result<Vec<CardRequest>> {
    let mut requests = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        let request = parse_card_line(line).with_context(|| format!("Invalid line {}", idx + 1))?;
        if let Some(request) = request {
            requests.push(request);
        }
    }

    Ok(requests)
}

pub fn read_card_requests(path: &Path) -> Result<Vec<CardRequest>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read word list at {}", path.display()))?;
    parse_card_requests(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}
