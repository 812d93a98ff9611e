//! Line input helpers shared by the commands.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::History;
use rustyline::{Editor, Helper};

/// Reads one trimmed line; `None` on Ctrl-C / Ctrl-D.
pub fn read_line<H: Helper, I: History>(
    editor: &mut Editor<H, I>,
    prompt: &str,
) -> Result<Option<String>> {
    match editor.readline(prompt) {
        Ok(line) => {
            let line = line.trim().to_string();
            if !line.is_empty() {
                let _ = editor.add_history_entry(&line);
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Reads until a non-empty line is entered; `None` on Ctrl-C / Ctrl-D.
pub fn read_required<H: Helper, I: History>(
    editor: &mut Editor<H, I>,
    prompt: &str,
) -> Result<Option<String>> {
    loop {
        match read_line(editor, prompt)? {
            Some(line) if line.is_empty() => continue,
            other => return Ok(other),
        }
    }
}

/// Parses a 1-based option selection.
pub fn parse_selection(input: &str, option_count: usize) -> Option<usize> {
    let index: usize = input.trim().parse().ok()?;
    if (1..=option_count).contains(&index) {
        Some(index - 1)
    } else {
        None
    }
}

/// Parses a comma-separated list of 1-based selections, deduplicated and in
/// the order given.
pub fn parse_multi_selection(input: &str, option_count: usize) -> Option<Vec<usize>> {
    let mut indices = Vec::new();
    for part in input.split(',') {
        let index = parse_selection(part, option_count)?;
        if !indices.contains(&index) {
            indices.push(index);
        }
    }
    if indices.is_empty() { None } else { Some(indices) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection_bounds() {
        assert_eq!(parse_selection("1", 3), Some(0));
        assert_eq!(parse_selection(" 3 ", 3), Some(2));
        assert_eq!(parse_selection("0", 3), None);
        assert_eq!(parse_selection("4", 3), None);
        assert_eq!(parse_selection("abc", 3), None);
    }

    #[test]
    fn test_parse_multi_selection() {
        assert_eq!(parse_multi_selection("1,3", 4), Some(vec![0, 2]));
        assert_eq!(parse_multi_selection("2, 2, 1", 4), Some(vec![1, 0]));
        assert_eq!(parse_multi_selection("1,5", 4), None);
        assert_eq!(parse_multi_selection("", 4), None);
    }
}
