//! Rustyline helper for the chat REPL: completion, hints and highlighting
//! for slash commands.

use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

/// The slash commands available inside a chat, with their help lines.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/help", "List the available commands"),
    ("/sessions", "List your sessions"),
    ("/rename", "Rename the current session: /rename <title>"),
    ("/intake", "Show the intake stored for this session"),
    ("/quit", "Leave the chat"),
];

/// The editor used by the chat REPL.
pub type ChatEditor = Editor<ChatHelper, DefaultHistory>;

/// Creates a line editor with slash-command completion enabled.
pub fn chat_editor() -> rustyline::Result<ChatEditor> {
    let mut editor = ChatEditor::new()?;
    editor.set_helper(Some(ChatHelper::new()));
    Ok(editor)
}

#[derive(Clone)]
pub struct ChatHelper {
    commands: Vec<String>,
}

impl ChatHelper {
    pub fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|(cmd, _)| cmd.to_string()).collect(),
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ChatHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_candidates_filter_by_prefix() {
        let helper = ChatHelper::new();
        let matches: Vec<_> = helper
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with("/s"))
            .collect();
        assert_eq!(matches, vec!["/sessions"]);
    }

    #[test]
    fn test_every_command_has_a_help_line() {
        for (cmd, help) in COMMANDS {
            assert!(cmd.starts_with('/'));
            assert!(!help.is_empty());
        }
    }
}
