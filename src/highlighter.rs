// ABOUTME: Syntax highlighter for the REPL with color support
// Implements rustyline's Highlighter trait to provide ANSI color codes
// for Monkey syntax elements while preserving display width

use rustyline::completion::Completer;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Helper;
use std::borrow::Cow;

// ANSI color codes (3-bit/4-bit colors for maximum terminal compatibility)
const COLOR_RESET: &str = "\x1b[0m";
const COLOR_KEYWORD: &str = "\x1b[1;35m"; // Bold magenta
const COLOR_BUILTIN: &str = "\x1b[36m"; // Cyan
const COLOR_NUMBER: &str = "\x1b[33m"; // Yellow
const COLOR_STRING: &str = "\x1b[32m"; // Green
const COLOR_COMMENT: &str = "\x1b[90m"; // Bright black (gray)

const KEYWORDS: [&str; 8] = ["fn", "let", "true", "false", "if", "else", "return", "macro"];
const BUILTINS: [&str; 10] = [
    "len", "first", "last", "rest", "push", "puts", "print", "println", "quote", "unquote",
];

/// Main helper for the Monkey REPL. Provides syntax-aware color highlighting
/// of the line being edited.
pub struct MonkeyHelper;

impl MonkeyHelper {
    pub fn new() -> Self {
        MonkeyHelper
    }
}

impl Default for MonkeyHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Helper for MonkeyHelper {}

impl Completer for MonkeyHelper {
    type Candidate = String;
}

impl Hinter for MonkeyHelper {
    type Hint = String;
}

impl Validator for MonkeyHelper {}

impl Highlighter for MonkeyHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let highlighted = highlight_line(line);
        if highlighted == line {
            Cow::Borrowed(line)
        } else {
            Cow::Owned(highlighted)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

/// Scans the line with the same rules as the lexer (comments to end of line,
/// strings without escapes, digit/dot number runs, letter/underscore words)
/// and wraps each region in its color.
fn highlight_line(line: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            // Comments: everything from # to end of line
            '#' => {
                result.push_str(COLOR_COMMENT);
                while i < chars.len() {
                    result.push(chars[i]);
                    i += 1;
                }
                result.push_str(COLOR_RESET);
            }

            // Strings: no escape sequences, an unclosed string runs to EOL
            '"' => {
                result.push_str(COLOR_STRING);
                result.push('"');
                i += 1;
                while i < chars.len() {
                    let ch = chars[i];
                    result.push(ch);
                    i += 1;
                    if ch == '"' {
                        break;
                    }
                }
                result.push_str(COLOR_RESET);
            }

            // Numbers: digit and dot runs, exactly as the lexer consumes them
            '0'..='9' => {
                result.push_str(COLOR_NUMBER);
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    result.push(chars[i]);
                    i += 1;
                }
                result.push_str(COLOR_RESET);
            }

            // Identifier or keyword
            ch if ch.is_ascii_alphabetic() || ch == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphabetic() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if KEYWORDS.contains(&word.as_str()) {
                    result.push_str(COLOR_KEYWORD);
                    result.push_str(&word);
                    result.push_str(COLOR_RESET);
                } else if BUILTINS.contains(&word.as_str()) {
                    result.push_str(COLOR_BUILTIN);
                    result.push_str(&word);
                    result.push_str(COLOR_RESET);
                } else {
                    result.push_str(&word);
                }
            }

            ch => {
                result.push(ch);
                i += 1;
            }
        }
    }

    result
}
