// ABOUTME: Configuration and constants for the Monkey interpreter
// Version info, REPL prompt and greeting text live here, not inline in main

pub const VERSION: &str = "1.0.0";

pub const PROMPT: &str = ">> ";
pub const HISTORY_FILE: &str = ".monkey_history";

pub const WELCOME_FOOTER: &str = "Feel free to type in commands";

pub fn greeting(user: &str) -> String {
    format!("Hello {}! This is the Monkey programming language!", user)
}
