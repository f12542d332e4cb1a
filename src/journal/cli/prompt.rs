use colored::Colorize;
use scripture_journal::view::Prompt;
use std::io::{self, BufRead, Write};

/// Confirms on stdin and prints notices to stdout. Only an exact `Y` confirms.
pub struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompt for TerminalPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        println!("{}", message);
        print!("[Y] To confirm: ");
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut input = String::new();
        match io::stdin().lock().read_line(&mut input) {
            Ok(_) => input.trim() == "Y",
            Err(err) => {
                tracing::warn!(error = %err, "could not read confirmation");
                false
            }
        }
    }

    fn notify(&mut self, message: &str) {
        println!("{}", message.yellow());
    }
}
