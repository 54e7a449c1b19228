//! The blocking user notification channel.
//!
//! Export and session failures that the user can act on are reported here in
//! plain language; the `log` facade carries the diagnostic detail.

use std::io::{BufRead, Write};
use std::sync::Arc;

pub trait UserPrompt {
    /// Shows a message and returns once the user has seen it.
    fn notify(&self, message: &str);

    /// Asks a yes/no question.
    fn confirm(&self, message: &str) -> bool;
}

impl<P: UserPrompt + ?Sized> UserPrompt for Arc<P> {
    fn notify(&self, message: &str) {
        (**self).notify(message)
    }

    fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message)
    }
}

/// Answers every confirmation with a fixed value and logs notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoPrompt {
    pub assume_yes: bool,
}

impl AutoPrompt {
    pub fn yes() -> Self {
        Self { assume_yes: true }
    }
}

impl UserPrompt for AutoPrompt {
    fn notify(&self, message: &str) {
        log::warn!("{}", message);
    }

    fn confirm(&self, message: &str) -> bool {
        log::info!("{} -> {}", message, if self.assume_yes { "yes" } else { "no" });
        self.assume_yes
    }
}

/// Prompts on stderr and reads answers from stdin.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl UserPrompt for TerminalPrompt {
    fn notify(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn confirm(&self, message: &str) -> bool {
        eprint!("{} [y/N] ", message);
        let _ = std::io::stderr().flush();
        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                log::warn!("Could not read an answer: {}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
