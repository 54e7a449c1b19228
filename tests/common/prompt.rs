use cardpress::UserPrompt;
use std::sync::Mutex;

/// Records notifications and replays scripted confirmation answers.
#[derive(Debug, Default)]
pub struct RecordingPrompt {
    notifications: Mutex<Vec<String>>,
    questions: Mutex<Vec<String>>,
    answer: bool,
}

impl RecordingPrompt {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            ..Self::default()
        }
    }

    pub fn notifications(&self) -> Vec<String> {
        self.notifications.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

impl UserPrompt for RecordingPrompt {
    fn notify(&self, message: &str) {
        if let Ok(mut n) = self.notifications.lock() {
            n.push(message.to_string());
        }
    }

    fn confirm(&self, message: &str) -> bool {
        if let Ok(mut q) = self.questions.lock() {
            q.push(message.to_string());
        }
        self.answer
    }
}
