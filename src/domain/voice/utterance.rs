//! Pending-utterance buffer fed by final recognition fragments.

/// Accumulates final fragments until the silence deadline flushes them as
/// one client turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingUtterance {
    text: String,
}

impl PendingUtterance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a final fragment, separated by a single space.
    pub fn push_final(&mut self, fragment: &str) {
        self.text.push(' ');
        self.text.push_str(fragment);
    }

    /// Whether flushing now would produce a turn.
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Takes the trimmed text and clears the buffer.
    ///
    /// Returns `None` when only whitespace has accumulated.
    pub fn take(&mut self) -> Option<String> {
        let text = std::mem::take(&mut self.text);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}
