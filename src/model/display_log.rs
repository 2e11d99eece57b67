/// Ordered, append-only log of status messages shown in a pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayLog {
    entries: Vec<String>,
}

impl DisplayLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: impl Into<String>) {
        self.entries.push(message.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Text form of the log: every entry starts on a fresh line.
    pub fn render_text(&self) -> String {
        self.entries
            .iter()
            .fold(String::new(), |mut text, entry| {
                text.push('\n');
                text.push_str(entry);
                text
            })
    }
}
