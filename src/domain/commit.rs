/// Raw commit message: subject line plus optional body and footers.
///
/// No normalization is applied; classification compares case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitMessage(String);

impl CommitMessage {
    pub fn new(text: impl Into<String>) -> Self {
        CommitMessage(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First line of the message, without its line terminator
    pub fn subject(&self) -> &str {
        self.0.lines().next().unwrap_or("")
    }

    /// Returns the first automation marker (e.g. `[skip ci]`) found anywhere in the message.
    pub fn find_skip_marker<'a>(&self, markers: &'a [String]) -> Option<&'a str> {
        let lowered = self.0.to_lowercase();
        markers
            .iter()
            .filter(|m| !m.trim().is_empty())
            .find(|m| lowered.contains(&m.to_lowercase()))
            .map(String::as_str)
    }
}

impl From<&str> for CommitMessage {
    fn from(text: &str) -> Self {
        CommitMessage::new(text)
    }
}

impl From<String> for CommitMessage {
    fn from(text: String) -> Self {
        CommitMessage(text)
    }
}

impl AsRef<str> for CommitMessage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
