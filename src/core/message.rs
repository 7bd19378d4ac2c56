#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptRole {
    System,
    User,
    Assistant,
}

impl TranscriptRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptRole::System => "system",
            TranscriptRole::User => "user",
            TranscriptRole::Assistant => "assistant",
        }
    }

    pub fn is_user(self) -> bool {
        self == TranscriptRole::User
    }

    pub fn is_assistant(self) -> bool {
        self == TranscriptRole::Assistant
    }
}

impl AsRef<str> for TranscriptRole {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// One transcript entry. Role and content are fixed at creation; for
/// assistant entries produced in image mode, `content` holds the provider's
/// revised prompt description (possibly empty) and `image_url` the generated
/// image reference, never pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: TranscriptRole,
    pub content: String,
    pub image_url: Option<String>,
}

impl Message {
    pub fn new(role: TranscriptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            image_url: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::Assistant, content)
    }

    pub fn assistant_image(content: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: TranscriptRole::Assistant,
            content: content.into(),
            image_url: Some(image_url.into()),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_assistant(&self) -> bool {
        self.role.is_assistant()
    }
}

/// Append-only conversation log. The first entry is always the system
/// prompt and is never removed; no entry is mutated or deleted once
/// appended; corrections arrive as new entries. A failed turn leaves its
/// user entry unanswered, which readers must tolerate.
#[derive(Debug)]
pub struct Transcript {
    entries: Vec<Message>,
}

impl Transcript {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            entries: vec![Message::system(system_prompt)],
        }
    }

    pub fn append(&mut self, entry: Message) {
        self.entries.push(entry);
    }

    /// Full ordered sequence, read-only snapshot semantics.
    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }
}
