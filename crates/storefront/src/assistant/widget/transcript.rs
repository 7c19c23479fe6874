//! Conversation transcript shown in the widget.

use autoservice_core::{Language, TextDirection};

/// Who wrote an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// Bot entries are either real messages or the pending-answer placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Message,
    Thinking,
}

/// Transcript entry identifier, unique within one transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

/// One line of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub role: Role,
    pub kind: EntryKind,
    pub text: String,
    /// Language active when the entry was added; picks the text direction.
    pub language: Language,
}

impl Entry {
    /// Direction the entry is laid out in. User text is always left to right.
    #[must_use]
    pub const fn direction(&self) -> TextDirection {
        match self.role {
            Role::User => TextDirection::Ltr,
            Role::Bot => self.language.direction(),
        }
    }

    /// HTML fragment for this entry.
    #[must_use]
    pub fn to_html(&self) -> String {
        match self.role {
            Role::User => format!(
                r#"<div class="message user">{}</div>"#,
                escape_html(&self.text)
            ),
            Role::Bot => render_bot_html(&self.text, self.language),
        }
    }
}

/// Escape text for insertion into HTML.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// HTML fragment for a bot message: escaped, newlines as `<br>`, laid out
/// right to left for Arabic.
#[must_use]
pub fn render_bot_html(text: &str, lang: Language) -> String {
    format!(
        r#"<div class="message bot" dir="{}">{}</div>"#,
        lang.direction().as_str(),
        escape_html(text).replace('\n', "<br>")
    )
}

/// Ordered conversation entries.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }

    fn push(&mut self, role: Role, kind: EntryKind, text: &str, language: Language) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            role,
            kind,
            text: text.to_owned(),
            language,
        });
        id
    }

    pub fn push_user(&mut self, text: &str, language: Language) -> EntryId {
        self.push(Role::User, EntryKind::Message, text, language)
    }

    pub fn push_bot(&mut self, text: &str, language: Language) -> EntryId {
        self.push(Role::Bot, EntryKind::Message, text, language)
    }

    pub fn push_thinking(&mut self, text: &str, language: Language) -> EntryId {
        self.push(Role::Bot, EntryKind::Thinking, text, language)
    }

    /// Remove the most recent bot entry if it is a thinking placeholder.
    ///
    /// Returns whether anything was removed. Older placeholders are left
    /// alone.
    pub fn remove_trailing_thinking(&mut self) -> bool {
        let Some(index) = self.entries.iter().rposition(|e| e.role == Role::Bot) else {
            return false;
        };
        if self.entries.get(index).is_some_and(|e| e.kind == EntryKind::Thinking) {
            self.entries.remove(index);
            return true;
        }
        false
    }

    /// Whole transcript as HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.entries.iter().map(Entry::to_html).collect()
    }
}
