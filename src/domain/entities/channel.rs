/// Kind of a guild channel, as far as the bot cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Text,
    Other,
}

/// A newly created channel
#[derive(Debug, Clone)]
pub struct Channel {
    pub id: u64,
    pub name: String,
    pub kind: ChannelKind,
    /// Category the channel was created under
    pub parent_id: Option<u64>,
}

impl Channel {
    pub fn text(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: ChannelKind::Text,
            parent_id: None,
        }
    }

    pub fn with_kind(mut self, kind: ChannelKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn under(mut self, category_id: u64) -> Self {
        self.parent_id = Some(category_id);
        self
    }

    /// True for a text channel created under the given category
    pub fn is_text_in_category(&self, category_id: u64) -> bool {
        self.kind == ChannelKind::Text && self.parent_id == Some(category_id)
    }
}
