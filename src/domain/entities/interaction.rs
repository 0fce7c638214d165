use std::sync::atomic::{AtomicBool, Ordering};

use super::User;

/// Type of an inbound interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionType {
    /// Slash command invocation
    ApplicationCommand,
    /// Button press on a message component
    MessageComponent,
    /// Autocomplete, modal submit, ping, ...
    Other,
}

impl InteractionType {
    pub fn as_str(&self) -> &str {
        match self {
            InteractionType::ApplicationCommand => "application_command",
            InteractionType::MessageComponent => "message_component",
            InteractionType::Other => "other",
        }
    }
}

/// A string option supplied with a slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOption {
    pub name: String,
    pub value: String,
}

/// A single user-triggered event, valid only while it is being handled
#[derive(Debug)]
pub struct Interaction {
    pub id: u64,
    pub token: String,
    pub kind: InteractionType,
    pub user: User,
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    /// Command name for application commands, custom id for components
    pub name: String,
    pub options: Vec<CommandOption>,
    responded: AtomicBool,
}

impl Interaction {
    pub fn new(id: u64, kind: InteractionType, name: impl Into<String>) -> Self {
        Self {
            id,
            token: String::new(),
            kind,
            user: User::new(0),
            guild_id: None,
            channel_id: 0,
            name: name.into(),
            options: Vec::new(),
            responded: AtomicBool::new(false),
        }
    }

    pub fn command(id: u64, name: impl Into<String>) -> Self {
        Self::new(id, InteractionType::ApplicationCommand, name)
    }

    pub fn component(id: u64, custom_id: impl Into<String>) -> Self {
        Self::new(id, InteractionType::MessageComponent, custom_id)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = user;
        self
    }

    pub fn in_guild(mut self, guild_id: Option<u64>) -> Self {
        self.guild_id = guild_id;
        self
    }

    pub fn in_channel(mut self, channel_id: u64) -> Self {
        self.channel_id = channel_id;
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(CommandOption {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Mark as already acknowledged, e.g. after a deferred response
    #[cfg(test)]
    pub fn already_responded(self) -> Self {
        self.responded.store(true, Ordering::SeqCst);
        self
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.value.as_str())
    }

    pub fn is_application_command(&self) -> bool {
        self.kind == InteractionType::ApplicationCommand
    }

    pub fn has_responded(&self) -> bool {
        self.responded.load(Ordering::SeqCst)
    }

    pub fn mark_responded(&self) {
        self.responded.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_responded_flag() {
        let interaction = Interaction::command(1, "ping");
        assert!(!interaction.has_responded());
        interaction.mark_responded();
        assert!(interaction.has_responded());

        let deferred = Interaction::command(2, "ping").already_responded();
        assert!(deferred.has_responded());
    }

    #[test]
    fn test_option_lookup() {
        let interaction = Interaction::command(1, "say").with_option("text", "hello");
        assert_eq!(interaction.option("text"), Some("hello"));
        assert_eq!(interaction.option("missing"), None);
        assert!(interaction.is_application_command());
        assert!(!Interaction::component(2, "1").is_application_command());
    }
}
