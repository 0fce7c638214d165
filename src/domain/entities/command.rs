use std::collections::HashMap;

use crate::application::errors::CommandError;
use crate::application::services::Services;
use crate::domain::entities::Interaction;

/// Where a command is invoked from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Slash command, registered globally with the platform
    Slash,
    /// Button handler keyed by custom id; never registered
    Component,
}

/// Requirement evaluated before a command handler runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Invoker must be one of the configured bot owners
    OwnerOnly,
    /// Interaction must come from a guild, not a DM
    GuildOnly,
}

impl Precondition {
    /// User-facing reason shown when the precondition is not met
    pub fn reason(&self) -> &'static str {
        match self {
            Precondition::OwnerOnly => "Command can only be run by the owner of the bot.",
            Precondition::GuildOnly => "Command must be used in a guild channel.",
        }
    }
}

/// String option declared by a slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// Payload sent to the platform when registering a slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
    pub options: Vec<OptionSpec>,
}

/// Text produced by a command handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    /// Only visible to the invoker
    pub ephemeral: bool,
}

impl Reply {
    pub fn public(content: impl Into<String>) -> Self {
        Self { content: content.into(), ephemeral: false }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self { content: content.into(), ephemeral: true }
    }
}

/// Command handler function type
pub type CommandHandler = Box<dyn Fn(&Interaction, &Services) -> Result<Reply, CommandError> + Send + Sync>;

/// Represents a bot command or button handler
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub kind: CommandKind,
    pub options: Vec<OptionSpec>,
    pub preconditions: Vec<Precondition>,
    pub handler: Option<CommandHandler>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind: CommandKind::Slash,
            options: Vec::new(),
            preconditions: Vec::new(),
            handler: None,
        }
    }

    /// Handler for a button with the given custom id
    pub fn component(custom_id: impl Into<String>) -> Self {
        let mut cmd = Self::new(custom_id);
        cmd.kind = CommandKind::Component;
        cmd
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.options.push(OptionSpec {
            name: name.into(),
            description: description.into(),
            required,
        });
        self
    }

    pub fn with_precondition(mut self, precondition: Precondition) -> Self {
        self.preconditions.push(precondition);
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Interaction, &Services) -> Result<Reply, CommandError> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Registry key: slash command names are case-insensitive, custom ids are not
    pub fn key(&self) -> String {
        match self.kind {
            CommandKind::Slash => self.name.to_lowercase(),
            CommandKind::Component => self.name.clone(),
        }
    }

    /// Registration payload, `None` for component handlers
    pub fn definition(&self) -> Option<CommandDefinition> {
        if self.kind != CommandKind::Slash {
            return None;
        }
        Some(CommandDefinition {
            name: self.name.to_lowercase(),
            description: self.description.clone().unwrap_or_else(|| self.name.clone()),
            options: self.options.clone(),
        })
    }
}

/// Command registry, filled by explicit `register` calls at startup
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
    components: HashMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) {
        let table = match command.kind {
            CommandKind::Slash => &mut self.commands,
            CommandKind::Component => &mut self.components,
        };
        let key = command.key();
        if table.insert(key.clone(), command).is_some() {
            tracing::warn!("Replaced already registered handler: {}", key);
        }
    }

    /// Find a slash command, ignoring case
    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.get(&input.to_lowercase())
    }

    /// Find a button handler by exact custom id
    pub fn find_component(&self, custom_id: &str) -> Option<&Command> {
        self.components.get(custom_id)
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.values().chain(self.components.values())
    }

    pub fn len(&self) -> usize {
        self.commands.len() + self.components.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_ignores_case_for_slash_commands() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::new("ping"));
        registry.register(Command::component("1"));

        assert!(registry.find("PING").is_some());
        assert!(registry.find("1").is_none());
        assert!(registry.find_component("1").is_some());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_replaces_names_differing_in_case() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::new("Ping").with_description("first"));
        registry.register(Command::new("ping").with_description("second"));
        registry.register(Command::component("a"));
        registry.register(Command::component("A"));

        assert_eq!(registry.len(), 3);
        let defs: Vec<CommandDefinition> = registry.all().filter_map(Command::definition).collect();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "ping");
        assert_eq!(defs[0].description, "second");
        assert!(registry.find("PING").is_some());
    }

    #[test]
    fn test_component_has_no_definition() {
        assert!(Command::component("1").definition().is_none());

        let def = Command::new("Say")
            .with_description("Repeat text")
            .with_option("text", "What to say", true)
            .definition()
            .unwrap();
        assert_eq!(def.name, "say");
        assert_eq!(def.options.len(), 1);
        assert!(def.options[0].required);
    }
}
