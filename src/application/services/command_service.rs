use async_trait::async_trait;
use std::fmt;

use crate::application::errors::{BotError, CommandError};
use crate::application::messaging::ExecutionContext;
use crate::application::services::Services;
use crate::domain::entities::{Command, CommandDefinition, CommandRegistry, InteractionType, Precondition, Reply};

/// Kind of a structured command failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionCommandError {
    UnknownCommand,
    ConvertFailed,
    BadArgs,
    Exception,
    Unsuccessful,
    UnmetPrecondition,
    ParseFailed,
}

impl fmt::Display for InteractionCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InteractionCommandError::UnknownCommand => "unknown command",
            InteractionCommandError::ConvertFailed => "convert failed",
            InteractionCommandError::BadArgs => "bad arguments",
            InteractionCommandError::Exception => "exception",
            InteractionCommandError::Unsuccessful => "unsuccessful",
            InteractionCommandError::UnmetPrecondition => "unmet precondition",
            InteractionCommandError::ParseFailed => "parse failed",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of executing one interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteResult {
    pub error: Option<InteractionCommandError>,
    pub reason: Option<String>,
}

impl ExecuteResult {
    pub fn success() -> Self {
        Self { error: None, reason: None }
    }

    pub fn from_error(error: InteractionCommandError, reason: impl Into<String>) -> Self {
        Self {
            error: Some(error),
            reason: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn reason(&self) -> &str {
        self.reason.as_deref().unwrap_or("")
    }
}

impl From<CommandError> for ExecuteResult {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::NotFound(_) => Self::from_error(InteractionCommandError::UnknownCommand, "Unknown command."),
            CommandError::InvalidArgs(reason) => Self::from_error(InteractionCommandError::BadArgs, reason),
            CommandError::ExecutionFailed(reason) => Self::from_error(InteractionCommandError::Unsuccessful, reason),
            CommandError::PermissionDenied(reason) => {
                Self::from_error(InteractionCommandError::UnmetPrecondition, reason)
            }
        }
    }
}

/// The command-execution subsystem the router delegates to.
///
/// `Ok` carries structured failures; `Err` is an unstructured fault.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, ctx: &ExecutionContext<'_>, services: &Services) -> Result<ExecuteResult, BotError>;

    /// Slash commands to register globally
    fn definitions(&self) -> Vec<CommandDefinition>;
}

/// Service for managing and executing commands
pub struct CommandService {
    registry: CommandRegistry,
}

impl CommandService {
    pub fn new() -> Self {
        Self {
            registry: CommandRegistry::new(),
        }
    }

    pub fn register(&mut self, command: Command) {
        self.registry.register(command);
    }

    pub fn register_defaults(&mut self) {
        self.register(Command::new("ping")
            .with_description("Check that the bot is alive")
            .with_handler(|_, _| Ok(Reply::public("Pong!"))));

        self.register(Command::new("uptime")
            .with_description("Show how long the bot has been running")
            .with_handler(|_, services| {
                let secs = services.uptime().num_seconds();
                if secs < 0 {
                    return Err(CommandError::ExecutionFailed("System clock moved backwards".to_string()));
                }
                Ok(Reply::public(format!(
                    "Up for {}h {}m {}s",
                    secs / 3600,
                    (secs % 3600) / 60,
                    secs % 60
                )))
            }));
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    fn check_preconditions(command: &Command, ctx: &ExecutionContext<'_>, services: &Services) -> Result<(), CommandError> {
        let interaction = ctx.interaction();
        for precondition in &command.preconditions {
            let met = match precondition {
                Precondition::OwnerOnly => services.is_owner(interaction.user.id),
                Precondition::GuildOnly => interaction.guild_id.is_some(),
            };
            if !met {
                return Err(CommandError::PermissionDenied(precondition.reason().to_string()));
            }
        }
        Ok(())
    }

    fn check_options(command: &Command, ctx: &ExecutionContext<'_>) -> Result<(), CommandError> {
        let interaction = ctx.interaction();
        match command
            .options
            .iter()
            .find(|spec| spec.required && interaction.option(&spec.name).is_none())
        {
            Some(missing) => Err(CommandError::InvalidArgs(format!("Missing required option: {}", missing.name))),
            None => Ok(()),
        }
    }
}

impl Default for CommandService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for CommandService {
    async fn execute(&self, ctx: &ExecutionContext<'_>, services: &Services) -> Result<ExecuteResult, BotError> {
        let interaction = ctx.interaction();
        let command = match interaction.kind {
            InteractionType::ApplicationCommand => self.registry.find(&interaction.name),
            InteractionType::MessageComponent => self.registry.find_component(&interaction.name),
            InteractionType::Other => None,
        };
        let Some(command) = command else {
            tracing::debug!("No handler for {} {:?}", interaction.kind.as_str(), interaction.name);
            return Ok(CommandError::NotFound(interaction.name.clone()).into());
        };

        tracing::debug!("Executing {} ({}) for {}", command.name, interaction.kind.as_str(), interaction.user);

        if let Err(e) = Self::check_options(command, ctx) {
            return Ok(e.into());
        }
        if let Err(e) = Self::check_preconditions(command, ctx, services) {
            return Ok(e.into());
        }

        let Some(handler) = &command.handler else {
            return Ok(ExecuteResult::from_error(
                InteractionCommandError::Exception,
                format!("Command {} not implemented", command.name),
            ));
        };

        match handler(interaction, services) {
            Ok(reply) => {
                ctx.reply(&reply).await?;
                Ok(ExecuteResult::success())
            }
            Err(e) => Ok(e.into()),
        }
    }

    fn definitions(&self) -> Vec<CommandDefinition> {
        let mut defs: Vec<CommandDefinition> = self.registry.all().filter_map(Command::definition).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }
}
