use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::{CommandDefinition, Interaction, MessageRef, OutgoingMessage};

/// Gateway trait - abstraction over the chat platform client
///
/// Implementations own the connection; callers only hold a shared reference.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Overwrite the globally registered slash commands, returning how many were accepted
    async fn register_commands_globally(&self, commands: &[CommandDefinition]) -> Result<usize, BotError>;

    /// Send the initial response to an interaction
    async fn respond(&self, interaction: &Interaction, text: &str, ephemeral: bool) -> Result<(), BotError>;

    /// Send a follow-up to an interaction that has already been acknowledged
    async fn follow_up(&self, interaction: &Interaction, text: &str, ephemeral: bool) -> Result<MessageRef, BotError>;

    /// Fetch the message created by the initial response
    async fn get_original_response(&self, interaction: &Interaction) -> Result<MessageRef, BotError>;

    async fn delete_message(&self, message: &MessageRef) -> Result<(), BotError>;

    /// Post a message into a channel
    async fn send_message(&self, channel_id: u64, message: &OutgoingMessage) -> Result<MessageRef, BotError>;
}
