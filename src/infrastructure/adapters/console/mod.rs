//! Console adapter for development/testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::domain::entities::{CommandDefinition, Interaction, MessageRef, OutgoingMessage};
use crate::domain::traits::Gateway;
use crate::application::errors::BotError;

/// Console gateway for local development; prints everything the bot would send
pub struct ConsoleAdapter {
    next_message_id: AtomicU64,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            next_message_id: AtomicU64::new(1),
        }
    }

    fn next_message(&self, channel_id: u64) -> MessageRef {
        MessageRef {
            channel_id,
            message_id: self.next_message_id.fetch_add(1, Ordering::SeqCst),
        }
    }

    /// Read lines from stdin until EOF, handing each to `on_line`
    pub async fn read_lines<F>(&self, mut on_line: F) -> Result<(), BotError>
    where
        F: FnMut(String) -> bool,
    {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| BotError::Internal(format!("stdin: {}", e)))?
        {
            if line.trim().is_empty() {
                continue;
            }
            if !on_line(line) {
                break;
            }
        }
        Ok(())
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn visibility(ephemeral: bool) -> &'static str {
    if ephemeral { " (only you)" } else { "" }
}

#[async_trait]
impl Gateway for ConsoleAdapter {
    async fn register_commands_globally(&self, commands: &[CommandDefinition]) -> Result<usize, BotError> {
        let names: Vec<String> = commands.iter().map(|c| format!("/{}", c.name)).collect();
        println!("[REGISTER] {}", names.join(" "));
        Ok(commands.len())
    }

    async fn respond(&self, _interaction: &Interaction, text: &str, ephemeral: bool) -> Result<(), BotError> {
        println!("[BOT]{} {}", visibility(ephemeral), text);
        Ok(())
    }

    async fn follow_up(&self, interaction: &Interaction, text: &str, ephemeral: bool) -> Result<MessageRef, BotError> {
        println!("[BOT follow-up]{} {}", visibility(ephemeral), text);
        Ok(self.next_message(interaction.channel_id))
    }

    async fn get_original_response(&self, interaction: &Interaction) -> Result<MessageRef, BotError> {
        if !interaction.has_responded() {
            return Err(BotError::NotFound(format!("response to interaction {}", interaction.id)));
        }
        Ok(MessageRef {
            channel_id: interaction.channel_id,
            message_id: interaction.id,
        })
    }

    async fn delete_message(&self, message: &MessageRef) -> Result<(), BotError> {
        println!("[BOT] deleted message {}", message.message_id);
        Ok(())
    }

    async fn send_message(&self, channel_id: u64, message: &OutgoingMessage) -> Result<MessageRef, BotError> {
        println!("[BOT -> #{}] {}", channel_id, message.content.as_deref().unwrap_or(""));
        for embed in &message.embeds {
            println!(
                "  [Embed] {} - {}",
                embed.title.as_deref().unwrap_or(""),
                embed.description.as_deref().unwrap_or("")
            );
        }
        if !message.buttons.is_empty() {
            let row: Vec<String> = message
                .buttons
                .iter()
                .map(|b| format!("{} ({})", b.label, b.custom_id))
                .collect();
            println!("  [Buttons] {}", row.join(" | "));
        }
        Ok(self.next_message(channel_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_original_response_requires_a_response() {
        let adapter = ConsoleAdapter::new();
        let interaction = Interaction::command(5, "ping").in_channel(3);
        assert!(adapter.get_original_response(&interaction).await.is_err());

        interaction.mark_responded();
        let message = adapter.get_original_response(&interaction).await.unwrap();
        assert_eq!(message, MessageRef { channel_id: 3, message_id: 5 });
    }

    #[tokio::test]
    async fn test_message_ids_increase() {
        let adapter = ConsoleAdapter::new();
        let first = adapter.send_message(1, &OutgoingMessage::new().with_content("a")).await.unwrap();
        let second = adapter.send_message(1, &OutgoingMessage::new().with_content("b")).await.unwrap();
        assert!(second.message_id > first.message_id);
    }
}
