//! Recording gateway used by unit tests

use async_trait::async_trait;
use std::sync::Mutex;

use crate::application::errors::BotError;
use crate::domain::entities::{CommandDefinition, Interaction, MessageRef, OutgoingMessage};
use crate::domain::traits::Gateway;

/// Message id the recording gateway hands out for interaction `id`
pub fn original_response_of(id: u64) -> MessageRef {
    MessageRef { channel_id: 10, message_id: id + 1000 }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Register(Vec<String>),
    Respond { id: u64, text: String, ephemeral: bool },
    FollowUp { id: u64, text: String, ephemeral: bool },
    GetOriginalResponse(u64),
    Delete(MessageRef),
    Send { channel_id: u64, message: OutgoingMessage },
}

/// Gateway that records every call and fails on request
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<Call>>,
    fail_respond: bool,
    fail_get_original: bool,
    fail_register: bool,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_respond(mut self) -> Self {
        self.fail_respond = true;
        self
    }

    pub fn failing_get_original(mut self) -> Self {
        self.fail_get_original = true;
        self
    }

    pub fn failing_register(mut self) -> Self {
        self.fail_register = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Gateway for RecordingGateway {
    async fn register_commands_globally(&self, commands: &[CommandDefinition]) -> Result<usize, BotError> {
        self.record(Call::Register(commands.iter().map(|c| c.name.clone()).collect()));
        if self.fail_register {
            return Err(BotError::Network("register rejected".to_string()));
        }
        Ok(commands.len())
    }

    async fn respond(&self, interaction: &Interaction, text: &str, ephemeral: bool) -> Result<(), BotError> {
        self.record(Call::Respond { id: interaction.id, text: text.to_string(), ephemeral });
        if self.fail_respond {
            return Err(BotError::Network("respond rejected".to_string()));
        }
        Ok(())
    }

    async fn follow_up(&self, interaction: &Interaction, text: &str, ephemeral: bool) -> Result<MessageRef, BotError> {
        self.record(Call::FollowUp { id: interaction.id, text: text.to_string(), ephemeral });
        Ok(MessageRef { channel_id: 10, message_id: interaction.id + 2000 })
    }

    async fn get_original_response(&self, interaction: &Interaction) -> Result<MessageRef, BotError> {
        self.record(Call::GetOriginalResponse(interaction.id));
        if self.fail_get_original {
            return Err(BotError::NotFound("original response".to_string()));
        }
        Ok(original_response_of(interaction.id))
    }

    async fn delete_message(&self, message: &MessageRef) -> Result<(), BotError> {
        self.record(Call::Delete(*message));
        Ok(())
    }

    async fn send_message(&self, channel_id: u64, message: &OutgoingMessage) -> Result<MessageRef, BotError> {
        self.record(Call::Send { channel_id, message: message.clone() });
        Ok(MessageRef { channel_id, message_id: 1 })
    }
}
