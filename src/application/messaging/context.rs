//! Execution context - binds a gateway and an interaction for one dispatch

use crate::application::errors::BotError;
use crate::domain::entities::{Interaction, MessageRef, Reply};
use crate::domain::traits::Gateway;

/// Short-lived pairing of a gateway and the interaction being handled
pub struct ExecutionContext<'a> {
    gateway: &'a dyn Gateway,
    interaction: &'a Interaction,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(gateway: &'a dyn Gateway, interaction: &'a Interaction) -> Self {
        Self { gateway, interaction }
    }

    pub fn interaction(&self) -> &'a Interaction {
        self.interaction
    }

    /// Send the initial response and mark the interaction as responded
    pub async fn respond(&self, text: &str, ephemeral: bool) -> Result<(), BotError> {
        self.gateway.respond(self.interaction, text, ephemeral).await?;
        self.interaction.mark_responded();
        Ok(())
    }

    pub async fn follow_up(&self, text: &str, ephemeral: bool) -> Result<MessageRef, BotError> {
        self.gateway.follow_up(self.interaction, text, ephemeral).await
    }

    /// Respond, or follow up if the interaction was already acknowledged
    pub async fn reply(&self, reply: &Reply) -> Result<(), BotError> {
        if self.interaction.has_responded() {
            self.follow_up(&reply.content, reply.ephemeral).await?;
        } else {
            self.respond(&reply.content, reply.ephemeral).await?;
        }
        Ok(())
    }
}
