//! Event handlers - typed callbacks installed into the router's dispatch table

use async_trait::async_trait;
use std::sync::Arc;

use super::context::ExecutionContext;
use super::router::GatewayEvent;
use crate::application::errors::BotError;
use crate::application::services::{CommandExecutor, InteractionCommandError, Services};
use crate::domain::entities::{message::DARK_BLUE, Button, Channel, Embed, Interaction, OutgoingMessage};
use crate::domain::traits::Gateway;

/// Callback invoked for every event of the kind it was registered under
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &GatewayEvent);
}

/// Registers all slash commands globally once the gateway is ready
pub struct RegisterCommands {
    gateway: Arc<dyn Gateway>,
    commands: Arc<dyn CommandExecutor>,
}

impl RegisterCommands {
    pub fn new(gateway: Arc<dyn Gateway>, commands: Arc<dyn CommandExecutor>) -> Self {
        Self { gateway, commands }
    }

    async fn on_ready(&self) {
        let definitions = self.commands.definitions();
        match self.gateway.register_commands_globally(&definitions).await {
            Ok(count) => tracing::info!("Registered {} commands globally", count),
            Err(e) => tracing::error!("Failed to register commands: {}", e),
        }
    }
}

#[async_trait]
impl EventHandler for RegisterCommands {
    async fn handle(&self, event: &GatewayEvent) {
        if let GatewayEvent::Ready { bot_name } = event {
            tracing::info!("Gateway ready as {}", bot_name);
            self.on_ready().await;
        }
    }
}

/// Runs interactions through the command executor and reports failures back
pub struct DispatchInteraction {
    gateway: Arc<dyn Gateway>,
    commands: Arc<dyn CommandExecutor>,
    services: Arc<Services>,
}

impl DispatchInteraction {
    pub fn new(gateway: Arc<dyn Gateway>, commands: Arc<dyn CommandExecutor>, services: Arc<Services>) -> Self {
        Self { gateway, commands, services }
    }

    async fn on_interaction(&self, interaction: &Interaction) {
        let ctx = ExecutionContext::new(&*self.gateway, interaction);

        if let Err(e) = self.execute_and_relay(&ctx).await {
            tracing::error!("Interaction {} ({}) faulted: {}", interaction.id, interaction.name, e);
            // An acknowledged slash command would otherwise stay stuck on "thinking"
            if interaction.is_application_command() {
                self.delete_original_response(interaction).await;
            }
        }
    }

    async fn execute_and_relay(&self, ctx: &ExecutionContext<'_>) -> Result<(), BotError> {
        let result = self.commands.execute(ctx, &self.services).await?;
        let interaction = ctx.interaction();

        match result.error {
            None => {}
            Some(InteractionCommandError::UnmetPrecondition) => {
                if interaction.has_responded() {
                    ctx.follow_up(result.reason(), true).await?;
                } else {
                    ctx.respond(result.reason(), true).await?;
                }
            }
            Some(kind) => {
                tracing::warn!("Command {} failed ({}): {}", interaction.name, kind, result.reason());
            }
        }
        Ok(())
    }

    async fn delete_original_response(&self, interaction: &Interaction) {
        match self.gateway.get_original_response(interaction).await {
            Ok(message) => {
                if let Err(e) = self.gateway.delete_message(&message).await {
                    tracing::debug!("Failed to delete original response: {}", e);
                }
            }
            Err(e) => tracing::debug!("No original response to delete: {}", e),
        }
    }
}

#[async_trait]
impl EventHandler for DispatchInteraction {
    async fn handle(&self, event: &GatewayEvent) {
        if let GatewayEvent::InteractionCreated(interaction) = event {
            self.on_interaction(interaction).await;
        }
    }
}

/// Posts a button panel into text channels created under a watched category
pub struct WelcomePanel {
    gateway: Arc<dyn Gateway>,
    category_id: u64,
}

impl WelcomePanel {
    pub fn new(gateway: Arc<dyn Gateway>, category_id: u64) -> Self {
        Self { gateway, category_id }
    }

    pub fn panel() -> OutgoingMessage {
        OutgoingMessage::new()
            .with_embed(Embed::new()
                .title("This is a message with buttons")
                .description("Please select a button")
                .colour(DARK_BLUE))
            .with_button(Button::primary("1", "Button 1"))
            .with_button(Button::primary("2", "Button 2"))
    }

    async fn on_channel_created(&self, channel: &Channel) {
        if !channel.is_text_in_category(self.category_id) {
            return;
        }
        tracing::info!("Posting welcome panel in #{} ({})", channel.name, channel.id);
        if let Err(e) = self.gateway.send_message(channel.id, &Self::panel()).await {
            tracing::warn!("Failed to post welcome panel: {}", e);
        }
    }
}

#[async_trait]
impl EventHandler for WelcomePanel {
    async fn handle(&self, event: &GatewayEvent) {
        if let GatewayEvent::ChannelCreated(channel) = event {
            self.on_channel_created(channel).await;
        }
    }
}
