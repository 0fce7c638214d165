//! Discord adapter over serenity

use async_trait::async_trait;
use serenity::all::{
    ButtonStyle, ChannelId, ChannelType, Client, Colour, Command as DiscordCommand,
    CommandDataOptionValue, CommandOptionType, Context, CreateActionRow, CreateButton, CreateCommand,
    CreateCommandOption, CreateEmbed, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateMessage, EventHandler, GatewayIntents, GuildChannel, Http,
    Interaction as DiscordInteraction, InteractionId, Message, MessageId, Ready, User as DiscordUser,
};
use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::messaging::{GatewayEvent, InteractionRouter};
use crate::domain::entities::{
    Channel, ChannelKind, CommandDefinition, Interaction, InteractionType, MessageRef, OutgoingMessage, User,
};
use crate::domain::traits::Gateway;

fn network(e: serenity::Error) -> BotError {
    BotError::Network(e.to_string())
}

fn message_ref(message: &Message) -> MessageRef {
    MessageRef {
        channel_id: message.channel_id.get(),
        message_id: message.id.get(),
    }
}

/// Gateway backed by the Discord REST API
pub struct DiscordAdapter {
    http: Arc<Http>,
}

impl DiscordAdapter {
    pub fn new(token: &str) -> Self {
        Self {
            http: Arc::new(Http::new(token)),
        }
    }

    pub fn http(&self) -> Arc<Http> {
        self.http.clone()
    }

    fn create_command(definition: &CommandDefinition) -> CreateCommand {
        definition.options.iter().fold(
            CreateCommand::new(definition.name.as_str()).description(definition.description.as_str()),
            |cmd, option| {
                cmd.add_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        option.name.as_str(),
                        option.description.as_str(),
                    )
                    .required(option.required),
                )
            },
        )
    }

    fn create_message(message: &OutgoingMessage) -> CreateMessage {
        let mut builder = CreateMessage::new();
        if let Some(content) = &message.content {
            builder = builder.content(content.as_str());
        }
        for embed in &message.embeds {
            let mut create = CreateEmbed::new();
            if let Some(title) = &embed.title {
                create = create.title(title.as_str());
            }
            if let Some(description) = &embed.description {
                create = create.description(description.as_str());
            }
            if let Some(colour) = embed.colour {
                create = create.colour(Colour::new(colour));
            }
            builder = builder.add_embed(create);
        }
        if !message.buttons.is_empty() {
            let buttons = message
                .buttons
                .iter()
                .map(|b| CreateButton::new(b.custom_id.as_str()).label(b.label.as_str()).style(ButtonStyle::Primary))
                .collect();
            builder = builder.components(vec![CreateActionRow::Buttons(buttons)]);
        }
        builder
    }

    fn create_response(text: &str, ephemeral: bool) -> CreateInteractionResponse {
        CreateInteractionResponse::Message(CreateInteractionResponseMessage::new().content(text).ephemeral(ephemeral))
    }
}

#[async_trait]
impl Gateway for DiscordAdapter {
    async fn register_commands_globally(&self, commands: &[CommandDefinition]) -> Result<usize, BotError> {
        let builders = commands.iter().map(Self::create_command).collect();
        let registered = DiscordCommand::set_global_commands(&self.http, builders)
            .await
            .map_err(network)?;
        Ok(registered.len())
    }

    async fn respond(&self, interaction: &Interaction, text: &str, ephemeral: bool) -> Result<(), BotError> {
        let response = Self::create_response(text, ephemeral);
        self.http
            .create_interaction_response(InteractionId::new(interaction.id), &interaction.token, &response, Vec::new())
            .await
            .map_err(network)
    }

    async fn follow_up(&self, interaction: &Interaction, text: &str, ephemeral: bool) -> Result<MessageRef, BotError> {
        let followup = CreateInteractionResponseFollowup::new().content(text).ephemeral(ephemeral);
        let message = self
            .http
            .create_followup_message(&interaction.token, &followup, Vec::new())
            .await
            .map_err(network)?;
        Ok(message_ref(&message))
    }

    async fn get_original_response(&self, interaction: &Interaction) -> Result<MessageRef, BotError> {
        let message = self
            .http
            .get_original_interaction_response(&interaction.token)
            .await
            .map_err(network)?;
        Ok(message_ref(&message))
    }

    async fn delete_message(&self, message: &MessageRef) -> Result<(), BotError> {
        self.http
            .delete_message(ChannelId::new(message.channel_id), MessageId::new(message.message_id), None)
            .await
            .map_err(network)
    }

    async fn send_message(&self, channel_id: u64, message: &OutgoingMessage) -> Result<MessageRef, BotError> {
        if message.is_empty() {
            return Err(BotError::Internal(format!("Refusing to send an empty message to {}", channel_id)));
        }
        let sent = ChannelId::new(channel_id)
            .send_message(&self.http, Self::create_message(message))
            .await
            .map_err(network)?;
        Ok(message_ref(&sent))
    }
}

fn convert_user(user: &DiscordUser) -> User {
    User::new(user.id.get())
        .with_username(user.name.as_str())
        .with_global_name(user.global_name.as_deref())
}

/// Translate a serenity interaction into the router's model
pub fn convert_interaction(interaction: &DiscordInteraction) -> Interaction {
    match interaction {
        DiscordInteraction::Command(command) => {
            let mut converted = Interaction::command(command.id.get(), command.data.name.as_str())
                .with_token(command.token.as_str())
                .with_user(convert_user(&command.user))
                .in_guild(command.guild_id.map(|g| g.get()))
                .in_channel(command.channel_id.get());
            for option in &command.data.options {
                if let CommandDataOptionValue::String(value) = &option.value {
                    converted = converted.with_option(option.name.as_str(), value.as_str());
                }
            }
            converted
        }
        DiscordInteraction::Component(component) => {
            Interaction::component(component.id.get(), component.data.custom_id.as_str())
                .with_token(component.token.as_str())
                .with_user(convert_user(&component.user))
                .in_guild(component.guild_id.map(|g| g.get()))
                .in_channel(component.channel_id.get())
        }
        other => Interaction::new(other.id().get(), InteractionType::Other, "").with_token(other.token()),
    }
}

/// Announcement channels accept messages the same way text channels do
fn channel_kind(kind: ChannelType) -> ChannelKind {
    match kind {
        ChannelType::Text | ChannelType::News => ChannelKind::Text,
        _ => ChannelKind::Other,
    }
}

fn build_channel(id: ChannelId, name: &str, kind: ChannelType, parent_id: Option<ChannelId>) -> Channel {
    let converted = Channel::text(id.get(), name).with_kind(channel_kind(kind));
    match parent_id {
        Some(parent) => converted.under(parent.get()),
        None => converted,
    }
}

pub fn convert_channel(channel: &GuildChannel) -> Channel {
    build_channel(channel.id, channel.name.as_str(), channel.kind, channel.parent_id)
}

/// serenity event handler forwarding into the interaction router
pub struct DiscordHandler {
    router: Arc<InteractionRouter>,
    http: Arc<Http>,
}

impl DiscordHandler {
    pub fn new(router: Arc<InteractionRouter>, http: Arc<Http>) -> Self {
        Self { router, http }
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        // Global registration needs the application id, known only after login
        self.http.set_application_id(ready.application.id);
        self.router
            .dispatch(&GatewayEvent::Ready {
                bot_name: ready.user.name.clone(),
            })
            .await;
    }

    async fn interaction_create(&self, _ctx: Context, interaction: DiscordInteraction) {
        let event = GatewayEvent::InteractionCreated(convert_interaction(&interaction));
        self.router.dispatch(&event).await;
    }

    async fn channel_create(&self, _ctx: Context, channel: GuildChannel) {
        self.router
            .dispatch(&GatewayEvent::ChannelCreated(convert_channel(&channel)))
            .await;
    }
}

/// Connect to Discord and serve events until the connection closes
pub async fn run(token: &str, adapter: Arc<DiscordAdapter>, router: Arc<InteractionRouter>) -> Result<(), BotError> {
    let handler = DiscordHandler::new(router, adapter.http());
    let mut client = Client::builder(token, GatewayIntents::GUILDS)
        .event_handler(handler)
        .await
        .map_err(|e| BotError::Auth(e.to_string()))?;

    tracing::info!("Connecting to Discord gateway");
    client.start().await.map_err(network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::messaging::WelcomePanel;
    use crate::domain::entities::OptionSpec;
    use serde_json::json;

    #[test]
    fn test_welcome_panel_keeps_embed_and_buttons() {
        let builder = DiscordAdapter::create_message(&WelcomePanel::panel());
        let value = serde_json::to_value(&builder).unwrap();

        assert_eq!(value["embeds"][0]["title"], "This is a message with buttons");
        assert_eq!(value["embeds"][0]["description"], "Please select a button");
        assert_eq!(value["embeds"][0]["color"], 0x206694);

        let row = &value["components"][0];
        assert_eq!(row["type"], 1);
        let buttons = row["components"].as_array().unwrap();
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0]["custom_id"], "1");
        assert_eq!(buttons[0]["label"], "Button 1");
        assert_eq!(buttons[1]["custom_id"], "2");
        assert_eq!(buttons[1]["label"], "Button 2");
    }

    #[test]
    fn test_create_command_declares_string_options() {
        let definition = CommandDefinition {
            name: "say".to_string(),
            description: "Make the bot say something".to_string(),
            options: vec![OptionSpec {
                name: "text".to_string(),
                description: "What to say".to_string(),
                required: true,
            }],
        };
        let value = serde_json::to_value(DiscordAdapter::create_command(&definition)).unwrap();

        assert_eq!(value["name"], "say");
        assert_eq!(value["options"][0]["name"], "text");
        assert_eq!(value["options"][0]["type"], 3);
        assert_eq!(value["options"][0]["required"], true);
    }

    #[test]
    fn test_ephemeral_response_sets_flag() {
        let value = serde_json::to_value(DiscordAdapter::create_response("No", true)).unwrap();
        assert_eq!(value["type"], 4);
        assert_eq!(value["data"]["content"], "No");
        assert_eq!(value["data"]["flags"].as_u64().unwrap_or(0) & 64, 64);

        let value = serde_json::to_value(DiscordAdapter::create_response("Yes", false)).unwrap();
        assert_eq!(value["data"]["flags"].as_u64().unwrap_or(0) & 64, 0);
    }

    #[test]
    fn test_text_and_news_channels_under_category() {
        let category = ChannelId::new(1163983820245180446);
        for kind in [ChannelType::Text, ChannelType::News] {
            let channel = build_channel(ChannelId::new(7), "general", kind, Some(category));
            assert_eq!(channel.kind, ChannelKind::Text);
            assert!(channel.is_text_in_category(1163983820245180446), "{:?}", kind);
        }
    }

    #[test]
    fn test_other_channel_kinds_are_not_text() {
        let category = ChannelId::new(1163983820245180446);
        for kind in [ChannelType::Voice, ChannelType::Category, ChannelType::Stage, ChannelType::Forum] {
            let channel = build_channel(ChannelId::new(7), "lounge", kind, Some(category));
            assert!(!channel.is_text_in_category(1163983820245180446), "{:?}", kind);
        }

        let orphan = build_channel(ChannelId::new(8), "general", ChannelType::Text, None);
        assert_eq!(orphan.parent_id, None);
        assert!(!orphan.is_text_in_category(1163983820245180446));
    }

    #[test]
    fn test_convert_command_interaction() {
        let payload = json!({
            "id": "11",
            "application_id": "12",
            "type": 2,
            "token": "interaction-token",
            "version": 1,
            "guild_id": "13",
            "channel_id": "14",
            "user": {
                "id": "15",
                "username": "alice",
                "discriminator": "0",
                "global_name": "Alice",
                "avatar": null
            },
            "data": {
                "id": "16",
                "name": "say",
                "type": 1,
                "options": [{ "name": "text", "type": 3, "value": "hello" }]
            },
            "app_permissions": "0",
            "locale": "en-US",
            "entitlements": []
        });
        let raw: DiscordInteraction = serde_json::from_value(payload).unwrap();

        let interaction = convert_interaction(&raw);
        assert_eq!(interaction.id, 11);
        assert!(interaction.is_application_command());
        assert_eq!(interaction.name, "say");
        assert_eq!(interaction.token, "interaction-token");
        assert_eq!(interaction.guild_id, Some(13));
        assert_eq!(interaction.channel_id, 14);
        assert_eq!(interaction.user.id, 15);
        assert_eq!(interaction.user.to_string(), "Alice");
        assert_eq!(interaction.option("text"), Some("hello"));
        assert!(!interaction.has_responded());
    }
}
