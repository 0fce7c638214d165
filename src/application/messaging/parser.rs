//! Event parser - turns console input lines into gateway events

use crate::domain::entities::{Channel, Interaction, User};
use super::router::GatewayEvent;

/// Parses console lines into the events a real gateway would deliver.
///
/// - `/name key=value ...` invokes a slash command; bare words after an
///   option are appended to its value
/// - `!press <custom-id>` presses a button
/// - `!channel <category-id> [name]` simulates a text channel being created
/// - `!ready` replays the ready event
pub struct EventParser {
    command_prefix: String,
    user: User,
    guild_id: Option<u64>,
    channel_id: u64,
    next_id: u64,
}

impl EventParser {
    pub fn new(prefix: impl Into<String>, user: User, guild_id: Option<u64>) -> Self {
        Self {
            command_prefix: prefix.into(),
            user,
            guild_id,
            channel_id: 1,
            next_id: 1,
        }
    }

    /// Parse one line, `None` when it is not a recognised event
    pub fn parse(&mut self, line: &str) -> Option<GatewayEvent> {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix(&self.command_prefix) {
            return self.parse_command(rest);
        }

        let mut parts = line.strip_prefix('!')?.split_whitespace();
        match parts.next()? {
            "ready" => Some(GatewayEvent::Ready {
                bot_name: "console".to_string(),
            }),
            "press" => {
                let custom_id = parts.next()?;
                let id = self.next_id();
                let interaction = self.interaction(Interaction::component(id, custom_id));
                Some(GatewayEvent::InteractionCreated(interaction))
            }
            "channel" => {
                let category_id = parts.next()?.parse::<u64>().ok()?;
                let name = parts.next().unwrap_or("new-channel");
                let id = self.next_id();
                Some(GatewayEvent::ChannelCreated(Channel::text(id, name).under(category_id)))
            }
            _ => None,
        }
    }

    /// Parse a command line
    fn parse_command(&mut self, text: &str) -> Option<GatewayEvent> {
        let mut parts = text.split_whitespace();
        let name = parts.next()?;
        let mut options: Vec<(String, String)> = Vec::new();

        for part in parts {
            match part.split_once('=') {
                Some((key, value)) if !key.is_empty() => options.push((key.to_string(), value.to_string())),
                _ => {
                    let (_, value) = options.last_mut()?;
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(part);
                }
            }
        }

        let mut interaction = Interaction::command(self.next_id(), name);
        for (key, value) in options {
            interaction = interaction.with_option(key, value);
        }
        Some(GatewayEvent::InteractionCreated(self.interaction(interaction)))
    }

    fn interaction(&self, interaction: Interaction) -> Interaction {
        let token = format!("console-{}", interaction.id);
        interaction
            .with_token(token)
            .with_user(self.user.clone())
            .in_guild(self.guild_id)
            .in_channel(self.channel_id)
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
