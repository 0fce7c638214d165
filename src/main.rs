use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::task::JoinHandle;

mod domain;
mod application;
mod infrastructure;

#[cfg(test)]
mod testing;

use application::errors::BotError;
use application::messaging::{EventParser, InteractionRouter};
use application::services::{CommandService, Services};
use domain::entities::{Command, Precondition, Reply, User};
use infrastructure::adapters::console::ConsoleAdapter;
use infrastructure::adapters::discord::{self, DiscordAdapter};
use infrastructure::config::Config;

#[derive(Parser)]
#[command(name = "relay-bot")]
#[command(about = "A minimal slash-command dispatcher for Discord", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Discord bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot (console mode when no token is configured)
    Run,
    /// Drive the bot from stdin without connecting to Discord
    Console,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, cli.token, false),
        Commands::Console => run_bot(&cli.config, None, true),
        Commands::Version => {
            println!("relay-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(config_path: &str) -> Result<Config, BotError> {
    if !std::path::Path::new(config_path).exists() {
        return Ok(Config::load_env()?);
    }
    let mut config = Config::load(config_path).unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}, using defaults", e);
        Config::default()
    });
    config.apply_env()?;
    Ok(config)
}

fn run_bot(config_path: &str, token_override: Option<String>, force_console: bool) -> Result<(), BotError> {
    let mut config = load_config(config_path)?;
    if let Some(token) = token_override {
        config.discord.token = Some(token);
    }

    tracing::info!("Starting {}", config.bot.name);

    let services = Arc::new(Services::new(config));

    let mut commands = CommandService::new();
    commands.register_defaults();
    register_server_command(&mut commands);
    register_say_command(&mut commands);
    register_panel_buttons(&mut commands);
    tracing::info!("Registered {} command handlers", commands.registry().len());
    let commands = Arc::new(commands);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;

    match services.config.token().map(str::to_string) {
        Some(token) if !force_console => rt.block_on(async {
            let adapter = Arc::new(DiscordAdapter::new(&token));
            let router = Arc::new(InteractionRouter::new(adapter.clone(), commands, services));
            discord::run(&token, adapter, router).await
        }),
        _ => rt.block_on(run_console_bot(commands, services)),
    }
}

async fn run_console_bot(commands: Arc<CommandService>, services: Arc<Services>) -> Result<(), BotError> {
    let adapter = Arc::new(ConsoleAdapter::new());
    let console = services.config.console.clone();
    let user = User::new(console.user_id).with_username("console");
    let router = Arc::new(InteractionRouter::new(adapter.clone(), commands, services));
    let mut parser = EventParser::new("/", user, console.guild_id);

    tracing::info!("Console mode: /command key=value, !press <id>, !channel <category>, !ready, !quit");

    if let Some(event) = parser.parse("!ready") {
        router.dispatch(&event).await;
    }

    let mut pending: Vec<JoinHandle<()>> = Vec::new();
    let result = adapter
        .read_lines(|line| {
            if line.trim() == "!quit" {
                return false;
            }
            match parser.parse(&line) {
                Some(event) => pending.push(router.spawn(event)),
                None => println!("[?] unrecognised input: {}", line.trim()),
            }
            true
        })
        .await;

    // Let in-flight dispatches finish before the runtime shuts down
    for handle in pending {
        if let Err(e) = handle.await {
            tracing::warn!("Console dispatch did not complete: {}", e);
        }
    }

    result
}

fn register_server_command(commands: &mut CommandService) {
    commands.register(Command::new("server")
        .with_description("Show where this command was run")
        .with_precondition(Precondition::GuildOnly)
        .with_handler(|interaction, _| {
            let guild = interaction.guild_id.unwrap_or_default();
            Ok(Reply::public(format!("Guild {}, channel {}", guild, interaction.channel_id)))
        }));
}

fn register_say_command(commands: &mut CommandService) {
    commands.register(Command::new("say")
        .with_description("Make the bot say something")
        .with_option("text", "What to say", true)
        .with_precondition(Precondition::OwnerOnly)
        .with_handler(|interaction, _| {
            let text = interaction.option("text").unwrap_or_default();
            Ok(Reply::public(text))
        }));
}

/// Handlers for the buttons on the welcome panel
fn register_panel_buttons(commands: &mut CommandService) {
    for (custom_id, label) in [("1", "Button 1"), ("2", "Button 2")] {
        commands.register(Command::component(custom_id)
            .with_handler(move |_, _| Ok(Reply::ephemeral(format!("You selected {}", label)))));
    }
}

fn init_config() -> Result<(), BotError> {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config)
        .map_err(|e| BotError::Internal(format!("Failed to render config: {}", e)))?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::messaging::ExecutionContext;
    use crate::application::services::{CommandExecutor, InteractionCommandError};
    use crate::domain::entities::Interaction;
    use crate::infrastructure::config::DEFAULT_WELCOME_CATEGORY_ID;
    use crate::testing::{Call, RecordingGateway};

    fn commands() -> CommandService {
        let mut commands = CommandService::new();
        commands.register_defaults();
        register_server_command(&mut commands);
        register_say_command(&mut commands);
        register_panel_buttons(&mut commands);
        commands
    }

    #[test]
    fn test_registered_definitions() {
        let names: Vec<String> = commands().definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["ping", "say", "server", "uptime"]);
    }

    #[tokio::test]
    async fn test_panel_buttons() {
        let gateway = RecordingGateway::new();
        let services = Services::new(Config::default());
        let interaction = Interaction::component(4, "2");

        let result = commands()
            .execute(&ExecutionContext::new(&gateway, &interaction), &services)
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(gateway.calls(), vec![Call::Respond {
            id: 4,
            text: "You selected Button 2".to_string(),
            ephemeral: true,
        }]);
    }

    #[tokio::test]
    async fn test_say_requires_owner() {
        let gateway = RecordingGateway::new();
        let services = Services::new(Config::default());
        let interaction = Interaction::command(5, "say").with_option("text", "hi");

        let result = commands()
            .execute(&ExecutionContext::new(&gateway, &interaction), &services)
            .await
            .unwrap();

        assert_eq!(result.error, Some(InteractionCommandError::UnmetPrecondition));
    }

    #[test]
    fn test_default_config_renders() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        let parsed = Config::parse(&yaml).unwrap();
        assert_eq!(parsed.welcome.category_id, DEFAULT_WELCOME_CATEGORY_ID);
    }
}
