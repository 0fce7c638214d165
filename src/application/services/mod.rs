//! Application services - Command execution and shared service context

pub mod command_service;

pub use command_service::{CommandExecutor, CommandService, ExecuteResult, InteractionCommandError};

use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use crate::infrastructure::config::Config;

/// Read-only services handed to every command execution
#[derive(Debug, Clone)]
pub struct Services {
    pub config: Arc<Config>,
    pub started_at: DateTime<Utc>,
}

impl Services {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            started_at: Utc::now(),
        }
    }

    pub fn is_owner(&self, user_id: u64) -> bool {
        self.config.bot.owners.contains(&user_id)
    }

    pub fn uptime(&self) -> Duration {
        Utc::now() - self.started_at
    }
}
