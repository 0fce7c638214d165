//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod interaction;
pub mod channel;
pub mod message;
pub mod command;

pub use user::User;
pub use interaction::{Interaction, InteractionType, CommandOption};
pub use channel::{Channel, ChannelKind};
pub use message::{OutgoingMessage, Embed, Button, MessageRef};
pub use command::{Command, CommandKind, CommandDefinition, CommandRegistry, OptionSpec, Precondition, Reply};
