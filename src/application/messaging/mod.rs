//! Interaction handling - Event-driven routing of gateway events

pub mod context;
pub mod handlers;
pub mod parser;
pub mod router;

pub use context::ExecutionContext;
pub use handlers::{DispatchInteraction, EventHandler, RegisterCommands, WelcomePanel};
pub use parser::EventParser;
pub use router::{EventKind, GatewayEvent, InteractionRouter};
