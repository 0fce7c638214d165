//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Command execution and the shared service context
//! - Errors: Domain-specific errors
//! - Messaging: Execution context, event handlers, interaction routing

pub mod errors;
pub mod services;
pub mod messaging;
