//! Interaction router - owns the event dispatch table

use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::handlers::{DispatchInteraction, EventHandler, RegisterCommands, WelcomePanel};
use crate::application::services::{CommandExecutor, Services};
use crate::domain::entities::{Channel, Interaction};
use crate::domain::traits::Gateway;

/// An inbound event from the gateway
#[derive(Debug)]
pub enum GatewayEvent {
    Ready { bot_name: String },
    InteractionCreated(Interaction),
    ChannelCreated(Channel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    InteractionCreated,
    ChannelCreated,
}

impl GatewayEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GatewayEvent::Ready { .. } => EventKind::Ready,
            GatewayEvent::InteractionCreated(_) => EventKind::InteractionCreated,
            GatewayEvent::ChannelCreated(_) => EventKind::ChannelCreated,
        }
    }
}

/// Builder for the dispatch table
#[derive(Default)]
pub struct RouterBuilder {
    handlers: HashMap<EventKind, Vec<Arc<dyn EventHandler>>>,
}

impl RouterBuilder {
    pub fn on<H: EventHandler + 'static>(mut self, kind: EventKind, handler: H) -> Self {
        self.handlers.entry(kind).or_default().push(Arc::new(handler));
        self
    }

    pub fn build(self) -> InteractionRouter {
        InteractionRouter {
            handlers: self.handlers,
        }
    }
}

/// Routes gateway events to the handlers registered for their kind
pub struct InteractionRouter {
    handlers: HashMap<EventKind, Vec<Arc<dyn EventHandler>>>,
}

impl InteractionRouter {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    /// Router with the standard handlers: command registration on ready,
    /// interaction dispatch, and the welcome panel when enabled
    pub fn new(gateway: Arc<dyn Gateway>, commands: Arc<dyn CommandExecutor>, services: Arc<Services>) -> Self {
        let welcome = services.config.welcome.clone();

        let mut builder = Self::builder()
            .on(EventKind::Ready, RegisterCommands::new(gateway.clone(), commands.clone()))
            .on(
                EventKind::InteractionCreated,
                DispatchInteraction::new(gateway.clone(), commands, services),
            );

        if welcome.enabled {
            builder = builder.on(EventKind::ChannelCreated, WelcomePanel::new(gateway, welcome.category_id));
        }

        builder.build()
    }

    #[cfg(test)]
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Run every handler registered for the event's kind, in registration order
    pub async fn dispatch(&self, event: &GatewayEvent) {
        let Some(handlers) = self.handlers.get(&event.kind()) else {
            tracing::debug!("No handler for {:?}", event.kind());
            return;
        };
        for handler in handlers {
            handler.handle(event).await;
        }
    }

    /// Dispatch on its own task; a panicking handler is logged and contained
    pub fn spawn(self: &Arc<Self>, event: GatewayEvent) -> JoinHandle<()> {
        let router = Arc::clone(self);
        let kind = event.kind();
        let task = tokio::spawn(async move { router.dispatch(&event).await });
        tokio::spawn(async move {
            if let Err(e) = task.await {
                tracing::error!("Handler for {:?} panicked: {}", kind, e);
            }
        })
    }
}
