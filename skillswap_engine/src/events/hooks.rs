use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{ConversationCreatedEvent, EventHandler, EventProducer, Handler, MessageSentEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub conversation_created_producer: Vec<EventProducer<ConversationCreatedEvent>>,
    pub message_sent_producer: Vec<EventProducer<MessageSentEvent>>,
}

pub struct EventHandlers {
    pub on_conversation_created: Option<EventHandler<ConversationCreatedEvent>>,
    pub on_message_sent: Option<EventHandler<MessageSentEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_conversation_created = hooks.on_conversation_created.map(|f| EventHandler::new(buffer_size, f));
        let on_message_sent = hooks.on_message_sent.map(|f| EventHandler::new(buffer_size, f));
        Self { on_conversation_created, on_message_sent }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_conversation_created {
            result.conversation_created_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_message_sent {
            result.message_sent_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_conversation_created {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_message_sent {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_conversation_created: Option<Handler<ConversationCreatedEvent>>,
    pub on_message_sent: Option<Handler<MessageSentEvent>>,
}

impl EventHooks {
    pub fn on_conversation_created<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(ConversationCreatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_conversation_created = Some(Arc::new(f));
        self
    }

    pub fn on_message_sent<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(MessageSentEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_message_sent = Some(Arc::new(f));
        self
    }
}
