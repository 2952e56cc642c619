//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART in production).  Every line starts with a
//! fixed tag so serial captures can be grepped.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { namespace, authorized_chat_id } => {
                info!("START | namespace={} | chat={}", namespace, authorized_chat_id);
            }
            AppEvent::MessageReceived { sequence_id, chat_id, sender_name, text } => {
                info!(
                    "MSG   | #{} | from={} ({}) | text={:?}",
                    sequence_id, sender_name, chat_id, text
                );
            }
            AppEvent::Rejected { sequence_id, chat_id } => {
                warn!("AUTH  | #{} | rejected chat={}", sequence_id, chat_id);
            }
            AppEvent::Ignored { sequence_id } => {
                debug!("SKIP  | #{} | outside namespace", sequence_id);
            }
            AppEvent::Executed { sequence_id, command } => {
                info!("EXEC  | #{} | {}", sequence_id, command.name());
            }
            AppEvent::BatchProcessed { messages, high_water } => {
                debug!("BATCH | {} message(s) | high_water={}", messages, high_water);
            }
        }
    }
}
