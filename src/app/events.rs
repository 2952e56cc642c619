//! Outbound application events.
//!
//! The [`PollLoop`](super::service::PollLoop) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  The log adapter turns
//! them into serial output; tests record them.

use super::commands::Command;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The loop has initialised outputs and is ready for commands.
    Started {
        namespace: &'static str,
        authorized_chat_id: String,
    },

    /// A message was pulled from the source (before authorization).
    MessageReceived {
        sequence_id: u64,
        chat_id: String,
        sender_name: String,
        text: String,
    },

    /// Sender is not the authorized chat.  A rejection reply was sent.
    Rejected { sequence_id: u64, chat_id: String },

    /// Text is outside this controller's namespace.  Nothing was sent.
    Ignored { sequence_id: u64 },

    /// A command ran and its reply was sent.
    Executed { sequence_id: u64, command: Command },

    /// One fetched batch was fully handled.
    BatchProcessed { messages: usize, high_water: u64 },
}
