//! Commands the application core understands.
//!
//! Built fresh for every inbound message by the
//! [`CommandRouter`](super::router::CommandRouter) (or by the poll loop
//! itself, for [`Command::Unauthorized`]) and consumed by a
//! [`DeviceController`](super::controller::DeviceController).

/// Light channel number, 1-based.
pub type ChannelId = u8;

/// Closed set of actions a controller can be asked to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Drive one light channel HIGH.
    TurnOn(ChannelId),
    /// Drive one light channel LOW.
    TurnOff(ChannelId),
    /// Every light channel HIGH, ascending channel order.
    TurnOnAll,
    /// Every light channel LOW, ascending channel order.
    TurnOffAll,
    /// Press-and-release the actuator.
    Press,
    /// Report device state.
    Status,
    /// List the controller's commands.
    Help,
    /// Sender failed authorization; only a fixed rejection is produced.
    Unauthorized,
    /// In-namespace text that matches no literal.  The raw text is kept for
    /// logging only and is never echoed back.
    Unknown(String),
}

impl Command {
    /// Short tag for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TurnOn(_) => "turn_on",
            Self::TurnOff(_) => "turn_off",
            Self::TurnOnAll => "turn_on_all",
            Self::TurnOffAll => "turn_off_all",
            Self::Press => "press",
            Self::Status => "status",
            Self::Help => "help",
            Self::Unauthorized => "unauthorized",
            Self::Unknown(_) => "unknown",
        }
    }
}
