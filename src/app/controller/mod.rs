//! Device controllers — authoritative in-memory device state.
//!
//! A controller executes one [`Command`] at a time against the hardware
//! ports and returns the reply text.  It is the only writer of device
//! state, and it updates state *after* issuing the physical write so a
//! channel is never reported ON while its pin is still LOW.
//!
//! | Controller         | Namespace  | Outputs                    |
//! |--------------------|------------|----------------------------|
//! | [`LightsController`] | `/lights_` | three GPIO light channels  |
//! | [`UpsController`]    | `/ups_`    | one servo on a push button |

mod lights;
mod ups;

pub use lights::{Channel, LightsController};
pub use ups::UpsController;

use embedded_hal::delay::DelayNs;

use super::commands::Command;
use super::ports::{NetworkStatus, OutputSink};
use super::router::CommandRouter;

/// Fixed reply to any sender other than the authorized chat.
pub const REJECTION_REPLY: &str = "⛔ Unauthorized access";

/// Common surface of both controller personalities.
pub trait DeviceController {
    /// The vocabulary this controller answers to.
    fn router(&self) -> &CommandRouter;

    /// Drive every output to its boot state.
    fn init(&mut self, hw: &mut impl OutputSink);

    /// Execute `command` and return the reply text.
    ///
    /// `hw` provides both the output sink and the blocking delay used for
    /// timed actuations.  Writes are assumed to succeed; there is no
    /// failure path.
    fn execute(
        &mut self,
        command: &Command,
        hw: &mut (impl OutputSink + DelayNs),
        net: &impl NetworkStatus,
    ) -> String;
}

/// `WiFi: ...` and `IP: ...` lines shared by both status replies.
pub(crate) fn connectivity_lines(net: &impl NetworkStatus) -> String {
    let wifi = if net.is_connected() {
        "Connected ✓"
    } else {
        "Disconnected"
    };
    let ip = net.ip_address().unwrap_or_else(|| String::from("unassigned"));
    format!("WiFi: {wifi}\nIP: {ip}")
}
