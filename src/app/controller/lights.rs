//! Three-channel LED bank controller.

use embedded_hal::delay::DelayNs;
use log::info;

use crate::app::commands::{ChannelId, Command};
use crate::app::ports::{NetworkStatus, OutputSink, OutputValue, PinId};
use crate::app::router::{CommandRouter, LIGHTS};
use crate::config::DeviceConfig;

use super::{DeviceController, REJECTION_REPLY, connectivity_lines};

/// One addressable light output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub id: ChannelId,
    pub pin: PinId,
    on: bool,
}

impl Channel {
    /// Last level commanded to the pin.
    pub fn is_on(&self) -> bool {
        self.on
    }
}

/// Owns the light channels; ids are 1..=3 in ascending order.
pub struct LightsController {
    router: CommandRouter,
    channels: [Channel; 3],
}

impl LightsController {
    pub fn new(config: &DeviceConfig) -> Self {
        let [p1, p2, p3] = config.light_pins;
        Self {
            router: CommandRouter::new(&LIGHTS),
            channels: [
                Channel { id: 1, pin: p1, on: false },
                Channel { id: 2, pin: p2, on: false },
                Channel { id: 3, pin: p3, on: false },
            ],
        }
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// State of channel `id`, `None` if no such channel.
    pub fn is_on(&self, id: ChannelId) -> Option<bool> {
        self.channels.iter().find(|c| c.id == id).map(Channel::is_on)
    }

    /// Write the pin, then record the state.  Returns `false` for an
    /// unknown channel id (nothing is written).
    fn set_channel(&mut self, id: ChannelId, on: bool, hw: &mut impl OutputSink) -> bool {
        let Some(channel) = self.channels.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        hw.set_output(channel.pin, OutputValue::Level(on));
        channel.on = on;
        info!("→ Light {} {}", id, if on { "ON" } else { "OFF" });
        true
    }

    fn set_all(&mut self, on: bool, hw: &mut impl OutputSink) {
        for id in 1..=self.channels.len() as ChannelId {
            self.set_channel(id, on, hw);
        }
    }

    fn status_text(&self, net: &impl NetworkStatus) -> String {
        let mut out = String::from("💡 Lights Status:\n");
        for c in &self.channels {
            let state = if c.on { "ON ✓" } else { "OFF" };
            out.push_str(&format!("Light {}: {}\n", c.id, state));
        }
        out.push_str(&connectivity_lines(net));
        out
    }
}

impl DeviceController for LightsController {
    fn router(&self) -> &CommandRouter {
        &self.router
    }

    fn init(&mut self, hw: &mut impl OutputSink) {
        self.set_all(false, hw);
        info!("✓ LED pins initialized");
    }

    fn execute(
        &mut self,
        command: &Command,
        hw: &mut (impl OutputSink + DelayNs),
        net: &impl NetworkStatus,
    ) -> String {
        match command {
            Command::TurnOn(id) | Command::TurnOff(id) => {
                let on = matches!(command, Command::TurnOn(_));
                if self.set_channel(*id, on, hw) {
                    format!("✅ Light {} {}", id, if on { "ON" } else { "OFF" })
                } else {
                    self.router.vocabulary().unknown_reply.to_owned()
                }
            }
            Command::TurnOnAll => {
                self.set_all(true, hw);
                "✅ All lights ON".to_owned()
            }
            Command::TurnOffAll => {
                self.set_all(false, hw);
                "✅ All lights OFF".to_owned()
            }
            Command::Status => self.status_text(net),
            Command::Help => self.router.help_text(),
            Command::Unauthorized => REJECTION_REPLY.to_owned(),
            // Not part of this vocabulary.
            Command::Press | Command::Unknown(_) => {
                self.router.vocabulary().unknown_reply.to_owned()
            }
        }
    }
}
