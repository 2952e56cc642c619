//! UPS power-button controller.
//!
//! A hobby servo sits over the UPS front-panel button.  A press swings it
//! to the press angle, holds, and swings back to rest.
//!
//! ## Blocking hold
//!
//! The hold is a plain blocking delay: the whole poll loop stalls for
//! `press_duration_ms`.  There is exactly one task, so nothing else is
//! waiting, and a press always finishes before the next message is
//! looked at.  That ordering is also why there is no "already pressing"
//! check: a second press cannot start while the first is in progress.

use embedded_hal::delay::DelayNs;
use log::info;

use crate::app::commands::Command;
use crate::app::ports::{NetworkStatus, OutputSink, OutputValue, PinId};
use crate::app::router::{CommandRouter, UPS};
use crate::config::DeviceConfig;

use super::{DeviceController, REJECTION_REPLY, connectivity_lines};

pub struct UpsController {
    router: CommandRouter,
    servo_pin: PinId,
    press_angle_deg: u16,
    rest_angle_deg: u16,
    press_duration_ms: u32,
    pressed: bool,
    press_count: u32,
}

impl UpsController {
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            router: CommandRouter::new(&UPS),
            servo_pin: config.servo_pin,
            press_angle_deg: config.press_angle_deg,
            rest_angle_deg: config.rest_angle_deg,
            press_duration_ms: config.press_duration_ms,
            pressed: false,
            press_count: 0,
        }
    }

    /// `true` only while a press is being held.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Completed presses since boot.
    pub fn press_count(&self) -> u32 {
        self.press_count
    }

    fn press(&mut self, hw: &mut (impl OutputSink + DelayNs)) {
        info!("→ Pressing UPS button...");
        self.pressed = true;
        hw.set_output(self.servo_pin, OutputValue::Angle(self.press_angle_deg));
        hw.delay_ms(self.press_duration_ms);
        hw.set_output(self.servo_pin, OutputValue::Angle(self.rest_angle_deg));
        self.pressed = false;
        self.press_count = self.press_count.wrapping_add(1);
        info!("→ Button released");
    }

    fn status_text(&self, net: &impl NetworkStatus) -> String {
        let servo = if self.pressed { "Pressed" } else { "Rest" };
        format!(
            "🔌 UPS Controller Status:\n{}\nServo: {}\n",
            connectivity_lines(net),
            servo
        )
    }
}

impl DeviceController for UpsController {
    fn router(&self) -> &CommandRouter {
        &self.router
    }

    fn init(&mut self, hw: &mut impl OutputSink) {
        hw.set_output(self.servo_pin, OutputValue::Angle(self.rest_angle_deg));
        self.pressed = false;
        info!("✓ Servo initialized at rest position");
    }

    fn execute(
        &mut self,
        command: &Command,
        hw: &mut (impl OutputSink + DelayNs),
        net: &impl NetworkStatus,
    ) -> String {
        match command {
            Command::Press => {
                self.press(hw);
                "✅ UPS button pressed!".to_owned()
            }
            Command::Status => self.status_text(net),
            Command::Help => self.router.help_text(),
            Command::Unauthorized => REJECTION_REPLY.to_owned(),
            // Light commands and unmatched text.
            Command::TurnOn(_)
            | Command::TurnOff(_)
            | Command::TurnOnAll
            | Command::TurnOffAll
            | Command::Unknown(_) => self.router.vocabulary().unknown_reply.to_owned(),
        }
    }
}
