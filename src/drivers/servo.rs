//! Hobby servo driver on an LEDC channel.
//!
//! Position is encoded as pulse width inside a fixed 20 ms frame:
//!
//! ```text
//!   0°  ──▶  500 µs
//!  90°  ──▶ 1450 µs
//! 180°  ──▶ 2400 µs
//! ```

use log::debug;

use crate::drivers::hw_init;
use crate::pins;

/// Pulse width at 0°.
pub const MIN_PULSE_US: u32 = 500;
/// Pulse width at 180°.
pub const MAX_PULSE_US: u32 = 2400;
pub const MAX_ANGLE_DEG: u16 = 180;

/// LEDC duty value for `angle_deg` at the given frame rate and resolution.
///
/// Angles above 180° are clamped.
pub fn angle_to_duty(angle_deg: u16, freq_hz: u32, resolution_bits: u32) -> u32 {
    let angle = u32::from(angle_deg.min(MAX_ANGLE_DEG));
    let pulse_us = MIN_PULSE_US + (MAX_PULSE_US - MIN_PULSE_US) * angle / u32::from(MAX_ANGLE_DEG);
    let period_us = 1_000_000 / freq_hz;
    let full_scale = 1u64 << resolution_bits;
    (u64::from(pulse_us) * full_scale / u64::from(period_us)) as u32
}

pub struct ServoDriver {
    pin: i32,
    channel: u32,
    angle_deg: Option<u16>,
}

impl ServoDriver {
    pub fn new(pin: i32) -> Self {
        Self {
            pin,
            channel: hw_init::LEDC_CH_SERVO,
            angle_deg: None,
        }
    }

    pub fn pin(&self) -> i32 {
        self.pin
    }

    /// Last commanded angle, `None` before the first move.
    pub fn angle(&self) -> Option<u16> {
        self.angle_deg
    }

    pub fn set_angle(&mut self, angle_deg: u16) {
        let duty = angle_to_duty(angle_deg, pins::SERVO_PWM_FREQ_HZ, pins::SERVO_PWM_RESOLUTION_BITS);
        hw_init::ledc_set(self.channel, duty);
        self.angle_deg = Some(angle_deg.min(MAX_ANGLE_DEG));
        debug!("servo: GPIO{} -> {}° (duty {})", self.pin, angle_deg, duty);
    }
}
