//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the servo driver and exposes GPIO and servo outputs through
//! [`OutputSink`], plus the blocking [`DelayNs`] the controllers use for
//! timed actuations.  This is the only module in the system that touches
//! actual hardware.  On non-espidf targets the underlying drivers use
//! cfg-gated simulation stubs.

use embedded_hal::delay::DelayNs;
use log::warn;

use crate::app::ports::{OutputSink, OutputValue, PinId};
use crate::drivers::hw_init;
use crate::drivers::servo::ServoDriver;

/// Concrete adapter that combines all outputs behind port traits.
pub struct HardwareAdapter {
    servo: Option<ServoDriver>,
}

impl HardwareAdapter {
    /// `servo` is `None` on boards without one (lights controller).
    pub fn new(servo: Option<ServoDriver>) -> Self {
        Self { servo }
    }

    pub fn servo(&self) -> Option<&ServoDriver> {
        self.servo.as_ref()
    }
}

// ── OutputSink implementation ─────────────────────────────────

impl OutputSink for HardwareAdapter {
    fn set_output(&mut self, pin: PinId, value: OutputValue) {
        match value {
            OutputValue::Level(high) => hw_init::gpio_write(pin, high),
            OutputValue::Angle(deg) => match self.servo.as_mut() {
                Some(servo) if servo.pin() == pin => servo.set_angle(deg),
                _ => warn!("hw: no servo on GPIO{}, angle {}° dropped", pin, deg),
            },
        }
    }
}

// ── DelayNs implementation ────────────────────────────────────

#[cfg(target_os = "espidf")]
impl DelayNs for HardwareAdapter {
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_svc::hal::delay::Ets::delay_us(ns.div_ceil(1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        // Yields to the scheduler (and the idle task's watchdog feed).
        esp_idf_svc::hal::delay::FreeRtos::delay_ms(ms);
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for HardwareAdapter {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
