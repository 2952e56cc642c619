//! GPIO pin assignments for the ChatSwitch controller boards.
//!
//! Default values only. [`DeviceConfig`](crate::config::DeviceConfig)
//! copies these at construction so a board variant can override them
//! without touching the drivers.

// ---------------------------------------------------------------------------
// Lights controller (three LED channels)
// ---------------------------------------------------------------------------

/// Digital output: light channel 1 (active HIGH).
pub const LIGHT_1_GPIO: i32 = 25;
/// Digital output: light channel 2 (active HIGH).
pub const LIGHT_2_GPIO: i32 = 26;
/// Digital output: light channel 3 (active HIGH).
pub const LIGHT_3_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// UPS controller (hobby servo on the power button)
// ---------------------------------------------------------------------------

/// LEDC PWM output driving the servo signal line.
pub const SERVO_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

/// On-board status LED. HIGH = ready, blinks LOW while a command is processed.
pub const STATUS_LED_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// Servo frame rate (standard 50 Hz hobby servo).
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// LEDC timer resolution for the servo channel.  14 bits gives ~1.2 µs steps
/// across the 20 ms frame.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
