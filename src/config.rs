//! Device configuration parameters
//!
//! Every tunable of the ChatSwitch firmware lives in [`DeviceConfig`].
//! Defaults reproduce the stock board wiring and timings; secrets (bot
//! token, authorized chat, WiFi credentials) are baked in at build time
//! from `CHATSWITCH_*` environment variables, since nothing is persisted
//! on the device.

use core::fmt;

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::pins;

/// Telegram bot tokens are `<bot id>:<35 char secret>`, well under 64 bytes.
pub const MAX_TOKEN_LEN: usize = 64;
/// Telegram chat ids fit in a signed 64-bit integer (20 chars with sign).
pub const MAX_CHAT_ID_LEN: usize = 24;
pub const MAX_SSID_LEN: usize = 32;
pub const MAX_PASSWORD_LEN: usize = 64;

// ---------------------------------------------------------------------------
// Controller variant
// ---------------------------------------------------------------------------

/// Which firmware personality this board runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerKind {
    /// Three-channel LED bank, `/lights_` namespace.
    Lights,
    /// Servo pressing a UPS power button, `/ups_` namespace.
    Ups,
}

impl ControllerKind {
    /// Parse the `CHATSWITCH_CONTROLLER` build variable.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lights" => Some(Self::Lights),
            "ups" => Some(Self::Ups),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from building or validating a [`DeviceConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// A string value does not fit its fixed-capacity buffer.
    TooLong(&'static str),
    /// An override document could not be deserialised.
    Malformed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::TooLong(field) => write!(f, "{} too long", field),
            Self::Malformed => write!(f, "malformed config document"),
        }
    }
}

// ---------------------------------------------------------------------------
// DeviceConfig
// ---------------------------------------------------------------------------

/// Core device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    // --- Identity ---
    /// Firmware personality (selects vocabulary and controller).
    pub controller: ControllerKind,
    /// Telegram bot API token.
    pub bot_token: String<MAX_TOKEN_LEN>,
    /// The single chat allowed to issue commands.
    pub authorized_chat_id: String<MAX_CHAT_ID_LEN>,

    // --- WiFi ---
    pub wifi_ssid: String<MAX_SSID_LEN>,
    pub wifi_password: String<MAX_PASSWORD_LEN>,

    // --- Pins ---
    /// Output pins for light channels 1..=3, in channel order.
    pub light_pins: [i32; 3],
    /// Servo signal pin (UPS controller).
    pub servo_pin: i32,
    /// Ready / activity LED.
    pub status_led_pin: i32,

    // --- Actuator ---
    /// Servo angle that depresses the button (degrees, 0-180).
    pub press_angle_deg: u16,
    /// Servo angle clear of the button (degrees, 0-180).
    pub rest_angle_deg: u16,
    /// How long the button is held down (milliseconds).
    pub press_duration_ms: u32,

    // --- Timing ---
    /// Minimum time between update polls (milliseconds).
    pub poll_interval_ms: u32,
    /// Status LED off-time while a command is processed (milliseconds).
    pub processing_blink_ms: u32,
    /// Maximum updates requested per fetch (Telegram allows 1-100).
    pub fetch_limit: u8,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            controller: ControllerKind::Lights,
            bot_token: String::new(),
            authorized_chat_id: String::new(),

            wifi_ssid: String::new(),
            wifi_password: String::new(),

            light_pins: [pins::LIGHT_1_GPIO, pins::LIGHT_2_GPIO, pins::LIGHT_3_GPIO],
            servo_pin: pins::SERVO_GPIO,
            status_led_pin: pins::STATUS_LED_GPIO,

            press_angle_deg: 90,
            rest_angle_deg: 0,
            press_duration_ms: 500,

            poll_interval_ms: 1000, // 1 Hz
            processing_blink_ms: 100,
            fetch_limit: 1,
        }
    }
}

impl DeviceConfig {
    /// Build the configuration from `CHATSWITCH_*` variables captured at
    /// compile time, then validate it.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(kind) = option_env!("CHATSWITCH_CONTROLLER") {
            let kind = ControllerKind::parse(kind).ok_or(ConfigError::ValidationFailed(
                "CHATSWITCH_CONTROLLER must be `lights` or `ups`",
            ))?;
            config = config.with_controller(kind);
        }
        fill(&mut config.bot_token, option_env!("CHATSWITCH_BOT_TOKEN"), "bot_token")?;
        fill(
            &mut config.authorized_chat_id,
            option_env!("CHATSWITCH_CHAT_ID"),
            "authorized_chat_id",
        )?;
        fill(&mut config.wifi_ssid, option_env!("CHATSWITCH_WIFI_SSID"), "wifi_ssid")?;
        fill(
            &mut config.wifi_password,
            option_env!("CHATSWITCH_WIFI_PASSWORD"),
            "wifi_password",
        )?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON override document.  Missing fields keep their defaults.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the authorized chat id.
    pub fn with_authorized_chat(mut self, chat_id: &str) -> Result<Self, ConfigError> {
        fill(&mut self.authorized_chat_id, Some(chat_id), "authorized_chat_id")?;
        Ok(self)
    }

    /// Replace the controller personality.
    pub fn with_controller(mut self, controller: ControllerKind) -> Self {
        self.controller = controller;
        self
    }

    /// Reject configurations that would leave the device unsafe or unreachable.
    /// Values are never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.authorized_chat_id.is_empty() {
            return Err(ConfigError::ValidationFailed("authorized_chat_id must be set"));
        }
        if !is_chat_id(&self.authorized_chat_id) {
            return Err(ConfigError::ValidationFailed(
                "authorized_chat_id must be a numeric Telegram chat id",
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll_interval_ms must be > 0"));
        }
        if self.press_duration_ms == 0 {
            return Err(ConfigError::ValidationFailed("press_duration_ms must be > 0"));
        }
        if self.press_angle_deg > 180 || self.rest_angle_deg > 180 {
            return Err(ConfigError::ValidationFailed("servo angles must be within 0-180"));
        }
        if self.press_angle_deg == self.rest_angle_deg {
            return Err(ConfigError::ValidationFailed(
                "press_angle_deg and rest_angle_deg must differ",
            ));
        }
        if self.fetch_limit == 0 || self.fetch_limit > 100 {
            return Err(ConfigError::ValidationFailed("fetch_limit must be within 1-100"));
        }
        let [a, b, c] = self.light_pins;
        if a == b || b == c || a == c {
            return Err(ConfigError::ValidationFailed("light_pins must be distinct"));
        }
        if self.light_pins.contains(&self.status_led_pin) || self.status_led_pin == self.servo_pin
        {
            return Err(ConfigError::ValidationFailed(
                "status_led_pin collides with an output pin",
            ));
        }
        Ok(())
    }
}

fn fill<const N: usize>(
    dst: &mut String<N>,
    src: Option<&str>,
    field: &'static str,
) -> Result<(), ConfigError> {
    if let Some(value) = src {
        dst.clear();
        dst.push_str(value).map_err(|_| ConfigError::TooLong(field))?;
    }
    Ok(())
}

/// Optional leading `-` (group chats) followed by at least one digit.
fn is_chat_id(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
