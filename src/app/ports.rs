//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PollLoop / DeviceController (domain)
//! ```
//!
//! Driven adapters (GPIO, servo, Telegram, WiFi, log) implement these
//! traits.  The domain consumes them via generics, so the core never
//! touches hardware or the network directly.
//!
//! Blocking delays go through [`embedded_hal::delay::DelayNs`] rather than
//! a port of our own.
//!
//! ## Contract notes
//!
//! - Every port here is **infallible** from the domain's point of view.
//!   Adapters log their own failures and degrade (empty batch, dropped
//!   reply); nothing bubbles into message handling.
//! - Every call is **blocking**.  The loop is a single task and a stalled
//!   adapter stalls the device.

use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Output sink (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Opaque handle for a physical output (a GPIO number on ESP32).
pub type PinId = i32;

/// What to drive an output to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputValue {
    /// Digital level, `true` = HIGH.
    Level(bool),
    /// Servo position in degrees (0–180).
    Angle(u16),
}

/// Write-side port: the domain calls this to drive outputs.
///
/// Assumed to always apply the requested value; there is no read-back.
pub trait OutputSink {
    fn set_output(&mut self, pin: PinId, value: OutputValue);
}

// ───────────────────────────────────────────────────────────────
// Message source (driven adapter: chat service ↔ domain)
// ───────────────────────────────────────────────────────────────

/// One inbound chat message, valid for a single poll tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Identity of the chat the message came from.
    pub chat_id: String,
    /// Display name of the sender.  Logged, never trusted.
    pub sender_name: String,
    /// Raw command text.
    pub text: String,
    /// Monotonic per-bot sequence number.
    pub sequence_id: u64,
}

/// The remote chat service as the poll loop sees it.
pub trait MessageSource {
    /// Return pending messages with `sequence_id >= since_sequence_id`, in
    /// arrival order.  Empty when nothing is pending.
    fn fetch_pending(&mut self, since_sequence_id: u64) -> Vec<InboundMessage>;

    /// Send `text` to `chat_id`.  Fire-and-forget.
    fn reply(&mut self, chat_id: &str, text: &str);
}

// ───────────────────────────────────────────────────────────────
// Network status (driven adapter: WiFi → domain)
// ───────────────────────────────────────────────────────────────

/// Connectivity facts reported in status replies.  The domain only reads
/// them; bringing the link up is the WiFi adapter's job.
pub trait NetworkStatus {
    fn is_connected(&self) -> bool;

    /// Station IPv4 address in dotted form, if one is assigned.
    fn ip_address(&self) -> Option<String>;
}

// ───────────────────────────────────────────────────────────────
// Clock (driven adapter: system timer → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.
/// Adapters decide where they go (serial log, test recorder, ...).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
