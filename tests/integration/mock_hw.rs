//! Mock adapters for integration tests.
//!
//! Records every output write, delay, fetch and reply so tests can assert
//! on the full interaction history without touching real GPIO or the
//! network.

use std::cell::Cell;

use chatswitch::app::events::AppEvent;
use chatswitch::app::ports::{
    Clock, EventSink, InboundMessage, MessageSource, NetworkStatus, OutputSink, OutputValue, PinId,
};
use embedded_hal::delay::DelayNs;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HwCall {
    Set(PinId, OutputValue),
    Delay(u32),
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub calls: Vec<HwCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes to `pin`, in order.
    pub fn writes_to(&self, pin: PinId) -> Vec<OutputValue> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Set(p, v) if *p == pin => Some(*v),
                _ => None,
            })
            .collect()
    }

    /// Last level written to `pin`, if any.
    pub fn level(&self, pin: PinId) -> Option<bool> {
        self.writes_to(pin).iter().rev().find_map(|v| match v {
            OutputValue::Level(l) => Some(*l),
            OutputValue::Angle(_) => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl OutputSink for MockHardware {
    fn set_output(&mut self, pin: PinId, value: OutputValue) {
        self.calls.push(HwCall::Set(pin, value));
    }
}

impl DelayNs for MockHardware {
    fn delay_ns(&mut self, ns: u32) {
        self.calls.push(HwCall::Delay(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls.push(HwCall::Delay(ms));
    }
}

// ── ScriptedSource ────────────────────────────────────────────

/// Behaves like the Bot API queue: a fetch from `since` confirms (drops)
/// everything below it and returns at most `limit` of the rest.
pub struct ScriptedSource {
    pending: Vec<InboundMessage>,
    limit: usize,
    pub fetches: Vec<u64>,
    pub replies: Vec<(String, String)>,
}

#[allow(dead_code)]
impl ScriptedSource {
    pub fn new(limit: usize) -> Self {
        Self {
            pending: Vec::new(),
            limit,
            fetches: Vec::new(),
            replies: Vec::new(),
        }
    }

    pub fn push(&mut self, sequence_id: u64, chat_id: &str, text: &str) {
        self.pending.push(InboundMessage {
            chat_id: chat_id.to_owned(),
            sender_name: String::from("Tester"),
            text: text.to_owned(),
            sequence_id,
        });
    }

    pub fn reply_texts(&self) -> Vec<&str> {
        self.replies.iter().map(|(_, t)| t.as_str()).collect()
    }
}

impl MessageSource for ScriptedSource {
    fn fetch_pending(&mut self, since_sequence_id: u64) -> Vec<InboundMessage> {
        self.fetches.push(since_sequence_id);
        self.pending.retain(|m| m.sequence_id >= since_sequence_id);
        self.pending.iter().take(self.limit).cloned().collect()
    }

    fn reply(&mut self, chat_id: &str, text: &str) {
        self.replies.push((chat_id.to_owned(), text.to_owned()));
    }
}

// ── MockNet ───────────────────────────────────────────────────

pub struct MockNet {
    pub connected: bool,
    pub ip: Option<String>,
}

impl MockNet {
    pub fn online() -> Self {
        Self {
            connected: true,
            ip: Some(String::from("192.168.1.50")),
        }
    }
}

impl NetworkStatus for MockNet {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn ip_address(&self) -> Option<String> {
        self.ip.clone()
    }
}

// ── MockClock ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockClock {
    now: Cell<u64>,
}

impl MockClock {
    pub fn at(ms: u64) -> Self {
        Self { now: Cell::new(ms) }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
