//! Poll loop — the cooperative scheduler at the core of the firmware.
//!
//! [`PollLoop`] owns the controller, the authorization guard and the poll
//! bookkeeping.  All I/O flows through port traits passed in on each
//! call, so the whole pipeline runs against mocks on the host.
//!
//! ```text
//!                 ┌──────────────────────────────────────────┐
//!  MessageSource ─▶  Guard ─▶ Router ─▶ DeviceController     │─▶ OutputSink
//!        ▲        │              PollLoop                    │
//!        └─reply──└──────────────────────────────────────────┘─▶ EventSink
//! ```
//!
//! ## Tick contract
//!
//! `Idle → Polling → Dispatching → Polling → … → Idle`
//!
//! When more than `poll_interval_ms` has passed since the last poll, the
//! loop fetches from `last_seen_sequence_id + 1` and keeps re-fetching
//! until a batch comes back empty (drain-until-empty).  Every message in a
//! batch is handled in arrival order, then the high-water mark is raised
//! to the batch maximum.  All calls block; a stalled source or actuator
//! stalls the tick.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::DeviceConfig;

use super::commands::Command;
use super::controller::DeviceController;
use super::events::AppEvent;
use super::guard::AuthorizationGuard;
use super::ports::{Clock, EventSink, InboundMessage, MessageSource, NetworkStatus, OutputSink, OutputValue, PinId};
use super::router::Route;

// ───────────────────────────────────────────────────────────────
// Loop state
// ───────────────────────────────────────────────────────────────

/// Where the loop is within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Waiting for the poll interval to elapse.
    Idle,
    /// A fetch is in flight (blocking).
    Polling,
    /// Handling the messages of a fetched batch.
    Dispatching,
}

/// Poll bookkeeping.  Initialised once, never reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollState {
    /// Clock reading taken when the last drain finished.
    pub last_poll_ms: u64,
    /// Highest sequence id handled so far (0 = none yet).
    pub last_seen_sequence_id: u64,
}

/// How one message was disposed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Wrong chat identity; rejection reply sent.
    Unauthorized,
    /// Outside this controller's namespace; dropped without reply.
    WrongNamespace,
    /// In namespace but no literal matched; help pointer sent.
    UnknownCommand,
    /// A recognised command ran and its reply was sent.
    Executed,
}

// ───────────────────────────────────────────────────────────────
// PollLoop
// ───────────────────────────────────────────────────────────────

pub struct PollLoop<C> {
    controller: C,
    guard: AuthorizationGuard,
    state: PollState,
    phase: LoopPhase,
    poll_interval_ms: u64,
    status_led_pin: PinId,
    processing_blink_ms: u32,
}

impl<C: DeviceController> PollLoop<C> {
    /// Build the loop around `controller`.
    ///
    /// Does **not** touch any output; call [`start`](Self::start) next.
    pub fn new(config: &DeviceConfig, controller: C) -> Self {
        Self {
            controller,
            guard: AuthorizationGuard::new(config.authorized_chat_id.as_str()),
            state: PollState::default(),
            phase: LoopPhase::Idle,
            poll_interval_ms: u64::from(config.poll_interval_ms),
            status_led_pin: config.status_led_pin,
            processing_blink_ms: config.processing_blink_ms,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put every output in its boot state and light the ready LED.
    pub fn start(&mut self, hw: &mut impl OutputSink, sink: &mut impl EventSink) {
        hw.set_output(self.status_led_pin, OutputValue::Level(false));
        self.controller.init(hw);
        hw.set_output(self.status_led_pin, OutputValue::Level(true));

        let namespace = self.controller.router().namespace();
        info!("Authorized Chat ID: {}", self.guard.authorized_chat_id());
        info!("Listening for {} commands...", namespace);
        sink.emit(&AppEvent::Started {
            namespace,
            authorized_chat_id: self.guard.authorized_chat_id().to_owned(),
        });
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one loop iteration.  Returns the number of messages handled
    /// (0 when the interval has not elapsed or nothing was pending).
    pub fn tick(
        &mut self,
        clock: &impl Clock,
        source: &mut impl MessageSource,
        hw: &mut (impl OutputSink + DelayNs),
        net: &impl NetworkStatus,
        sink: &mut impl EventSink,
    ) -> usize {
        let now = clock.now_ms();
        if now.saturating_sub(self.state.last_poll_ms) <= self.poll_interval_ms {
            return 0;
        }

        let mut handled = 0;
        loop {
            self.phase = LoopPhase::Polling;
            let since = self.state.last_seen_sequence_id.saturating_add(1);
            let batch = source.fetch_pending(since);

            // Anything below `since` was already handled; a source that
            // re-delivers it must not get it processed twice.
            let fresh: Vec<&InboundMessage> =
                batch.iter().filter(|m| m.sequence_id >= since).collect();
            if fresh.is_empty() {
                if !batch.is_empty() {
                    warn!("Source re-delivered {} already handled message(s)", batch.len());
                }
                break;
            }

            self.phase = LoopPhase::Dispatching;
            let mut high_water = self.state.last_seen_sequence_id;
            for message in &fresh {
                self.handle_message(message, source, hw, net, sink);
                high_water = high_water.max(message.sequence_id);
            }
            self.state.last_seen_sequence_id = high_water;
            handled += fresh.len();

            debug!("Batch of {} handled, high-water {}", fresh.len(), high_water);
            sink.emit(&AppEvent::BatchProcessed {
                messages: fresh.len(),
                high_water,
            });
        }

        self.state.last_poll_ms = clock.now_ms();
        self.phase = LoopPhase::Idle;
        handled
    }

    /// Guard → router → controller → reply for a single message.
    ///
    /// Never fails: every outcome is a reply or a silent drop, and one bad
    /// message cannot affect the rest of its batch.
    pub fn handle_message(
        &mut self,
        message: &InboundMessage,
        source: &mut impl MessageSource,
        hw: &mut (impl OutputSink + DelayNs),
        net: &impl NetworkStatus,
        sink: &mut impl EventSink,
    ) -> MessageOutcome {
        sink.emit(&AppEvent::MessageReceived {
            sequence_id: message.sequence_id,
            chat_id: message.chat_id.clone(),
            sender_name: message.sender_name.clone(),
            text: message.text.clone(),
        });

        if !self.guard.is_authorized(message) {
            warn!("⚠️  Unauthorized user! Ignoring.");
            let reply = self.controller.execute(&Command::Unauthorized, hw, net);
            source.reply(&message.chat_id, &reply);
            sink.emit(&AppEvent::Rejected {
                sequence_id: message.sequence_id,
                chat_id: message.chat_id.clone(),
            });
            return MessageOutcome::Unauthorized;
        }

        let command = match self.controller.router().parse(&message.text) {
            Route::NotForThisController => {
                debug!("Not for this controller, ignoring.");
                sink.emit(&AppEvent::Ignored {
                    sequence_id: message.sequence_id,
                });
                return MessageOutcome::WrongNamespace;
            }
            Route::Command(command) => command,
        };

        self.blink_status(hw);
        let reply = self.controller.execute(&command, hw, net);
        source.reply(&message.chat_id, &reply);

        let outcome = if matches!(command, Command::Unknown(_)) {
            MessageOutcome::UnknownCommand
        } else {
            MessageOutcome::Executed
        };
        sink.emit(&AppEvent::Executed {
            sequence_id: message.sequence_id,
            command,
        });
        outcome
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    // ── Internal ──────────────────────────────────────────────

    /// Brief LOW pulse on the ready LED to acknowledge a command.
    fn blink_status(&self, hw: &mut (impl OutputSink + DelayNs)) {
        if self.processing_blink_ms == 0 {
            return;
        }
        hw.set_output(self.status_led_pin, OutputValue::Level(false));
        hw.delay_ms(self.processing_blink_ms);
        hw.set_output(self.status_led_pin, OutputValue::Level(true));
    }
}
