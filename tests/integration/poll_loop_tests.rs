//! Integration tests for the PollLoop → router → LightsController pipeline.
//!
//! These run on the host and drive the full poll/dispatch chain from a
//! scripted message source down to recorded output writes.

use chatswitch::app::commands::Command;
use chatswitch::app::controller::LightsController;
use chatswitch::app::events::AppEvent;
use chatswitch::app::ports::OutputValue;
use chatswitch::app::router::{CommandRouter, LIGHTS};
use chatswitch::app::service::{LoopPhase, MessageOutcome, PollLoop};
use chatswitch::config::DeviceConfig;

use crate::mock_hw::{HwCall, MockClock, MockHardware, MockNet, RecordingSink, ScriptedSource};

const CHAT: &str = "42";
const STATUS_LED: i32 = 2;

fn config() -> DeviceConfig {
    DeviceConfig::default().with_authorized_chat(CHAT).unwrap()
}

fn make_app() -> (PollLoop<LightsController>, MockHardware, RecordingSink) {
    let config = config();
    let mut app = PollLoop::new(&config, LightsController::new(&config));
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    app.start(&mut hw, &mut sink);
    hw.clear();
    sink.events.clear();
    (app, hw, sink)
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn start_drives_lights_low_then_signals_ready() {
    let config = config();
    let mut app = PollLoop::new(&config, LightsController::new(&config));
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    app.start(&mut hw, &mut sink);

    assert_eq!(
        hw.calls,
        vec![
            HwCall::Set(STATUS_LED, OutputValue::Level(false)),
            HwCall::Set(25, OutputValue::Level(false)),
            HwCall::Set(26, OutputValue::Level(false)),
            HwCall::Set(27, OutputValue::Level(false)),
            HwCall::Set(STATUS_LED, OutputValue::Level(true)),
        ]
    );
    assert_eq!(
        sink.events,
        vec![AppEvent::Started {
            namespace: "/lights_",
            authorized_chat_id: CHAT.into(),
        }]
    );
    assert_eq!(app.phase(), LoopPhase::Idle);
}

// ── Single command ────────────────────────────────────────────

#[test]
fn light_on_blinks_status_then_drives_pin_and_replies() {
    let (mut app, mut hw, mut sink) = make_app();
    let mut source = ScriptedSource::new(1);
    source.push(1, CHAT, "/lights_2_on");

    let handled = app.tick(&MockClock::at(1001), &mut source, &mut hw, &MockNet::online(), &mut sink);

    assert_eq!(handled, 1);
    assert_eq!(
        hw.calls,
        vec![
            HwCall::Set(STATUS_LED, OutputValue::Level(false)),
            HwCall::Delay(100),
            HwCall::Set(STATUS_LED, OutputValue::Level(true)),
            HwCall::Set(26, OutputValue::Level(true)),
        ]
    );
    assert_eq!(source.replies, vec![(CHAT.to_owned(), "✅ Light 2 ON".to_owned())]);
    assert_eq!(app.controller().is_on(2), Some(true));
    assert_eq!(app.controller().is_on(1), Some(false));
    assert_eq!(
        sink.events,
        vec![
            AppEvent::MessageReceived {
                sequence_id: 1,
                chat_id: CHAT.into(),
                sender_name: "Tester".into(),
                text: "/lights_2_on".into(),
            },
            AppEvent::Executed { sequence_id: 1, command: Command::TurnOn(2) },
            AppEvent::BatchProcessed { messages: 1, high_water: 1 },
        ]
    );
}

#[test]
fn all_off_after_all_on_clears_every_channel() {
    let (mut app, mut hw, mut sink) = make_app();
    let mut source = ScriptedSource::new(10);
    source.push(3, CHAT, "/lights_all_on");
    source.push(4, CHAT, "/lights_all_off");

    app.tick(&MockClock::at(2000), &mut source, &mut hw, &MockNet::online(), &mut sink);

    assert_eq!(source.reply_texts(), vec!["✅ All lights ON", "✅ All lights OFF"]);
    for pin in [25, 26, 27] {
        assert_eq!(hw.level(pin), Some(false));
    }
    assert!(app.controller().channels().iter().all(|c| !c.is_on()));
}

#[test]
fn status_reflects_state_and_network() {
    let (mut app, mut hw, mut sink) = make_app();
    let mut source = ScriptedSource::new(10);
    source.push(1, CHAT, "/lights_3_on");
    source.push(2, CHAT, "/lights_status");

    app.tick(&MockClock::at(1001), &mut source, &mut hw, &MockNet::online(), &mut sink);

    assert_eq!(
        source.reply_texts()[1],
        "💡 Lights Status:\n\
         Light 1: OFF\n\
         Light 2: OFF\n\
         Light 3: ON ✓\n\
         WiFi: Connected ✓\n\
         IP: 192.168.1.50"
    );
}

#[test]
fn help_lists_the_vocabulary() {
    let (mut app, mut hw, mut sink) = make_app();
    let mut source = ScriptedSource::new(1);
    source.push(1, CHAT, "/lights_help");

    app.tick(&MockClock::at(1001), &mut source, &mut hw, &MockNet::online(), &mut sink);

    assert_eq!(source.reply_texts(), vec![CommandRouter::new(&LIGHTS).help_text().as_str()]);
}

#[test]
fn unknown_in_namespace_gets_help_pointer_and_no_output() {
    let (mut app, mut hw, mut sink) = make_app();
    let mut source = ScriptedSource::new(1);
    source.push(1, CHAT, "/lights_9_on");

    app.tick(&MockClock::at(1001), &mut source, &mut hw, &MockNet::online(), &mut sink);

    assert_eq!(source.reply_texts(), vec!["❓ Unknown command. Try /lights_help"]);
    assert!(hw.writes_to(25).is_empty());
    assert!(hw.writes_to(26).is_empty());
    assert!(hw.writes_to(27).is_empty());
}

#[test]
fn other_namespace_is_silently_dropped_but_consumed() {
    let (mut app, mut hw, mut sink) = make_app();
    let mut source = ScriptedSource::new(1);
    source.push(8, CHAT, "/ups_press");

    let handled = app.tick(&MockClock::at(1001), &mut source, &mut hw, &MockNet::online(), &mut sink);

    assert_eq!(handled, 1);
    assert!(source.replies.is_empty());
    assert!(hw.calls.is_empty(), "no blink, no writes");
    assert_eq!(app.state().last_seen_sequence_id, 8);
    assert!(sink.events.contains(&AppEvent::Ignored { sequence_id: 8 }));
}

// ── Polling cadence and high-water mark ───────────────────────

#[test]
fn batch_raises_high_water_to_its_maximum() {
    let (mut app, mut hw, mut sink) = make_app();
    let mut source = ScriptedSource::new(10);
    source.push(5, CHAT, "/lights_1_on");
    source.push(6, CHAT, "/lights_1_off");
    source.push(7, CHAT, "/lights_status");

    let handled = app.tick(&MockClock::at(1001), &mut source, &mut hw, &MockNet::online(), &mut sink);

    assert_eq!(handled, 3);
    assert_eq!(app.state().last_seen_sequence_id, 7);
    assert_eq!(source.fetches, vec![1, 8], "next fetch starts at max + 1");
}

#[test]
fn drain_refetches_until_empty() {
    let (mut app, mut hw, mut sink) = make_app();
    let mut source = ScriptedSource::new(1);
    source.push(5, CHAT, "/lights_1_on");
    source.push(6, CHAT, "/lights_2_on");
    source.push(7, CHAT, "/lights_3_on");

    let handled = app.tick(&MockClock::at(1001), &mut source, &mut hw, &MockNet::online(), &mut sink);

    assert_eq!(handled, 3);
    assert_eq!(source.fetches, vec![1, 6, 7, 8]);
    assert_eq!(source.reply_texts(), vec!["✅ Light 1 ON", "✅ Light 2 ON", "✅ Light 3 ON"]);
    assert_eq!(app.phase(), LoopPhase::Idle);
}

#[test]
fn polls_only_after_interval_elapses() {
    let (mut app, mut hw, mut sink) = make_app();
    let net = MockNet::online();
    let clock = MockClock::at(1000);
    let mut source = ScriptedSource::new(1);

    assert_eq!(app.tick(&clock, &mut source, &mut hw, &net, &mut sink), 0);
    assert!(source.fetches.is_empty(), "exactly the interval is not enough");

    clock.advance(1);
    app.tick(&clock, &mut source, &mut hw, &net, &mut sink);
    assert_eq!(source.fetches.len(), 1);
    assert_eq!(app.state().last_poll_ms, 1001);

    clock.advance(500);
    app.tick(&clock, &mut source, &mut hw, &net, &mut sink);
    assert_eq!(source.fetches.len(), 1);

    clock.advance(501);
    app.tick(&clock, &mut source, &mut hw, &net, &mut sink);
    assert_eq!(source.fetches.len(), 2);
}

#[test]
fn nothing_pending_leaves_state_untouched() {
    let (mut app, mut hw, mut sink) = make_app();
    let mut source = ScriptedSource::new(1);

    let handled = app.tick(&MockClock::at(5000), &mut source, &mut hw, &MockNet::online(), &mut sink);

    assert_eq!(handled, 0);
    assert_eq!(app.state().last_seen_sequence_id, 0);
    assert!(hw.calls.is_empty());
    assert!(sink.events.is_empty());
}

#[test]
fn message_ids_are_never_processed_twice() {
    let (mut app, mut hw, mut sink) = make_app();
    let net = MockNet::online();
    let clock = MockClock::at(1001);
    let mut source = ScriptedSource::new(10);
    source.push(10, CHAT, "/lights_1_on");
    app.tick(&clock, &mut source, &mut hw, &net, &mut sink);

    // A late duplicate of an already handled id.
    source.push(10, CHAT, "/lights_1_on");
    source.push(11, CHAT, "/lights_1_off");
    clock.advance(1001);
    app.tick(&clock, &mut source, &mut hw, &net, &mut sink);

    assert_eq!(source.reply_texts(), vec!["✅ Light 1 ON", "✅ Light 1 OFF"]);
}

#[test]
fn handle_message_reports_outcomes() {
    let (mut app, mut hw, mut sink) = make_app();
    let net = MockNet::online();
    let mut source = ScriptedSource::new(1);
    let msg = |id, chat: &str, text: &str| chatswitch::app::ports::InboundMessage {
        chat_id: chat.into(),
        sender_name: String::new(),
        text: text.into(),
        sequence_id: id,
    };

    let cases = [
        (msg(1, CHAT, "/lights_1_on"), MessageOutcome::Executed),
        (msg(2, CHAT, "/lights_1_ON"), MessageOutcome::UnknownCommand),
        (msg(3, CHAT, "/ups_status"), MessageOutcome::WrongNamespace),
        (msg(4, "7", "/lights_1_on"), MessageOutcome::Unauthorized),
    ];
    for (message, expected) in cases {
        assert_eq!(app.handle_message(&message, &mut source, &mut hw, &net, &mut sink), expected);
    }
}
