//! Integration tests for the UPS button-press personality.

use chatswitch::app::controller::UpsController;
use chatswitch::app::ports::OutputValue;
use chatswitch::app::service::PollLoop;
use chatswitch::config::{ControllerKind, DeviceConfig};

use crate::mock_hw::{HwCall, MockClock, MockHardware, MockNet, RecordingSink, ScriptedSource};

const CHAT: &str = "-100200300";
const SERVO: i32 = 13;
const STATUS_LED: i32 = 2;

fn make_app() -> (PollLoop<UpsController>, MockHardware, RecordingSink) {
    let config = DeviceConfig::default()
        .with_authorized_chat(CHAT)
        .unwrap()
        .with_controller(ControllerKind::Ups);
    let mut app = PollLoop::new(&config, UpsController::new(&config));
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

#[test]
fn start_parks_servo_at_rest() {
    let (_app, hw, _sink) = make_app();
    assert_eq!(hw.writes_to(SERVO), vec![OutputValue::Angle(0)]);
    assert_eq!(hw.level(STATUS_LED), Some(true));
}

#[test]
fn press_swings_holds_returns_and_replies() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.clear();
    let mut source = ScriptedSource::new(1);
    source.push(1, CHAT, "/ups_press");

    app.tick(&MockClock::at(1001), &mut source, &mut hw, &MockNet::online(), &mut sink);

    assert_eq!(
        hw.calls,
        vec![
            HwCall::Set(STATUS_LED, OutputValue::Level(false)),
            HwCall::Delay(100),
            HwCall::Set(STATUS_LED, OutputValue::Level(true)),
            HwCall::Set(SERVO, OutputValue::Angle(90)),
            HwCall::Delay(500),
            HwCall::Set(SERVO, OutputValue::Angle(0)),
        ]
    );
    assert_eq!(source.reply_texts(), vec!["✅ UPS button pressed!"]);
    assert!(!app.controller().is_pressed());
    assert_eq!(app.controller().press_count(), 1);
}

#[test]
fn back_to_back_presses_run_sequentially() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.clear();
    let mut source = ScriptedSource::new(10);
    source.push(1, CHAT, "/ups_press");
    source.push(2, CHAT, "/ups_press");

    app.tick(&MockClock::at(1001), &mut source, &mut hw, &MockNet::online(), &mut sink);

    assert_eq!(
        hw.writes_to(SERVO),
        vec![
            OutputValue::Angle(90),
            OutputValue::Angle(0),
            OutputValue::Angle(90),
            OutputValue::Angle(0),
        ]
    );
    assert_eq!(app.controller().press_count(), 2);
}

#[test]
fn status_reports_rest_and_disconnected_wifi() {
    let (mut app, mut hw, mut sink) = make_app();
    let mut source = ScriptedSource::new(1);
    source.push(1, CHAT, "/ups_status");
    let offline = MockNet { connected: false, ip: None };

    app.tick(&MockClock::at(1001), &mut source, &mut hw, &offline, &mut sink);

    assert_eq!(
        source.reply_texts(),
        vec!["🔌 UPS Controller Status:\nWiFi: Disconnected\nIP: unassigned\nServo: Rest\n"]
    );
}

#[test]
fn lights_commands_are_ignored_by_ups() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.clear();
    let mut source = ScriptedSource::new(1);
    source.push(1, CHAT, "/lights_all_on");

    app.tick(&MockClock::at(1001), &mut source, &mut hw, &MockNet::online(), &mut sink);

    assert!(source.replies.is_empty());
    assert!(hw.calls.is_empty());
    assert_eq!(app.state().last_seen_sequence_id, 1);
}

#[test]
fn unknown_ups_command_points_at_help() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.clear();
    let mut source = ScriptedSource::new(1);
    source.push(1, CHAT, "/ups_shutdown");

    app.tick(&MockClock::at(1001), &mut source, &mut hw, &MockNet::online(), &mut sink);

    assert_eq!(source.reply_texts(), vec!["❓ Unknown command. Try /ups_help"]);
    assert!(hw.writes_to(SERVO).is_empty());
}
