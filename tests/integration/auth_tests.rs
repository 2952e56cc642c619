//! Integration tests for single-chat authorization.
//!
//! Authorization runs before namespace routing: an unknown chat gets the
//! fixed rejection for *any* text and never reaches a controller.

use chatswitch::app::controller::{LightsController, REJECTION_REPLY};
use chatswitch::app::events::AppEvent;
use chatswitch::app::service::PollLoop;
use chatswitch::config::DeviceConfig;

use crate::mock_hw::{MockClock, MockHardware, MockNet, RecordingSink, ScriptedSource};

const OWNER: &str = "42";
const STRANGER: &str = "666";

fn make_app() -> (PollLoop<LightsController>, MockHardware, RecordingSink) {
    let config = DeviceConfig::default().with_authorized_chat(OWNER).unwrap();
    let mut app = PollLoop::new(&config, LightsController::new(&config));
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    app.start(&mut hw, &mut sink);
    hw.clear();
    sink.events.clear();
    (app, hw, sink)
}

#[test]
fn stranger_is_rejected_without_touching_outputs() {
    let (mut app, mut hw, mut sink) = make_app();
    let mut source = ScriptedSource::new(1);
    source.push(1, STRANGER, "/lights_1_on");

    app.tick(&MockClock::at(1001), &mut source, &mut hw, &MockNet::online(), &mut sink);

    assert_eq!(source.replies, vec![(STRANGER.to_owned(), REJECTION_REPLY.to_owned())]);
    assert!(hw.calls.is_empty(), "no blink and no light write");
    assert_eq!(app.controller().is_on(1), Some(false));
    assert!(sink.events.contains(&AppEvent::Rejected {
        sequence_id: 1,
        chat_id: STRANGER.into(),
    }));
}

#[test]
fn stranger_is_rejected_even_outside_namespace() {
    let (mut app, mut hw, mut sink) = make_app();
    let mut source = ScriptedSource::new(10);
    source.push(1, STRANGER, "hello");
    source.push(2, STRANGER, "/ups_press");

    app.tick(&MockClock::at(1001), &mut source, &mut hw, &MockNet::online(), &mut sink);

    assert_eq!(source.reply_texts(), vec![REJECTION_REPLY, REJECTION_REPLY]);
}

#[test]
fn rejection_does_not_disturb_the_rest_of_the_batch() {
    let (mut app, mut hw, mut sink) = make_app();
    let mut source = ScriptedSource::new(10);
    source.push(1, OWNER, "/lights_1_on");
    source.push(2, STRANGER, "/lights_1_off");
    source.push(3, OWNER, "/lights_2_on");

    let handled = app.tick(&MockClock::at(1001), &mut source, &mut hw, &MockNet::online(), &mut sink);

    assert_eq!(handled, 3);
    assert_eq!(
        source.replies,
        vec![
            (OWNER.to_owned(), "✅ Light 1 ON".to_owned()),
            (STRANGER.to_owned(), REJECTION_REPLY.to_owned()),
            (OWNER.to_owned(), "✅ Light 2 ON".to_owned()),
        ]
    );
    assert_eq!(app.controller().is_on(1), Some(true));
    assert_eq!(app.controller().is_on(2), Some(true));
    assert_eq!(app.state().last_seen_sequence_id, 3);
}

#[test]
fn identity_match_is_exact() {
    let (mut app, mut hw, mut sink) = make_app();
    let mut source = ScriptedSource::new(10);
    source.push(1, "420", "/lights_1_on");
    source.push(2, " 42", "/lights_1_on");
    source.push(3, "-42", "/lights_1_on");

    app.tick(&MockClock::at(1001), &mut source, &mut hw, &MockNet::online(), &mut sink);

    assert_eq!(source.reply_texts(), vec![REJECTION_REPLY; 3]);
    assert_eq!(app.controller().is_on(1), Some(false));
}
