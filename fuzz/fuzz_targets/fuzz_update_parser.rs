//! Fuzz target: `parse_updates`
//!
//! Feeds arbitrary bytes to the `getUpdates` decoder.  It must never
//! panic, and every message it yields must carry an id no higher than
//! the reported high-water update id.
//!
//! cargo fuzz run fuzz_update_parser

#![no_main]

use chatswitch::adapters::telegram::parse_updates;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(batch) = parse_updates(data) {
        for message in &batch.messages {
            assert!(
                Some(message.sequence_id) <= batch.highest_update_id,
                "message id above reported high-water"
            );
        }
        if batch.highest_update_id.is_none() {
            assert!(batch.messages.is_empty());
        }
    }
});
