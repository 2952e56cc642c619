//! Fuzz target: `CommandRouter::parse`
//!
//! Arbitrary UTF-8 text is routed through both vocabularies.  Text outside
//! a namespace must never produce a command, and an unknown command must
//! keep the input verbatim.
//!
//! cargo fuzz run fuzz_command_router

#![no_main]

use chatswitch::app::commands::Command;
use chatswitch::app::router::{CommandRouter, LIGHTS, Route, UPS};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    for vocabulary in [&LIGHTS, &UPS] {
        let router = CommandRouter::new(vocabulary);
        match router.parse(text) {
            Route::NotForThisController => {
                assert!(!text.starts_with(vocabulary.namespace));
            }
            Route::Command(Command::Unknown(raw)) => {
                assert_eq!(raw, text);
                assert!(vocabulary.entries.iter().all(|e| e.literal != text));
            }
            Route::Command(command) => {
                assert!(
                    vocabulary
                        .entries
                        .iter()
                        .any(|e| e.literal == text && e.command == command)
                );
            }
        }
    }
});
