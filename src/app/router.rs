//! Command vocabulary and text → command routing.
//!
//! Several controllers share one bot, so every controller owns a
//! namespace prefix and ignores everything outside it.  Inside the
//! namespace, matching is exact and case-sensitive against a static
//! literal table.  Channel numbers are part of the literal, never parsed.
//!
//! ```text
//!  "/lights_2_on"  ──▶ Route::Command(TurnOn(2))
//!  "/lights_2_ON"  ──▶ Route::Command(Unknown("/lights_2_ON"))
//!  "/ups_press"    ──▶ Route::NotForThisController   (lights router)
//! ```

use super::commands::Command;

// ───────────────────────────────────────────────────────────────
// Vocabulary tables
// ───────────────────────────────────────────────────────────────

/// One recognised literal.
#[derive(Debug)]
pub struct Entry {
    pub literal: &'static str,
    pub command: Command,
    /// One-line description used in the help listing.
    pub summary: &'static str,
}

/// Everything a controller recognises.
#[derive(Debug)]
pub struct Vocabulary {
    /// Messages not starting with this are for another controller.
    pub namespace: &'static str,
    /// First line of the help reply.
    pub help_header: &'static str,
    /// Reply for in-namespace text that matches no literal.
    pub unknown_reply: &'static str,
    /// Literals in help-listing order.
    pub entries: &'static [Entry],
}

pub static LIGHTS: Vocabulary = Vocabulary {
    namespace: "/lights_",
    help_header: "💡 Lights Controller Commands:",
    unknown_reply: "❓ Unknown command. Try /lights_help",
    entries: &[
        Entry { literal: "/lights_1_on", command: Command::TurnOn(1), summary: "Turn light 1 ON" },
        Entry { literal: "/lights_1_off", command: Command::TurnOff(1), summary: "Turn light 1 OFF" },
        Entry { literal: "/lights_2_on", command: Command::TurnOn(2), summary: "Turn light 2 ON" },
        Entry { literal: "/lights_2_off", command: Command::TurnOff(2), summary: "Turn light 2 OFF" },
        Entry { literal: "/lights_3_on", command: Command::TurnOn(3), summary: "Turn light 3 ON" },
        Entry { literal: "/lights_3_off", command: Command::TurnOff(3), summary: "Turn light 3 OFF" },
        Entry { literal: "/lights_all_on", command: Command::TurnOnAll, summary: "All lights ON" },
        Entry { literal: "/lights_all_off", command: Command::TurnOffAll, summary: "All lights OFF" },
        Entry { literal: "/lights_status", command: Command::Status, summary: "Get status" },
        Entry { literal: "/lights_help", command: Command::Help, summary: "Show this help" },
    ],
};

pub static UPS: Vocabulary = Vocabulary {
    namespace: "/ups_",
    help_header: "🤖 UPS Controller Commands:",
    unknown_reply: "❓ Unknown command. Try /ups_help",
    entries: &[
        Entry { literal: "/ups_press", command: Command::Press, summary: "Press UPS button" },
        Entry { literal: "/ups_status", command: Command::Status, summary: "Get status" },
        Entry { literal: "/ups_help", command: Command::Help, summary: "Show this help" },
    ],
};

// ───────────────────────────────────────────────────────────────
// Router
// ───────────────────────────────────────────────────────────────

/// Result of routing one message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Addressed to this controller (possibly `Command::Unknown`).
    Command(Command),
    /// Outside the namespace: drop silently, send nothing.
    NotForThisController,
}

/// Parses message text against one controller's [`Vocabulary`].
#[derive(Debug, Clone, Copy)]
pub struct CommandRouter {
    vocabulary: &'static Vocabulary,
}

impl CommandRouter {
    pub fn new(vocabulary: &'static Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn parse(&self, text: &str) -> Route {
        if !text.starts_with(self.vocabulary.namespace) {
            return Route::NotForThisController;
        }
        let command = self
            .vocabulary
            .entries
            .iter()
            .find(|e| e.literal == text)
            .map_or_else(|| Command::Unknown(text.to_owned()), |e| e.command.clone());
        Route::Command(command)
    }

    pub fn namespace(&self) -> &'static str {
        self.vocabulary.namespace
    }

    pub fn vocabulary(&self) -> &'static Vocabulary {
        self.vocabulary
    }

    /// Static help listing: header, blank line, one `literal - summary`
    /// per line, no trailing newline.
    pub fn help_text(&self) -> String {
        let mut out = String::from(self.vocabulary.help_header);
        out.push('\n');
        for entry in self.vocabulary.entries {
            out.push('\n');
            out.push_str(entry.literal);
            out.push_str(" - ");
            out.push_str(entry.summary);
        }
        out
    }
}
