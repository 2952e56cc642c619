//! Telegram Bot API message source.
//!
//! Implements [`MessageSource`] on top of the Bot API long-poll endpoints:
//! `getUpdates` to pull pending messages and `sendMessage` to reply.  The
//! HTTP exchange itself sits behind [`HttpTransport`] so the JSON handling
//! is tested on the host without a network.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: [`TelegramHttp`] drives the ESP-IDF
//!   `esp_http_client` over TLS, verified against the built-in
//!   certificate bundle.
//! - **all other targets**: [`TelegramHttp`] is a simulation stub that
//!   always reports an empty update list.
//!
//! ## Offsets
//!
//! Telegram keeps re-delivering an update until a later `getUpdates`
//! call passes an `offset` above its id.  Updates that carry no message
//! (inline queries, reactions, ...) never reach the poll loop, so the
//! source remembers the highest update id it has seen and never asks
//! for anything at or below it again.  Otherwise one such update would
//! pin the offset forever.

use core::fmt;

use heapless::String as HString;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{InboundMessage, MessageSource};
use crate::config::{DeviceConfig, MAX_TOKEN_LEN};

#[cfg(target_os = "espidf")]
mod esp_impl;

// ───────────────────────────────────────────────────────────────
// Constants
// ───────────────────────────────────────────────────────────────

const API_BASE: &str = "https://api.telegram.org";

/// Responses larger than this are discarded.
pub const MAX_RESPONSE_LEN: usize = 16 * 1024;

/// Transport timeout for one request (milliseconds).
pub const REQUEST_TIMEOUT_MS: u32 = 10_000;

// ───────────────────────────────────────────────────────────────
// Error type
// ───────────────────────────────────────────────────────────────

/// Errors from one Bot API exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No bot token configured.
    NoToken,
    /// Connection, TLS or socket failure.
    Io,
    /// The server answered with a non-2xx status.
    Http(u16),
    /// The response body was not the JSON we expected.
    Malformed,
    /// The Bot API answered `"ok": false`.
    Rejected,
    /// The response exceeded [`MAX_RESPONSE_LEN`].
    TooLarge,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoToken => write!(f, "no bot token configured"),
            Self::Io => write!(f, "HTTP connection failed"),
            Self::Http(status) => write!(f, "HTTP status {}", status),
            Self::Malformed => write!(f, "malformed Bot API response"),
            Self::Rejected => write!(f, "Bot API rejected the request"),
            Self::TooLarge => write!(f, "response larger than {} bytes", MAX_RESPONSE_LEN),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// HTTP port
// ───────────────────────────────────────────────────────────────

/// Blocking HTTPS exchange.  Both calls return the response body of a
/// 2xx answer; anything else is an error.
pub trait HttpTransport {
    fn get(&mut self, url: &str) -> Result<Vec<u8>, TransportError>;
    fn post_json(&mut self, url: &str, body: &[u8]) -> Result<Vec<u8>, TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Bot API wire types
// ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct UpdatesResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct Update {
    update_id: u64,
    message: Option<Message>,
    edited_message: Option<Message>,
    channel_post: Option<Message>,
}

#[derive(Deserialize)]
struct Message {
    chat: Chat,
    from: Option<User>,
    text: Option<String>,
}

#[derive(Deserialize)]
struct Chat {
    id: i64,
    title: Option<String>,
}

#[derive(Deserialize)]
struct User {
    #[serde(default)]
    first_name: String,
}

#[derive(Deserialize)]
struct Ack {
    ok: bool,
    description: Option<String>,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Messages extracted from one `getUpdates` answer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateBatch {
    /// Message-bearing updates, in server order.
    pub messages: Vec<InboundMessage>,
    /// Highest `update_id` in the answer, message-bearing or not.
    pub highest_update_id: Option<u64>,
}

/// Decode a `getUpdates` response body.
///
/// A message without text (photo, sticker, ...) is kept with empty text so
/// its id still advances the high-water mark.
pub fn parse_updates(body: &[u8]) -> Result<UpdateBatch, TransportError> {
    let response: UpdatesResponse =
        serde_json::from_slice(body).map_err(|_| TransportError::Malformed)?;
    if !response.ok {
        warn!(
            "getUpdates refused: {}",
            response.description.as_deref().unwrap_or("no description")
        );
        return Err(TransportError::Rejected);
    }

    let mut batch = UpdateBatch::default();
    for update in response.result {
        batch.highest_update_id = batch.highest_update_id.max(Some(update.update_id));
        let Some(message) = update
            .message
            .or(update.edited_message)
            .or(update.channel_post)
        else {
            debug!("update {} carries no message, skipping", update.update_id);
            continue;
        };
        let sender_name = match (message.from, message.chat.title) {
            (Some(user), _) => user.first_name,
            (None, Some(title)) => title,
            (None, None) => String::new(),
        };
        batch.messages.push(InboundMessage {
            chat_id: message.chat.id.to_string(),
            sender_name,
            text: message.text.unwrap_or_default(),
            sequence_id: update.update_id,
        });
    }
    Ok(batch)
}

// ───────────────────────────────────────────────────────────────
// TelegramSource
// ───────────────────────────────────────────────────────────────

/// [`MessageSource`] backed by the Telegram Bot API.
pub struct TelegramSource<T> {
    http: T,
    token: HString<MAX_TOKEN_LEN>,
    fetch_limit: u8,
    /// Highest update id ever returned by the server.
    seen_through: u64,
}

impl<T: HttpTransport> TelegramSource<T> {
    pub fn new(http: T, config: &DeviceConfig) -> Result<Self, TransportError> {
        if config.bot_token.is_empty() {
            return Err(TransportError::NoToken);
        }
        Ok(Self {
            http,
            token: config.bot_token.clone(),
            fetch_limit: config.fetch_limit,
            seen_through: 0,
        })
    }

    pub fn transport(&self) -> &T {
        &self.http
    }

    /// Offset actually sent to the server for a request from `since`.
    pub fn effective_offset(&self, since_sequence_id: u64) -> u64 {
        since_sequence_id.max(self.seen_through.saturating_add(1))
    }

    /// One `getUpdates` call.
    pub fn try_fetch(&mut self, since_sequence_id: u64) -> Result<Vec<InboundMessage>, TransportError> {
        let offset = self.effective_offset(since_sequence_id);
        let url = format!(
            "{}/bot{}/getUpdates?offset={}&limit={}&timeout=0",
            API_BASE, self.token, offset, self.fetch_limit
        );
        let body = self.http.get(&url)?;
        let batch = parse_updates(&body)?;
        if let Some(highest) = batch.highest_update_id {
            self.seen_through = self.seen_through.max(highest);
        }
        Ok(batch.messages)
    }

    /// One `sendMessage` call.
    pub fn try_reply(&mut self, chat_id: &str, text: &str) -> Result<(), TransportError> {
        let url = format!("{}/bot{}/sendMessage", API_BASE, self.token);
        let payload = serde_json::to_vec(&SendMessage { chat_id, text })
            .map_err(|_| TransportError::Malformed)?;
        let body = self.http.post_json(&url, &payload)?;
        let ack: Ack = serde_json::from_slice(&body).map_err(|_| TransportError::Malformed)?;
        if !ack.ok {
            warn!(
                "sendMessage refused: {}",
                ack.description.as_deref().unwrap_or("no description")
            );
            return Err(TransportError::Rejected);
        }
        Ok(())
    }
}

impl<T: HttpTransport> MessageSource for TelegramSource<T> {
    fn fetch_pending(&mut self, since_sequence_id: u64) -> Vec<InboundMessage> {
        match self.try_fetch(since_sequence_id) {
            Ok(messages) => messages,
            Err(e) => {
                // Retried naturally on the next poll.
                warn!("getUpdates failed: {}", e);
                Vec::new()
            }
        }
    }

    fn reply(&mut self, chat_id: &str, text: &str) {
        if let Err(e) = self.try_reply(chat_id, text) {
            warn!("sendMessage to {} failed: {}", chat_id, e);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// TelegramHttp
// ───────────────────────────────────────────────────────────────

/// Platform HTTPS client.
pub struct TelegramHttp {
    timeout_ms: u32,
    /// Simulation: number of requests served.
    #[cfg(not(target_os = "espidf"))]
    sim_requests: u32,
}

impl Default for TelegramHttp {
    fn default() -> Self {
        Self::new()
    }
}

impl TelegramHttp {
    pub fn new() -> Self {
        Self {
            timeout_ms: REQUEST_TIMEOUT_MS,
            #[cfg(not(target_os = "espidf"))]
            sim_requests: 0,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_requests(&self) -> u32 {
        self.sim_requests
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_request(&mut self, url: &str, json: Option<&[u8]>) -> Result<Vec<u8>, TransportError> {
        esp_impl::perform(url, json, self.timeout_ms)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_request(&mut self, _url: &str, json: Option<&[u8]>) -> Result<Vec<u8>, TransportError> {
        self.sim_requests = self.sim_requests.wrapping_add(1);
        debug!(
            "Telegram(sim): request #{} (timeout {}ms)",
            self.sim_requests, self.timeout_ms
        );
        let body: &[u8] = match json {
            Some(_) => br#"{"ok":true,"result":{}}"#,
            None => br#"{"ok":true,"result":[]}"#,
        };
        Ok(body.to_vec())
    }
}

impl HttpTransport for TelegramHttp {
    fn get(&mut self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.platform_request(url, None)
    }

    fn post_json(&mut self, url: &str, body: &[u8]) -> Result<Vec<u8>, TransportError> {
        self.platform_request(url, Some(body))
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
