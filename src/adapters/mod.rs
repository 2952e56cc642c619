//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements             | Connects to                 |
//! |-------------|------------------------|-----------------------------|
//! | `hardware`  | OutputSink, DelayNs    | ESP32 GPIO, LEDC (servo)    |
//! | `log_sink`  | EventSink              | Serial log output           |
//! | `telegram`  | MessageSource          | Telegram Bot API over HTTPS |
//! | `time`      | Clock                  | ESP32 system timer          |
//! | `wifi`      | ConnectivityPort       | ESP-IDF WiFi STA            |
//! |             | NetworkStatus          |                             |

pub mod hardware;
pub mod log_sink;
pub mod telegram;
pub mod time;
pub mod wifi;
