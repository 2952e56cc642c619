//! ChatSwitch Firmware — Main Entry Point
//!
//! A chat-commanded remote switch: polls a Telegram bot for commands from
//! one authorized chat and drives either a three-channel LED bank or a
//! servo that presses a UPS power button.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter     TelegramSource   WifiAdapter   Esp32Clock │
//! │  (Output + Delay)    (MessageSource)  (Network)     (Clock)    │
//! │  LogEventSink                                                  │
//! │  (EventSink)                                                   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              PollLoop (pure logic)                     │    │
//! │  │  Guard · Router · Lights/UPS controller                │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::info;

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use chatswitch::Error;
use chatswitch::adapters::hardware::HardwareAdapter;
use chatswitch::adapters::log_sink::LogEventSink;
use chatswitch::adapters::telegram::{TelegramHttp, TelegramSource};
use chatswitch::adapters::time::Esp32Clock;
use chatswitch::adapters::wifi::{ConnectivityPort, WifiAdapter};
use chatswitch::app::controller::{DeviceController, LightsController, UpsController};
use chatswitch::app::ports::Clock;
use chatswitch::app::service::PollLoop;
use chatswitch::config::{ControllerKind, DeviceConfig};
use chatswitch::drivers::hw_init;
use chatswitch::drivers::servo::ServoDriver;

/// Pause between WiFi association attempts at boot.
const WIFI_RETRY_MS: u32 = 500;
/// Idle time per loop pass; keeps the idle task (and its watchdog) fed.
const LOOP_IDLE_MS: u32 = 10;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  ChatSwitch v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Build-time configuration ───────────────────────────
    let config = DeviceConfig::from_build_env().map_err(Error::from)?;
    info!("Controller: {:?}", config.controller);

    // ── 3. Outputs ────────────────────────────────────────────
    let mut output_pins = vec![config.status_led_pin];
    let servo = match config.controller {
        ControllerKind::Lights => {
            output_pins.extend_from_slice(&config.light_pins);
            None
        }
        ControllerKind::Ups => {
            hw_init::init_servo_pwm(config.servo_pin).map_err(Error::from)?;
            Some(ServoDriver::new(config.servo_pin))
        }
    };
    hw_init::init_outputs(&output_pins).map_err(Error::from)?;
    let mut hw = HardwareAdapter::new(servo);

    // ── 4. WiFi (blocks until associated) ─────────────────────
    let peripherals = Peripherals::take()?;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let mut wifi = WifiAdapter::new(BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sys_loop.clone(), Some(nvs))?,
        sys_loop,
    )?);
    wifi.set_credentials(&config.wifi_ssid, &config.wifi_password)
        .map_err(Error::from)?;
    let attempts = wifi
        .connect_blocking(&mut hw, WIFI_RETRY_MS)
        .map_err(Error::from)?;
    info!("WiFi up after {} attempt(s)", attempts);

    // ── 5. Chat transport ─────────────────────────────────────
    let source = TelegramSource::new(TelegramHttp::new(), &config).map_err(Error::from)?;

    // ── 6. Run the selected personality ───────────────────────
    match config.controller {
        ControllerKind::Lights => {
            let controller = LightsController::new(&config);
            run(&config, controller, hw, wifi, source)
        }
        ControllerKind::Ups => {
            let controller = UpsController::new(&config);
            run(&config, controller, hw, wifi, source)
        }
    }
}

// ── Poll loop ─────────────────────────────────────────────────

fn run<C: DeviceController>(
    config: &DeviceConfig,
    controller: C,
    mut hw: HardwareAdapter,
    mut wifi: WifiAdapter,
    mut source: TelegramSource<TelegramHttp>,
) -> ! {
    let clock = Esp32Clock::new();
    let mut sink = LogEventSink::new();
    let mut app = PollLoop::new(config, controller);
    app.start(&mut hw, &mut sink);

    loop {
        app.tick(&clock, &mut source, &mut hw, &wifi, &mut sink);
        wifi.poll(clock.now_ms());
        FreeRtos::delay_ms(LOOP_IDLE_MS);
    }
}
