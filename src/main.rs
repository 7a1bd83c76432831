//! kbd2pad - USB keyboard to USB gamepad translator
//!
//! Target: Raspberry Pi RP2040 (dual Cortex-M0+)
//!
//! Architecture:
//! ┌────────────┐  PIO-USB   ┌────────────────────┐  channel  ┌────────────────┐  USB   ┌──────┐
//! │  Keyboard  │──────────→ │ core 1: TinyUSB    │─────────→ │ core 0:        │──────→ │  PC  │
//! │ (HID boot) │            │ host + Bridge      │           │ embassy-usb    │        │      │
//! └────────────┘            └─────────┬──────────┘           │ HID gamepad    │        └──────┘
//!                                     │ status tick          └────────────────┘
//!                                     ▼
//!                               RGB indicator
//!
//! Both cores run their own Embassy thread executor. All translation and
//! status state lives on core 1; core 0 only writes finished reports to
//! the gamepad endpoint.

#![no_std]
#![no_main]

mod indicator;
mod usb;

use defmt::{info, unwrap, warn};
use embassy_executor::Executor;
use embassy_rp::clocks::PllConfig;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::multicore::{spawn_core1, Stack};
use kbd2pad::hid::descriptor::ReportLayout;
use kbd2pad::{ActiveReport, OutputReport};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use indicator::{BoardIndicator, RgbIndicator};
use usb::device::{GamepadWriter, UsbDriver};
use usb::GAMEPAD_REPORTS;

static mut CORE1_STACK: Stack<8192> = Stack::new();
static EXECUTOR0: StaticCell<Executor> = StaticCell::new();
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();

#[cortex_m_rt::entry]
fn main() -> ! {
    info!("kbd2pad starting...");

    // ── Clocks ───────────────────────────────────────────────────
    // PIO-USB needs the system clock at a multiple of 12 MHz.
    let mut config = embassy_rp::config::Config::default();
    if let Some(xosc) = config.clocks.xosc.as_mut() {
        xosc.sys_pll = Some(PllConfig {
            refdiv: 1,
            fbdiv: 120,
            post_div1: 6,
            post_div2: 2,
        });
    }
    let p = embassy_rp::init(config);
    info!("Peripherals initialised (sys clock 120 MHz)");

    // ── Gamepad descriptor sanity check ─────────────────────────
    match ReportLayout::parse(ActiveReport::DESCRIPTOR) {
        Some(layout) if layout.input_bytes() == ActiveReport::SIZE => info!(
            "Gamepad layout: {} buttons, {} axes, hat={}, {} byte reports",
            layout.buttons,
            layout.axes,
            layout.has_hat,
            layout.input_bytes()
        ),
        Some(layout) => warn!(
            "Gamepad descriptor describes {} bytes, report is {}",
            layout.input_bytes(),
            ActiveReport::SIZE
        ),
        None => warn!("Gamepad descriptor could not be parsed"),
    }

    // ── Status indicator ─────────────────────────────────────────
    let indicator: BoardIndicator = RgbIndicator::new(
        Output::new(p.PIN_18, Level::Low),
        Output::new(p.PIN_19, Level::Low),
        Output::new(p.PIN_20, Level::Low),
    );

    // ── Core 1: USB host + bridge ────────────────────────────────
    spawn_core1(
        p.CORE1,
        unsafe { &mut *core::ptr::addr_of_mut!(CORE1_STACK) },
        move || {
            let executor1 = EXECUTOR1.init(Executor::new());
            executor1.run(|spawner| unwrap!(spawner.spawn(host_task(indicator))));
        },
    );

    // ── Core 0: USB device ───────────────────────────────────────
    let gamepad = usb::device::init(p.USB);

    let executor0 = EXECUTOR0.init(Executor::new());
    executor0.run(|spawner| {
        unwrap!(spawner.spawn(usb_device_task(gamepad.device)));
        unwrap!(spawner.spawn(gamepad_writer_task(gamepad.writer)));
        info!("All tasks spawned");
    })
}

// ═══════════════════════════════════════════════════════════════════
// Embassy task wrappers
// ═══════════════════════════════════════════════════════════════════

#[embassy_executor::task]
async fn host_task(indicator: BoardIndicator) -> ! {
    usb::host::run_host(indicator).await
}

#[embassy_executor::task]
async fn usb_device_task(device: embassy_usb::UsbDevice<'static, UsbDriver>) -> ! {
    usb::device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn gamepad_writer_task(writer: GamepadWriter) -> ! {
    usb::device::gamepad_writer_loop(writer, &GAMEPAD_REPORTS).await
}
