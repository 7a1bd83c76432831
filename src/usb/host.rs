//! USB host side - keyboard input via TinyUSB on a PIO-emulated port.
//!
//! TinyUSB calls back into Rust from inside `tuh_task_ext`, on core 1.
//! The callbacks only copy what they were given into [`HOST_EVENTS`];
//! [`run_host`] drains the queue and feeds the [`Bridge`] after every
//! host stack poll, then refreshes the indicator on its own tick.
//! A connection change that finds the queue full waits in
//! [`LATE_CONNECTION`] and is handled right after the queue.

use core::slice;

use defmt::{info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant};
use heapless::Vec;
use kbd2pad::config::{
    HOST_EVENT_QUEUE_DEPTH, HOST_RHPORT, MAX_RAW_REPORT_LEN, STATS_LOG_INTERVAL_SECS,
    STATUS_TICK_MS,
};
use kbd2pad::hid::descriptor::ReportLayout;
use kbd2pad::{ActiveReport, Bridge, HostPort, KeyboardHandle, QueueFull};

use super::device::ChannelGamepad;
use super::GAMEPAD_REPORTS;
use crate::indicator::BoardIndicator;

// TinyUSB host API (tusb.h, class/hid/hid_host.h)
extern "C" {
    fn tuh_init(rhport: u8) -> bool;
    fn tuh_task_ext(timeout_ms: u32, in_isr: bool);
    fn tuh_hid_receive_report(dev_addr: u8, idx: u8) -> bool;
}

/// Host event carrying a copy of the raw report.
pub type HostEvent = kbd2pad::HostEvent<Vec<u8, MAX_RAW_REPORT_LEN>>;

/// Host callbacks -> host task, both on core 1.
static HOST_EVENTS: Channel<CriticalSectionRawMutex, HostEvent, HOST_EVENT_QUEUE_DEPTH> =
    Channel::new();

/// Latest connection change that did not fit in [`HOST_EVENTS`].
static LATE_CONNECTION: Signal<CriticalSectionRawMutex, HostEvent> = Signal::new();

fn post(event: HostEvent) {
    let Err(TrySendError::Full(event)) = HOST_EVENTS.try_send(event) else {
        return;
    };

    match event.on_queue_full() {
        QueueFull::Rearm(keyboard) => {
            warn!("Host event queue full, report from addr={} dropped", keyboard.dev_addr);
            unsafe { tuh_hid_receive_report(keyboard.dev_addr, keyboard.instance) };
        }
        QueueFull::Defer(event) => {
            warn!("Host event queue full, connection change deferred");
            LATE_CONNECTION.signal(event);
        }
    }
}

/// # Safety
///
/// Called by TinyUSB with a descriptor pointer valid for `desc_len` bytes
/// or null.
#[no_mangle]
pub unsafe extern "C" fn tuh_hid_mount_cb(
    dev_addr: u8,
    instance: u8,
    desc_report: *const u8,
    desc_len: u16,
) {
    if !desc_report.is_null() {
        let desc = slice::from_raw_parts(desc_report, desc_len as usize);
        match ReportLayout::parse(desc) {
            Some(layout) => info!(
                "HID addr={} instance={}: {} input bytes",
                dev_addr,
                instance,
                layout.input_bytes()
            ),
            None => warn!(
                "HID addr={} instance={}: unreadable report descriptor",
                dev_addr, instance
            ),
        }
    }

    post(HostEvent::Mounted(KeyboardHandle { dev_addr, instance }));
}

#[no_mangle]
pub extern "C" fn tuh_hid_umount_cb(dev_addr: u8, instance: u8) {
    post(HostEvent::Unmounted(KeyboardHandle { dev_addr, instance }));
}

/// # Safety
///
/// Called by TinyUSB with a report pointer valid for `len` bytes or null.
#[no_mangle]
pub unsafe extern "C" fn tuh_hid_report_received_cb(
    dev_addr: u8,
    instance: u8,
    report: *const u8,
    len: u16,
) {
    let keyboard = KeyboardHandle { dev_addr, instance };
    let raw: &[u8] = if report.is_null() {
        &[]
    } else {
        slice::from_raw_parts(report, len as usize)
    };

    // Longer reports are cut to MAX_RAW_REPORT_LEN, still a rejected length.
    let mut data = Vec::new();
    let _ = data.extend_from_slice(&raw[..raw.len().min(MAX_RAW_REPORT_LEN)]);

    post(HostEvent::Report { keyboard, data });
}

/// [`HostPort`] backed by the linked TinyUSB host stack.
pub struct TinyUsbHost;

impl HostPort for TinyUsbHost {
    fn request_report(&mut self, keyboard: KeyboardHandle) -> bool {
        unsafe { tuh_hid_receive_report(keyboard.dev_addr, keyboard.instance) }
    }
}

type HostBridge = Bridge<ActiveReport, TinyUsbHost, ChannelGamepad, BoardIndicator>;

fn dispatch(bridge: &mut HostBridge, event: HostEvent) {
    // Failures are logged by the bridge; nothing more to do with them here.
    let _ = bridge.dispatch(event, Instant::now().as_millis());
}

/// Host-side main loop - must run on core 1, never returns.
pub async fn run_host(indicator: BoardIndicator) -> ! {
    if !unsafe { tuh_init(HOST_RHPORT) } {
        defmt::panic!("TinyUSB host init failed on rhport {}", HOST_RHPORT);
    }
    info!("USB host started on rhport {}", HOST_RHPORT);

    let mut bridge: HostBridge = Bridge::new(
        TinyUsbHost,
        ChannelGamepad::new(&GAMEPAD_REPORTS),
        indicator,
    );

    let tick = Duration::from_millis(STATUS_TICK_MS);
    let stats_every = Duration::from_secs(STATS_LOG_INTERVAL_SECS);
    let mut next_tick = Instant::now();
    let mut next_stats = Instant::now() + stats_every;

    loop {
        unsafe { tuh_task_ext(0, false) };

        while let Ok(event) = HOST_EVENTS.try_receive() {
            dispatch(&mut bridge, event);
        }
        if let Some(event) = LATE_CONNECTION.try_take() {
            dispatch(&mut bridge, event);
        }

        let now = Instant::now();
        if now >= next_tick {
            bridge.tick(now.as_millis());
            next_tick = now + tick;
        }
        if now >= next_stats {
            let stats = bridge.stats();
            info!(
                "Reports: translated={} rejected={} deferred={} dropped={} receiving={}",
                stats.translated,
                stats.rejected,
                stats.deferred,
                stats.dropped,
                bridge.is_receiving()
            );
            next_stats = now + stats_every;
        }

        embassy_futures::yield_now().await;
    }
}
