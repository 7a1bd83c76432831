//! Keyboard → gamepad bridge.
//!
//! The [`Bridge`] sits between the USB host stack (keyboard in) and the
//! USB device stack (gamepad out). It reacts to three host events:
//!
//! 1. **Mount**   - a keyboard appeared; arm report reception
//! 2. **Unmount** - the keyboard left; forget held keys
//! 3. **Report**  - decode, track activity, translate, forward, re-arm
//!
//! plus a periodic [`tick`](Bridge::tick) that keeps the indicator fresh
//! and retries a gamepad report the endpoint was too busy to take.
//! All three stacks are reached through small traits so the whole flow
//! runs on the host in tests.

use core::marker::PhantomData;

use crate::config;
use crate::error::Error;
use crate::hid::{map, KeyboardReport, OutputReport};
use crate::status::{resolve, ActivityState, Rgb, Status};

/// Identifies a mounted keyboard interface on the host side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardHandle {
    /// USB device address assigned by the host stack.
    pub dev_addr: u8,
    /// HID interface instance on that device.
    pub instance: u8,
}

/// Host-side USB stack: where keyboard reports come from.
pub trait HostPort {
    /// Ask the stack for the next input report of `keyboard`.
    ///
    /// Returns `false` if the request could not be queued.
    fn request_report(&mut self, keyboard: KeyboardHandle) -> bool;
}

/// Device-side USB stack: where gamepad reports go.
pub trait GamepadPort<R: OutputReport> {
    /// Whether the endpoint can take another report right now.
    fn is_ready(&mut self) -> bool;

    /// Hand a report to the endpoint.
    fn submit(&mut self, report: &R) -> Result<(), Error>;

    /// Called between readiness polls while the endpoint is busy.
    fn wait(&mut self) {}
}

/// Status indicator.
pub trait Indicator {
    /// Show `color`. No acknowledgement is expected.
    fn render(&mut self, color: Rgb);
}

/// Something the host stack reported, as queued between its callbacks and
/// the [`Bridge`]. `D` holds the raw report bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent<D> {
    Mounted(KeyboardHandle),
    Unmounted(KeyboardHandle),
    Report { keyboard: KeyboardHandle, data: D },
}

/// What to do with a [`HostEvent`] that found the event queue full.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueueFull<D> {
    /// The report is lost; request the next one right away so reception
    /// does not stall.
    Rearm(KeyboardHandle),
    /// A connection change must not be lost; hand it over once the queue
    /// has been drained.
    Defer(HostEvent<D>),
}

impl<D> HostEvent<D> {
    /// Keyboard the event refers to.
    pub fn keyboard(&self) -> KeyboardHandle {
        match self {
            HostEvent::Mounted(keyboard)
            | HostEvent::Unmounted(keyboard)
            | HostEvent::Report { keyboard, .. } => *keyboard,
        }
    }

    pub fn on_queue_full(self) -> QueueFull<D> {
        match self {
            HostEvent::Report { keyboard, .. } => QueueFull::Rearm(keyboard),
            connection => QueueFull::Defer(connection),
        }
    }
}

/// Connection and activity facts the indicator is derived from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeState {
    /// A keyboard is mounted.
    pub connected: bool,
    /// Key activity of the mounted keyboard.
    pub activity: ActivityState,
}

impl BridgeState {
    pub const fn new() -> Self {
        Self {
            connected: false,
            activity: ActivityState::new(),
        }
    }

    /// Indicator state at `now_ms`.
    pub fn status(&self, now_ms: u64) -> Status {
        resolve(
            self.connected,
            self.activity.key_down,
            self.activity.last_key_ms,
            now_ms,
        )
    }
}

/// Report counters, wrapping on overflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeStats {
    /// Gamepad reports delivered to the endpoint.
    pub translated: u32,
    /// Reports rejected by the decoder.
    pub rejected: u32,
    /// Gamepad reports the endpoint did not take on first offer.
    pub deferred: u32,
    /// Held gamepad reports replaced by a newer one before delivery.
    pub dropped: u32,
}

/// Drives decoding, translation, forwarding and the status indicator.
pub struct Bridge<R, H, G, L> {
    state: BridgeState,
    stats: BridgeStats,
    receiving: bool,
    last_status: Option<Status>,
    pending: Option<R>,
    host: H,
    gamepad: G,
    indicator: L,
    _report: PhantomData<R>,
}

impl<R, H, G, L> Bridge<R, H, G, L>
where
    R: OutputReport,
    H: HostPort,
    G: GamepadPort<R>,
    L: Indicator,
{
    /// Create a bridge with no keyboard mounted.
    pub fn new(host: H, gamepad: G, indicator: L) -> Self {
        Self {
            state: BridgeState::new(),
            stats: BridgeStats::default(),
            receiving: false,
            last_status: None,
            pending: None,
            host,
            gamepad,
            indicator,
            _report: PhantomData,
        }
    }

    /// Current connection and activity facts.
    pub fn state(&self) -> &BridgeState {
        &self.state
    }

    pub fn stats(&self) -> BridgeStats {
        self.stats
    }

    /// Whether a report request is outstanding for the mounted keyboard.
    ///
    /// Becomes `false` after a failed re-arm and stays so until the next
    /// mount.
    pub fn is_receiving(&self) -> bool {
        self.receiving
    }

    /// Indicator state at `now_ms`.
    pub fn status(&self, now_ms: u64) -> Status {
        self.state.status(now_ms)
    }

    /// Latest gamepad report still waiting for the endpoint.
    pub fn pending(&self) -> Option<&R> {
        self.pending.as_ref()
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn gamepad_mut(&mut self) -> &mut G {
        &mut self.gamepad
    }

    pub fn indicator_mut(&mut self) -> &mut L {
        &mut self.indicator
    }

    /// A keyboard was mounted.
    pub fn on_mount(&mut self, keyboard: KeyboardHandle, now_ms: u64) -> Result<(), Error> {
        info!(
            "Keyboard mounted: addr={} instance={}",
            keyboard.dev_addr, keyboard.instance
        );
        self.state.connected = true;
        self.state.activity.release();
        let armed = self.rearm(keyboard);
        self.refresh(now_ms);
        armed
    }

    /// The keyboard was unmounted.
    pub fn on_unmount(&mut self, keyboard: KeyboardHandle, now_ms: u64) {
        info!(
            "Keyboard unmounted: addr={} instance={}",
            keyboard.dev_addr, keyboard.instance
        );
        self.state.connected = false;
        self.state.activity.release();
        self.receiving = false;
        self.refresh(now_ms);
    }

    /// A raw input report arrived from `keyboard`.
    ///
    /// Returns the gamepad report that was forwarded. On `TransportBusy`
    /// the report is held and retried by [`tick`](Self::tick). Reception is
    /// re-armed whatever happens to the report itself; a failed re-arm is
    /// reported only when the report was otherwise handled.
    pub fn on_report(
        &mut self,
        keyboard: KeyboardHandle,
        data: &[u8],
        now_ms: u64,
    ) -> Result<R, Error> {
        let outcome = self.translate(data, now_ms);
        let armed = self.rearm(keyboard);
        self.refresh(now_ms);
        let report = outcome?;
        armed.map(|()| report)
    }

    /// Feed one queued host event to the matching handler.
    pub fn dispatch<D: AsRef<[u8]>>(
        &mut self,
        event: HostEvent<D>,
        now_ms: u64,
    ) -> Result<(), Error> {
        match event {
            HostEvent::Mounted(keyboard) => self.on_mount(keyboard, now_ms),
            HostEvent::Unmounted(keyboard) => {
                self.on_unmount(keyboard, now_ms);
                Ok(())
            }
            HostEvent::Report { keyboard, data } => self
                .on_report(keyboard, data.as_ref(), now_ms)
                .map(|_| ()),
        }
    }

    /// Periodic status refresh. Also offers a held gamepad report to the
    /// endpoint once, without waiting.
    pub fn tick(&mut self, now_ms: u64) {
        if self.pending.is_some() && self.flush(0).is_ok() {
            debug!("Held gamepad report delivered");
        }
        self.refresh(now_ms);
    }

    fn translate(&mut self, data: &[u8], now_ms: u64) -> Result<R, Error> {
        let keyboard = match KeyboardReport::decode(data) {
            Ok(keyboard) => keyboard,
            Err(e) => {
                warn!("Dropping keyboard report: {}", e);
                self.stats.rejected = self.stats.rejected.wrapping_add(1);
                return Err(e);
            }
        };

        self.state.activity.observe(&keyboard, now_ms);
        let report = map::<R>(&keyboard);
        self.forward(report)?;
        Ok(report)
    }

    /// Make `report` the one the endpoint gets next and try to deliver it.
    ///
    /// A report the endpoint does not take stays held until a later
    /// [`tick`](Self::tick) or report delivers it; only the newest one is
    /// kept.
    fn forward(&mut self, report: R) -> Result<(), Error> {
        if self.pending.replace(report).is_some() {
            self.stats.dropped = self.stats.dropped.wrapping_add(1);
        }
        self.flush(config::SUBMIT_SPIN_LIMIT).inspect_err(|e| {
            warn!("Gamepad report held for retry: {}", e);
            self.stats.deferred = self.stats.deferred.wrapping_add(1);
        })
    }

    /// Submit the held report, polling readiness at most `spin_limit`
    /// times.
    fn flush(&mut self, spin_limit: u32) -> Result<(), Error> {
        let Some(report) = self.pending else {
            return Ok(());
        };

        let mut spins = 0u32;
        while !self.gamepad.is_ready() {
            if spins >= spin_limit {
                return Err(Error::TransportBusy);
            }
            self.gamepad.wait();
            spins += 1;
        }

        self.gamepad.submit(&report)?;
        self.pending = None;
        self.stats.translated = self.stats.translated.wrapping_add(1);
        Ok(())
    }

    fn rearm(&mut self, keyboard: KeyboardHandle) -> Result<(), Error> {
        self.receiving = self.host.request_report(keyboard);
        if self.receiving {
            Ok(())
        } else {
            error!(
                "Cannot request report from addr={} instance={}; waiting for remount",
                keyboard.dev_addr, keyboard.instance
            );
            Err(Error::RearmFailed)
        }
    }

    fn refresh(&mut self, now_ms: u64) {
        let status = self.state.status(now_ms);
        if self.last_status != Some(status) {
            debug!("Status: {:?} -> {}", self.last_status, status);
            self.last_status = Some(status);
        }
        self.indicator.render(status.color());
    }
}
