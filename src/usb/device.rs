//! USB HID gamepad device.
//!
//! Initialises the Embassy USB stack on the RP2040 native USB controller
//! and exposes one HID IN endpoint carrying the active gamepad report.

use defmt::{info, warn};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::{Driver, InterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::{Builder, Config, UsbDevice};
use kbd2pad::config::{self, REPORT_QUEUE_DEPTH};
use kbd2pad::{ActiveReport, Error, GamepadPort, OutputReport};
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
});

/// Max packet size of the gamepad IN endpoint; holds either report whole.
pub const GAMEPAD_PACKET_SIZE: usize = 16;

pub type UsbDriver = Driver<'static, USB>;
pub type GamepadWriter = HidWriter<'static, UsbDriver, GAMEPAD_PACKET_SIZE>;
pub type ReportChannel = Channel<CriticalSectionRawMutex, ActiveReport, REPORT_QUEUE_DEPTH>;

static GAMEPAD_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();

/// Build result containing the USB device runner and the gamepad writer.
pub struct UsbGamepad {
    pub device: UsbDevice<'static, UsbDriver>,
    pub writer: GamepadWriter,
}

/// Initialise the USB stack and create the gamepad device.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usb: USB) -> UsbGamepad {
    let driver = Driver::new(usb, Irqs);

    // USB device-level configuration.
    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    // Allocate static descriptor buffers.
    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 128]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    let state = GAMEPAD_STATE.init(State::new());
    let hid_config = HidConfig {
        report_descriptor: ActiveReport::DESCRIPTOR,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: GAMEPAD_PACKET_SIZE as u16,
    };
    let writer = HidWriter::new(&mut builder, state, hid_config);

    let device = builder.build();

    info!(
        "USB HID gamepad initialised ({} byte reports)",
        ActiveReport::SIZE
    );

    UsbGamepad { device, writer }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// This handles USB enumeration, suspend/resume, and endpoint servicing.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// Gamepad forwarding loop - reads translated reports from core 1 and
/// writes them to the HID endpoint.
pub async fn gamepad_writer_loop(mut writer: GamepadWriter, reports: &'static ReportChannel) -> ! {
    writer.ready().await;
    info!("Gamepad writer ready - waiting for reports");

    let mut buf = [0u8; GAMEPAD_PACKET_SIZE];

    loop {
        let report = reports.receive().await;
        let n = report.serialize(&mut buf);
        if let Err(_e) = writer.write(&buf[..n]).await {
            warn!("USB gamepad write failed");
        }
    }
}

/// [`GamepadPort`] feeding the writer loop from the other core.
///
/// "Ready" means the channel has room; the writer loop drains it as fast
/// as the host polls the endpoint.
pub struct ChannelGamepad {
    reports: &'static ReportChannel,
}

impl ChannelGamepad {
    pub fn new(reports: &'static ReportChannel) -> Self {
        Self { reports }
    }
}

impl GamepadPort<ActiveReport> for ChannelGamepad {
    fn is_ready(&mut self) -> bool {
        !self.reports.is_full()
    }

    fn submit(&mut self, report: &ActiveReport) -> Result<(), Error> {
        self.reports
            .try_send(*report)
            .map_err(|_| Error::TransportWrite)
    }

    fn wait(&mut self) {
        cortex_m::asm::delay(config::SUBMIT_SPIN_CYCLES);
    }
}
