use bitflags::bitflags;

bitflags! {
    /// Status register flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        /// A received byte is waiting in the holding register.
        const RX_COMPLETE = 1 << 7;
        /// The transmit holding register is empty.
        const TX_READY = 1 << 5;
    }
}

bitflags! {
    /// Control register flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Control: u8 {
        /// Raise the receive-complete event when a byte arrives.
        const RX_INTERRUPT = 1 << 7;
        const RX_ENABLE = 1 << 4;
        const TX_ENABLE = 1 << 3;
    }
}

/// Frame format programmed by [`Usart::init`]. Parity is never generated;
/// the hardware only does 8 data bits with a fixed stop-bit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    pub data_bits: u8,
    pub stop_bits: u8,
}

/// Register-level model of the single on-chip asynchronous serial interface.
///
/// The receive side is one byte deep: `feed_from_wire` loads the holding
/// register and a byte that arrives before the previous one was read simply
/// replaces it. The loss is silent: there is no overrun flag to poll and no
/// error path anywhere in this interface.
pub struct Usart {
    clock_hz: u32,
    /// 12-bit clock divisor programmed by `init`.
    divisor: u16,
    frame: Frame,
    control: Control,
    status: Status,
    rx_data: u8,
    /// Bytes latched onto the wire by the transmit path.
    tx_log: Vec<u8>,
}

impl Usart {
    pub fn new(clock_hz: u32) -> Self {
        Self {
            clock_hz,
            divisor: 0,
            frame: Frame::default(),
            control: Control::empty(),
            status: Status::empty(),
            rx_data: 0,
            tx_log: Vec::new(),
        }
    }

    /// Program the clock divisor for `baud` and enable receiver and
    /// transmitter with an 8-data-bit, no-parity, 2-stop-bit frame.
    ///
    /// Call exactly once before any transfer. There is no error return: a
    /// rate the clock cannot divide to exactly just runs slightly off, see
    /// [`Usart::actual_baud`].
    pub fn init(&mut self, baud: u32) {
        self.divisor = divisor_for(self.clock_hz, baud);
        self.frame = Frame {
            data_bits: 8,
            stop_bits: 2,
        };
        self.control.insert(Control::RX_ENABLE | Control::TX_ENABLE);
        self.status.insert(Status::TX_READY);
        log::info!(
            "serial ready: {} baud requested, divisor {}, {} baud actual",
            baud,
            self.divisor,
            self.actual_baud()
        );
    }

    /// Block until a byte has fully arrived, then return it.
    pub fn receive_byte(&mut self) -> u8 {
        while !self.status.contains(Status::RX_COMPLETE) {
            std::hint::spin_loop();
        }
        self.status.remove(Status::RX_COMPLETE);
        self.rx_data
    }

    /// Block until the transmit holding register is empty, then latch the
    /// byte onto the wire.
    pub fn transmit_byte(&mut self, value: u8) {
        while !self.status.contains(Status::TX_READY) {
            std::hint::spin_loop();
        }
        // The modeled shifter drains immediately, so TX_READY stays set.
        self.tx_log.push(value);
    }

    /// Transmit every byte of `text`, then a newline/carriage-return pair.
    ///
    /// Utility only; the command path never transmits.
    pub fn send_str(&mut self, text: &str) {
        for &byte in text.as_bytes() {
            self.transmit_byte(byte);
        }
        self.transmit_byte(b'\n');
        self.transmit_byte(b'\r');
    }

    /// Wire-side byte arrival. Ignored while the receiver is disabled;
    /// overwrites an unread byte without notice.
    pub fn feed_from_wire(&mut self, byte: u8) {
        if !self.control.contains(Control::RX_ENABLE) {
            return;
        }
        self.rx_data = byte;
        self.status.insert(Status::RX_COMPLETE);
    }

    pub fn enable_rx_interrupt(&mut self) {
        self.control.insert(Control::RX_INTERRUPT);
    }

    pub fn rx_interrupt_enabled(&self) -> bool {
        self.control.contains(Control::RX_INTERRUPT)
    }

    /// A byte is waiting in the holding register.
    pub fn rx_pending(&self) -> bool {
        self.status.contains(Status::RX_COMPLETE)
    }

    pub fn divisor(&self) -> u16 {
        self.divisor
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn control(&self) -> Control {
        self.control
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// The rate the programmed divisor really yields.
    pub fn actual_baud(&self) -> u32 {
        self.clock_hz / (16 * (self.divisor as u32 + 1))
    }

    /// Everything the transmit path has put on the wire so far.
    pub fn transmitted(&self) -> &[u8] {
        &self.tx_log
    }
}

/// Nearest 12-bit divisor for `baud` against a 16x oversampling clock.
///
/// A rate the clock cannot reach clamps to divisor 0 and simply runs fast;
/// picking a representable rate is the integrator's job.
fn divisor_for(clock_hz: u32, baud: u32) -> u16 {
    debug_assert_ne!(baud, 0);
    (((clock_hz / 16 + baud / 2) / baud).saturating_sub(1) & 0x0fff) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divisor_matches_reference_configuration() {
        // The stock board runs 4800 baud from a 1 MHz clock.
        let mut usart = Usart::new(1_000_000);
        usart.init(4800);
        assert_eq!(usart.divisor(), 12);
        assert_eq!(usart.actual_baud(), 4807);
    }

    #[test]
    fn divisor_rounds_to_nearest_rate() {
        // 9600 from 1 MHz is not exactly representable; the divisor rounds
        // and the actual rate lands above the request.
        let mut usart = Usart::new(1_000_000);
        usart.init(9600);
        assert_eq!(usart.divisor(), 6);
        assert_eq!(usart.actual_baud(), 8928);

        // A crystal picked for serial work divides exactly.
        let mut usart = Usart::new(1_843_200);
        usart.init(4800);
        assert_eq!(usart.divisor(), 23);
        assert_eq!(usart.actual_baud(), 4800);
    }

    #[test]
    fn init_enables_both_directions_with_fixed_frame() {
        let mut usart = Usart::new(1_000_000);
        usart.init(4800);
        assert!(usart.control().contains(Control::RX_ENABLE));
        assert!(usart.control().contains(Control::TX_ENABLE));
        assert!(!usart.rx_interrupt_enabled());
        assert_eq!(
            usart.frame(),
            Frame {
                data_bits: 8,
                stop_bits: 2
            }
        );
        assert!(usart.status().contains(Status::TX_READY));
    }

    #[test]
    fn received_byte_is_returned_once() {
        let mut usart = Usart::new(1_000_000);
        usart.init(4800);

        usart.feed_from_wire(0xA5);
        assert!(usart.rx_pending());
        assert_eq!(usart.receive_byte(), 0xA5);
        assert!(!usart.rx_pending());
    }

    #[test]
    fn overrun_keeps_only_the_latest_byte() {
        let mut usart = Usart::new(1_000_000);
        usart.init(4800);

        // Two arrivals before anyone reads: the first byte is gone, silently.
        usart.feed_from_wire(0x11);
        usart.feed_from_wire(0x22);
        assert_eq!(usart.receive_byte(), 0x22);
        assert!(!usart.rx_pending());
    }

    #[test]
    fn receiver_ignores_the_wire_until_initialized() {
        let mut usart = Usart::new(1_000_000);
        usart.feed_from_wire(0xFF);
        assert!(!usart.rx_pending());
    }

    #[test]
    fn transmit_appends_to_the_wire() {
        let mut usart = Usart::new(1_000_000);
        usart.init(4800);

        usart.transmit_byte(0x42);
        usart.transmit_byte(0x00);
        assert_eq!(usart.transmitted(), &[0x42, 0x00]);
    }

    #[test]
    fn send_str_terminates_with_newline_then_carriage_return() {
        let mut usart = Usart::new(1_000_000);
        usart.init(4800);

        usart.send_str("ok");
        assert_eq!(usart.transmitted(), b"ok\n\r");
    }
}
