use typed_builder::TypedBuilder;

use crate::decoder::CommandMap;
use crate::lines::LineBank;
use crate::usart::Usart;
use crate::{DEFAULT_BAUD, DEFAULT_CLOCK_HZ};

/// Static configuration for a board instance.
#[derive(TypedBuilder)]
pub struct BoardConfig {
    #[builder(default = DEFAULT_CLOCK_HZ)]
    pub clock_hz: u32,
    #[builder(default = DEFAULT_BAUD)]
    pub baud: u32,
    pub map: CommandMap,
}

/// The modeled board: serial receiver, command map, output lines.
///
/// All useful work happens in the receive handler; after [`Board::power_on`]
/// the main program has nothing left to do but keep feeding wire bytes.
pub struct Board<B: LineBank> {
    usart: Usart,
    map: CommandMap,
    lines: B,
    baud: u32,
    handled: u64,
}

impl<B: LineBank> Board<B> {
    pub fn new(config: BoardConfig, lines: B) -> Self {
        Self {
            usart: Usart::new(config.clock_hz),
            map: config.map,
            lines,
            baud: config.baud,
            handled: 0,
        }
    }

    /// One-time bring-up: serial init, line directions, initial off state,
    /// receive event enabled. Wire bytes are ignored until this has run.
    pub fn power_on(&mut self) {
        self.usart.init(self.baud);
        self.map.configure(&mut self.lines);
        self.usart.enable_rx_interrupt();
    }

    /// A byte arriving on the wire.
    ///
    /// The receive handler runs synchronously to completion before this
    /// returns, so a later arrival can never preempt it; bytes are handled
    /// strictly in arrival order, one at a time.
    pub fn feed_byte(&mut self, byte: u8) {
        self.usart.feed_from_wire(byte);
        if self.usart.rx_interrupt_enabled() && self.usart.rx_pending() {
            self.service_rx();
        }
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.feed_byte(byte);
        }
    }

    /// Receive-complete handler: read the byte once and rewrite every mapped
    /// line from it. The byte is never stored or compared to its
    /// predecessor.
    fn service_rx(&mut self) {
        let cmd = self.usart.receive_byte();
        log::debug!("command byte {:#04x}", cmd);
        self.map.apply(cmd, &mut self.lines);
        self.handled += 1;
    }

    pub fn lines(&self) -> &B {
        &self.lines
    }

    pub fn usart(&self) -> &Usart {
        &self.usart
    }

    pub fn map(&self) -> &CommandMap {
        &self.map
    }

    /// Logical on/off of each mapped component.
    pub fn line_states(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.map.states(&self.lines)
    }

    /// How many command bytes the receive handler has consumed.
    pub fn commands_handled(&self) -> u64 {
        self.handled
    }
}
