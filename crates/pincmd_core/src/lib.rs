mod board;
mod decoder;
mod lines;
mod usart;

pub use board::{Board, BoardConfig};
pub use decoder::{BitMapping, CommandMap, Polarity};
pub use lines::{Level, LineBank, SimLines};
pub use usart::{Control, Frame, Status, Usart};

/// Number of addressable output lines on the modeled port.
pub const NUM_LINES: usize = 8;

/// Reference clock of the stock board (8 MHz oscillator behind the default
/// divide-by-8 prescaler).
pub const DEFAULT_CLOCK_HZ: u32 = 1_000_000;

/// Stock communication rate. Higher rates corrupt characters on the
/// reference hardware.
pub const DEFAULT_BAUD: u32 = 4800;
