use std::fs::File;
use std::io::Read;

use anyhow::{Context, Result};
use pincmd_core::{Board, BoardConfig, CommandMap, SimLines};

/// Which decoding table the board runs with, chosen at startup.
pub enum MappingProfile {
    /// Bit `i` drives line `i`, all active-high.
    Direct,
    /// The stock two-LED-plus-relay board with its inverted built-in LED.
    RelayBoard,
}

impl MappingProfile {
    fn map(&self) -> CommandMap {
        match self {
            MappingProfile::Direct => CommandMap::direct(),
            MappingProfile::RelayBoard => CommandMap::relay_board(),
        }
    }
}

/// Feed every byte from `input` to a simulated board and report the line
/// states after each command.
///
/// `input` is `-` for stdin or a path: a file of command bytes, or a serial
/// device node such as `/dev/ttyUSB0`. Nothing is ever written back to it.
pub fn run(profile: MappingProfile, input: &str) -> Result<()> {
    let config = BoardConfig::builder().map(profile.map()).build();
    let mut board = Board::new(config, SimLines::default());
    board.power_on();

    let mut source: Box<dyn Read> = if input == "-" {
        Box::new(std::io::stdin())
    } else {
        Box::new(File::open(input).with_context(|| format!("opening input '{input}'"))?)
    };

    // One byte per read: each command is handled to completion before the
    // next is pulled off the wire, like the hardware's one-byte holding
    // register.
    let mut byte = [0u8; 1];
    loop {
        match source.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                board.feed_byte(byte[0]);
                println!("{:#04x} => {}", byte[0], format_states(&board));
            }
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err).context("reading input"),
        }
    }

    log::info!("input closed after {} commands", board.commands_handled());
    Ok(())
}

fn format_states(board: &Board<SimLines>) -> String {
    board
        .line_states()
        .map(|(label, on)| format!("{label}={}", if on { "on" } else { "off" }))
        .collect::<Vec<_>>()
        .join(" ")
}
