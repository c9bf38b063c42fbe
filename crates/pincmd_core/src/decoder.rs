use crate::lines::{Level, LineBank};
use crate::NUM_LINES;


/// Command bit positions for the stock relay board.
const CMD_BIT_LED0: u8 = 0;
const CMD_BIT_LED1: u8 = 1;
const CMD_BIT_RELAY0: u8 = 2;

/// Port lines the stock board wires those components to.
const LINE_LED0: u8 = 5;
const LINE_LED1: u8 = 7;
const LINE_RELAY0: u8 = 6;

const DIRECT_LABELS: [&str; NUM_LINES] = [
    "OUT0", "OUT1", "OUT2", "OUT3", "OUT4", "OUT5", "OUT6", "OUT7",
];

/// Wiring polarity of a mapped line.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Polarity {
    /// Bit set drives the line high.
    ActiveHigh,
    /// Bit set drives the line low (inverted wiring).
    ActiveLow,
}

impl Polarity {
    /// Electrical level that means `on` under this polarity.
    #[inline]
    pub fn level_for(self, on: bool) -> Level {
        match self {
            Polarity::ActiveHigh => Level::from_bool(on),
            Polarity::ActiveLow => Level::from_bool(!on),
        }
    }
}

/// Associates one command bit with one output line.
#[derive(Copy, Clone, Debug)]
pub struct BitMapping {
    pub bit: u8,
    pub line: u8,
    pub polarity: Polarity,
    pub label: &'static str,
}

/// Table-driven rule turning one command byte into one full output state.
///
/// Every entry is rewritten on every byte, so the byte completely replaces
/// the previous output state; no entry is ever skipped, and lines with no
/// entry are never touched. All 256 byte values are legal commands; bits
/// without an entry are simply ignored.
pub struct CommandMap {
    entries: Vec<BitMapping>,
}

impl CommandMap {
    pub fn new(entries: Vec<BitMapping>) -> Self {
        debug_assert!(entries
            .iter()
            .all(|m| m.bit < 8 && (m.line as usize) < NUM_LINES));
        Self { entries }
    }

    /// Identity mapping: bit `i` drives line `i`, all active-high.
    pub fn direct() -> Self {
        let entries = (0..NUM_LINES as u8)
            .map(|i| BitMapping {
                bit: i,
                line: i,
                polarity: Polarity::ActiveHigh,
                label: DIRECT_LABELS[i as usize],
            })
            .collect();
        Self { entries }
    }

    /// The stock relay board: two LEDs and a reed relay.
    ///
    /// The built-in LED sits between the supply rail and its line, so it
    /// lights when the line is driven *low*. That inverted wiring is real
    /// hardware behaviour and stays inverted here; the external LED and the
    /// relay are active-high.
    pub fn relay_board() -> Self {
        Self::new(vec![
            BitMapping {
                bit: CMD_BIT_LED0,
                line: LINE_LED0,
                polarity: Polarity::ActiveLow,
                label: "LED0",
            },
            BitMapping {
                bit: CMD_BIT_LED1,
                line: LINE_LED1,
                polarity: Polarity::ActiveHigh,
                label: "LED1",
            },
            BitMapping {
                bit: CMD_BIT_RELAY0,
                line: LINE_RELAY0,
                polarity: Polarity::ActiveHigh,
                label: "RELAY0",
            },
        ])
    }

    /// Rewrite every mapped line from `cmd` in one pass.
    pub fn apply(&self, cmd: u8, bank: &mut impl LineBank) {
        for m in &self.entries {
            let on = cmd & (1 << m.bit) != 0;
            bank.set_level(m.line, m.polarity.level_for(on));
        }
    }

    /// Bring-up: make every mapped line an output, driven to its inactive
    /// level so all components start off.
    pub fn configure(&self, bank: &mut impl LineBank) {
        for m in &self.entries {
            bank.configure_output(m.line);
            bank.set_level(m.line, m.polarity.level_for(false));
        }
    }

    /// Logical on/off of each mapped component as currently driven.
    pub fn states<'a>(
        &'a self,
        bank: &'a impl LineBank,
    ) -> impl Iterator<Item = (&'static str, bool)> + 'a {
        self.entries.iter().map(|m| {
            let on = match m.polarity {
                Polarity::ActiveHigh => bank.level(m.line).is_high(),
                Polarity::ActiveLow => !bank.level(m.line).is_high(),
            };
            (m.label, on)
        })
    }

    pub fn entries(&self) -> &[BitMapping] {
        &self.entries
    }
}
