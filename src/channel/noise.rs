//! Noise channel ($400C–$400F): envelope, 15-bit LFSR, length counter.
//!
//! Pseudo-random output from a linear-feedback shift register; the mode bit
//! moves the feedback tap and shortens the sequence to a metallic 93-step
//! loop. APU_Noise.

use super::units::{Envelope, LengthCounter};

/// Timer period table (NTSC), indexed by the 4-bit rate code in $400E.
/// Values are CPU cycles; the spacing is the hardware's, not linear.
const PERIOD_TABLE: [u16; 16] = [
    4, 8, 16, 32, 64, 96, 128, 160, 202, 254, 380, 508, 762, 1016, 2034, 4068,
];

/// Noise channel. The shift register is seeded to 1 at power-on; the XOR
/// feedback never steps a non-zero register into the all-zero state.
pub struct Noise {
    period_index: u8,
    timer: u16,
    mode: bool,
    shift: u16,
    pub envelope: Envelope,
    pub length: LengthCounter,
}

impl Noise {
    pub fn new() -> Self {
        Self {
            period_index: 0,
            timer: 0,
            mode: false,
            shift: 1,
            envelope: Envelope::default(),
            length: LengthCounter::default(),
        }
    }

    /// $400C: length halt / envelope loop (bit 5), constant volume (bit 4),
    /// volume/envelope period (bits 0–3).
    pub fn write_control(&mut self, data: u8) {
        self.length.set_halt(data & 0x20 != 0);
        self.envelope.write_control(data);
    }

    /// $400E: LFSR mode (bit 7), period table index (bits 0–3).
    pub fn write_period(&mut self, data: u8) {
        self.mode = data & 0x80 != 0;
        self.period_index = data & 0x0F;
    }

    /// $400F: length counter load (bits 3–7); restarts the envelope.
    pub fn write_length(&mut self, data: u8) {
        self.length.load(data >> 3);
        self.envelope.restart();
    }

    /// Timer clock (every CPU cycle); shifts the LFSR on expiry. Feedback is
    /// bit 0 XOR bit 6 (short mode) or bit 1 (long mode), inserted at bit 14.
    pub fn clock_timer(&mut self) {
        if self.timer > 0 {
            self.timer -= 1;
            return;
        }
        self.timer = PERIOD_TABLE[self.period_index as usize];
        let tap = if self.mode { 6 } else { 1 };
        let feedback = (self.shift & 1) ^ ((self.shift >> tap) & 1);
        self.shift = (self.shift >> 1) | (feedback << 14);
    }

    pub fn shift_register(&self) -> u16 {
        self.shift
    }

    /// Current sample (0–15): envelope volume while bit 0 of the LFSR is clear
    /// and the length counter is live.
    pub fn output(&self) -> u8 {
        if !self.length.active() || self.shift & 1 != 0 {
            return 0;
        }
        self.envelope.output()
    }
}

impl Default for Noise {
    fn default() -> Self {
        Self::new()
    }
}
