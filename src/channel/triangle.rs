//! Triangle channel ($4008–$400B): 32-step ramp, linear counter, length counter.
//!
//! The timer runs at CPU rate, which puts the triangle one octave below a
//! pulse channel programmed with the same period. No volume control. APU_Triangle.

use super::units::LengthCounter;

/// 32-step triangle waveform: 15 down to 0, then 0 up to 15.
const SEQUENCE: [u8; 32] = [
    15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12,
    13, 14, 15,
];

/// Triangle channel: gated by both the length counter and the 7-bit linear
/// counter; the sequencer only advances while both are non-zero.
#[derive(Default)]
pub struct Triangle {
    timer_period: u16,
    timer: u16,
    step: u8,
    control: bool,
    linear_load: u8,
    linear: u8,
    linear_reload: bool,
    pub length: LengthCounter,
}

impl Triangle {
    pub fn new() -> Self {
        Self::default()
    }

    /// $4008: control / length halt (bit 7), linear counter load (bits 0–6).
    pub fn write_control(&mut self, data: u8) {
        self.control = data & 0x80 != 0;
        self.length.set_halt(self.control);
        self.linear_load = data & 0x7F;
    }

    /// $400A: timer period low 8 bits.
    pub fn write_timer_low(&mut self, data: u8) {
        self.timer_period = (self.timer_period & 0x0700) | data as u16;
    }

    /// $400B: length counter load, timer period high 3 bits; sets the linear
    /// counter reload flag.
    pub fn write_length(&mut self, data: u8) {
        self.timer_period = (self.timer_period & 0x00FF) | ((data & 7) as u16) << 8;
        self.length.load(data >> 3);
        self.linear_reload = true;
    }

    /// Quarter-frame clock for the linear counter: reload while the flag is
    /// set, else count down; the flag only clears when the control bit is low.
    pub fn clock_linear(&mut self) {
        if self.linear_reload {
            self.linear = self.linear_load;
        } else if self.linear > 0 {
            self.linear -= 1;
        }
        if !self.control {
            self.linear_reload = false;
        }
    }

    /// Timer clock (every CPU cycle); advances the sequencer while both
    /// counters are live.
    pub fn clock_timer(&mut self) {
        if self.timer > 0 {
            self.timer -= 1;
            return;
        }
        self.timer = self.timer_period;
        if self.length.active() && self.linear > 0 {
            self.step = (self.step + 1) & 31;
        }
    }

    /// Current sample (0–15). Ultrasonic periods (< 2) are muted as well; they
    /// would only alias at any practical sample rate.
    pub fn output(&self) -> u8 {
        if !self.length.active() || self.linear == 0 || self.timer_period < 2 {
            return 0;
        }
        SEQUENCE[self.step as usize]
    }
}
