//! Pulse channels ($4000–$4003 = pulse 1, $4004–$4007 = pulse 2).
//!
//! Square wave with configurable duty, volume/envelope, frequency sweep and
//! length counter; 11-bit timer clocked every second CPU cycle. APU_Pulse.

use super::units::{Envelope, LengthCounter, Sweep};

/// Duty sequences (8 steps). Duty 0=12.5%, 1=25%, 2=50%, 3=25% negated.
/// The sequencer steps 0→7→6→…→1; output is the envelope volume when the
/// selected bit is 1, else 0.
const DUTY: [[u8; 8]; 4] = [
    [0, 0, 0, 0, 0, 0, 0, 1], // 12.5%
    [0, 0, 0, 0, 0, 0, 1, 1], // 25%
    [0, 0, 0, 0, 1, 1, 1, 1], // 50%
    [1, 1, 1, 1, 1, 1, 0, 0], // 25% negated
];

/// One pulse channel. The two units run identical logic except for the sweep
/// negate polarity (see [`Sweep`]).
pub struct Pulse {
    timer_period: u16,
    timer: u16,
    duty: u8,
    step: u8,
    pub envelope: Envelope,
    pub sweep: Sweep,
    pub length: LengthCounter,
}

impl Pulse {
    /// `ones_complement` is true for pulse 1: its sweep subtracts one extra
    /// when negating.
    pub fn new(ones_complement: bool) -> Self {
        Self {
            timer_period: 0,
            timer: 0,
            duty: 0,
            step: 0,
            envelope: Envelope::default(),
            sweep: Sweep::new(ones_complement),
            length: LengthCounter::default(),
        }
    }

    /// $4000/$4004: duty (bits 6–7), length halt / envelope loop (bit 5),
    /// constant volume (bit 4), volume/envelope period (bits 0–3).
    pub fn write_control(&mut self, data: u8) {
        self.duty = (data >> 6) & 3;
        self.length.set_halt(data & 0x20 != 0);
        self.envelope.write_control(data);
    }

    /// $4001/$4005: sweep setup.
    pub fn write_sweep(&mut self, data: u8) {
        self.sweep.write_control(data);
    }

    /// $4002/$4006: timer period low 8 bits.
    pub fn write_timer_low(&mut self, data: u8) {
        self.timer_period = (self.timer_period & 0x0700) | data as u16;
    }

    /// $4003/$4007: length counter load (bits 3–7), timer period high 3 bits;
    /// restarts the envelope and the duty sequence.
    pub fn write_length(&mut self, data: u8) {
        self.timer_period = (self.timer_period & 0x00FF) | ((data & 7) as u16) << 8;
        self.length.load(data >> 3);
        self.envelope.restart();
        self.step = 0;
    }

    pub fn timer_period(&self) -> u16 {
        self.timer_period
    }

    /// Timer clock (call every second CPU cycle); advances the duty sequencer
    /// on expiry.
    pub fn clock_timer(&mut self) {
        if self.timer > 0 {
            self.timer -= 1;
        } else {
            self.timer = self.timer_period;
            self.step = self.step.wrapping_sub(1) & 7;
        }
    }

    /// Half-frame clock for the sweep unit; may re-tune the timer period.
    pub fn clock_sweep(&mut self) {
        self.sweep.clock(&mut self.timer_period);
    }

    /// Current sample (0–15). Silent when the length counter has expired, the
    /// period is below the hardware minimum of 8, the sweep target overflows
    /// the 11-bit range, or the duty bit for this step is low.
    pub fn output(&self) -> u8 {
        if !self.length.active()
            || self.timer_period < 8
            || self.sweep.mutes(self.timer_period)
            || DUTY[self.duty as usize][self.step as usize] == 0
        {
            return 0;
        }
        self.envelope.output()
    }
}
