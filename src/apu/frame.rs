//! Frame counter ($4017): the clock divider behind envelope, sweep and
//! length-counter timing. APU_Frame_Counter.
//!
//! 4-step mode: quarter frames at CPU cycles 7457, 14913, 22371, 29829; half
//! frames at 14913 and 29829; IRQ at 29829 unless inhibited; 29830-cycle
//! sequence. 5-step mode: quarter frames at 7457, 14913, 22371, 37281; half
//! frames at 14913 and 37281; nothing at 29829, no IRQ; 37282-cycle sequence.

const STEP1: u32 = 7457;
const STEP2: u32 = 14913;
const STEP3: u32 = 22371;
const STEP4: u32 = 29829;
const STEP5: u32 = 37281;

const SEQ_4STEP: u32 = 29830;
const SEQ_5STEP: u32 = 37282;

/// Which sub-clocks fire on a given CPU cycle.
#[derive(Clone, Copy, Default)]
pub struct FrameTick {
    /// Clock envelopes and the triangle linear counter.
    pub quarter: bool,
    /// Additionally clock length counters and sweep units.
    pub half: bool,
}

/// The $4017 sequencer. A register write resets the sequence; selecting 5-step
/// mode also fires one immediate quarter+half clock.
pub struct FrameCounter {
    five_step: bool,
    irq_inhibit: bool,
    irq: bool,
    cycle: u32,
}

impl FrameCounter {
    /// Power-on: 4-step mode, IRQ enabled.
    pub fn new() -> Self {
        Self {
            five_step: false,
            irq_inhibit: false,
            irq: false,
            cycle: 0,
        }
    }

    /// $4017 write: mode (bit 7), IRQ inhibit (bit 6); resets the cycle
    /// counter. Inhibiting also acknowledges a pending frame IRQ. Returns true
    /// when the caller must fire an immediate quarter+half clock (5-step mode).
    pub fn write_control(&mut self, data: u8) -> bool {
        self.five_step = data & 0x80 != 0;
        self.irq_inhibit = data & 0x40 != 0;
        self.cycle = 0;
        if self.irq_inhibit {
            self.irq = false;
        }
        self.five_step
    }

    /// Advance one CPU cycle; reports which sub-clocks fire on this one.
    pub fn clock(&mut self) -> FrameTick {
        self.cycle += 1;
        let mut tick = FrameTick::default();

        match self.cycle {
            STEP1 | STEP3 => tick.quarter = true,
            STEP2 => {
                tick.quarter = true;
                tick.half = true;
            }
            STEP4 if !self.five_step => {
                tick.quarter = true;
                tick.half = true;
                if !self.irq_inhibit {
                    self.irq = true;
                }
            }
            STEP5 if self.five_step => {
                tick.quarter = true;
                tick.half = true;
            }
            _ => {}
        }

        let length = if self.five_step { SEQ_5STEP } else { SEQ_4STEP };
        if self.cycle >= length {
            self.cycle = 0;
        }
        tick
    }

    pub fn irq(&self) -> bool {
        self.irq
    }

    /// Reading $4015 acknowledges the frame IRQ.
    pub fn clear_irq(&mut self) {
        self.irq = false;
    }
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new()
    }
}
