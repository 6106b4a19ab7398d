//! Shared sequencer units: envelope, sweep, length counter.
//!
//! The 2A03 stamps the same small hardware blocks into several channels: both
//! pulses and the noise channel carry an [envelope](https://www.nesdev.org/wiki/APU_Envelope),
//! the pulses carry a [sweep](https://www.nesdev.org/wiki/APU_Sweep), and every
//! channel except the DMC is gated by a
//! [length counter](https://www.nesdev.org/wiki/APU_Length_Counter). They are
//! value types embedded in the channel structs and clocked by the frame counter.

/// Length counter lookup table: 5-bit index from the length register → count.
/// APU_Length_Counter.
const LENGTH_TABLE: [u8; 32] = [
    10, 254, 20, 2, 40, 4, 80, 6, 160, 8, 60, 10, 14, 12, 26, 14, 12, 16, 24, 18, 48, 20, 96, 22,
    192, 24, 72, 26, 16, 28, 32, 30,
];

/// Envelope generator: 15-step decay with optional loop, or a constant volume.
/// Clocked on quarter frames.
#[derive(Default)]
pub struct Envelope {
    loop_flag: bool,
    constant: bool,
    volume: u8,
    start: bool,
    divider: u8,
    decay: u8,
}

impl Envelope {
    /// Latch the low 6 bits of a $4000-style register write: loop (bit 5),
    /// constant volume (bit 4), volume/divider period (bits 0–3). Restarts the
    /// decay on the next quarter frame.
    pub fn write_control(&mut self, data: u8) {
        self.loop_flag = data & 0x20 != 0;
        self.constant = data & 0x10 != 0;
        self.volume = data & 0x0F;
        self.start = true;
    }

    /// Set the start flag (a write to the channel's length register does this too).
    pub fn restart(&mut self) {
        self.start = true;
    }

    /// Quarter-frame clock: divider counts down from the volume field; on expiry
    /// the decay level steps 15 → 0, wrapping back to 15 when looping.
    pub fn clock(&mut self) {
        if self.start {
            self.decay = 15;
            self.divider = self.volume;
            self.start = false;
        } else if self.divider > 0 {
            self.divider -= 1;
        } else {
            self.divider = self.volume;
            if self.decay > 0 {
                self.decay -= 1;
            } else if self.loop_flag {
                self.decay = 15;
            }
        }
    }

    /// Current volume: the volume field in constant mode, else the decay level.
    pub fn output(&self) -> u8 {
        if self.constant { self.volume } else { self.decay }
    }
}

/// Length counter: silences its channel once a register-programmed duration
/// (in half frames) has elapsed. The halt flag freezes the countdown.
#[derive(Default)]
pub struct LengthCounter {
    value: u8,
    halt: bool,
    enabled: bool,
}

impl LengthCounter {
    /// Load from the 5-bit table index; ignored while the channel is disabled.
    pub fn load(&mut self, index: u8) {
        if self.enabled {
            self.value = LENGTH_TABLE[(index & 0x1F) as usize];
        }
    }

    /// Halt bit from the channel's control register (shared with envelope loop).
    pub fn set_halt(&mut self, halt: bool) {
        self.halt = halt;
    }

    /// $4015 enable bit. Disabling zeroes the counter immediately.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.value = 0;
        }
    }

    /// Half-frame clock.
    pub fn clock(&mut self) {
        if !self.halt && self.value > 0 {
            self.value -= 1;
        }
    }

    /// True while the counter is non-zero (the channel may sound).
    pub fn active(&self) -> bool {
        self.value > 0
    }
}

/// Sweep unit: periodically re-tunes the owning pulse channel's timer period.
///
/// The two pulse units negate differently: unit 1 adds the ones' complement of
/// the shifted period (an extra −1), unit 2 the two's complement.
pub struct Sweep {
    enabled: bool,
    period: u8,
    negate: bool,
    shift: u8,
    divider: u8,
    reload: bool,
    ones_complement: bool,
}

impl Sweep {
    pub fn new(ones_complement: bool) -> Self {
        Self {
            enabled: false,
            period: 0,
            negate: false,
            shift: 0,
            divider: 0,
            reload: false,
            ones_complement,
        }
    }

    /// $4001/$4005 write: enable (bit 7), divider period (bits 4–6), negate
    /// (bit 3), shift count (bits 0–2). Flags the divider for reload.
    pub fn write_control(&mut self, data: u8) {
        self.enabled = data & 0x80 != 0;
        self.period = (data >> 4) & 7;
        self.negate = data & 0x08 != 0;
        self.shift = data & 7;
        self.reload = true;
    }

    /// Period the sweep is currently steering toward. Negative results clamp
    /// to zero; results above $7FF mute the channel (see [`Sweep::mutes`]).
    pub fn target(&self, timer_period: u16) -> u16 {
        let delta = (timer_period >> self.shift) as i32;
        let target = if self.negate {
            timer_period as i32 - delta - self.ones_complement as i32
        } else {
            timer_period as i32 + delta
        };
        target.max(0) as u16
    }

    /// True when the computed target leaves the 11-bit timer range. The channel
    /// is muted while this holds, but the stored period is untouched.
    pub fn mutes(&self, timer_period: u16) -> bool {
        self.target(timer_period) > 0x7FF
    }

    /// Half-frame clock. When the divider was at zero, applies the target
    /// period if the sweep is enabled with a non-zero shift and the target is
    /// in range; then the divider reloads (also on a pending register write).
    pub fn clock(&mut self, timer_period: &mut u16) {
        let due = self.divider == 0;

        if due || self.reload {
            self.divider = self.period;
            self.reload = false;
        } else {
            self.divider -= 1;
        }

        if due && self.enabled && self.shift != 0 {
            let target = self.target(*timer_period);
            if target <= 0x7FF {
                *timer_period = target;
            }
        }
    }
}
