//! DMC channel ($4010–$4013): delta-modulated sample playback.
//!
//! An autonomous reader walks a sample in external memory one byte at a time
//! and nudges a 7-bit output level up or down by 2 per bit. Sample address is
//! $C000 + (v × 64), length (v × 16) + 1 bytes; the read cursor wraps from
//! $FFFF back to $8000. APU_DMC.

/// Read-only sample memory the DMC fetches from; the CPU-visible PRG space in
/// a full console, a flat buffer in tests.
pub trait SampleMemory {
    fn read(&mut self, addr: u16) -> u8;
}

/// Rate table (NTSC), indexed by the 4-bit code in $4010: CPU cycles per
/// output bit.
const RATE_TABLE: [u16; 16] = [
    428, 380, 340, 320, 286, 254, 226, 214, 190, 160, 142, 128, 106, 84, 72, 54,
];

/// DMC channel state. `output_level` is a latch: silencing stops it from
/// moving but never zeroes it (a $4011 direct load persists through silence).
pub struct Dmc {
    enabled: bool,
    irq_enable: bool,
    irq: bool,
    loop_flag: bool,
    rate_index: u8,
    timer: u16,
    output_level: u8,
    sample_address: u16,
    sample_length: u16,
    current_address: u16,
    bytes_remaining: u16,
    shift: u8,
    bits_remaining: u8,
    silence: bool,
}

impl Dmc {
    pub fn new() -> Self {
        Self {
            enabled: false,
            irq_enable: false,
            irq: false,
            loop_flag: false,
            rate_index: 0,
            timer: 0,
            output_level: 0,
            sample_address: 0xC000,
            sample_length: 1,
            current_address: 0xC000,
            bytes_remaining: 0,
            shift: 0,
            bits_remaining: 0,
            silence: true,
        }
    }

    /// $4010: IRQ enable (bit 7), loop (bit 6), rate index (bits 0–3).
    /// Clearing IRQ enable acknowledges a pending DMC interrupt.
    pub fn write_control(&mut self, data: u8) {
        self.irq_enable = data & 0x80 != 0;
        if !self.irq_enable {
            self.irq = false;
        }
        self.loop_flag = data & 0x40 != 0;
        self.rate_index = data & 0x0F;
    }

    /// $4011: direct load of the 7-bit output level.
    pub fn write_load(&mut self, data: u8) {
        self.output_level = data & 0x7F;
    }

    /// $4012: sample start address = $C000 + (value × 64).
    pub fn write_address(&mut self, data: u8) {
        self.sample_address = 0xC000 + (data as u16) * 64;
    }

    /// $4013: sample length = (value × 16) + 1 bytes.
    pub fn write_length(&mut self, data: u8) {
        self.sample_length = (data as u16) * 16 + 1;
    }

    /// $4015 bit 4. Disabling zeroes the byte count (the current byte still
    /// drains); enabling restarts the sample only if the count is zero.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.bytes_remaining = 0;
        } else if self.bytes_remaining == 0 {
            self.current_address = self.sample_address;
            self.bytes_remaining = self.sample_length;
        }
    }

    /// True while sample bytes remain (the $4015 status bit).
    pub fn active(&self) -> bool {
        self.bytes_remaining > 0
    }

    pub fn irq(&self) -> bool {
        self.irq
    }

    /// Any $4015 write acknowledges the DMC interrupt.
    pub fn clear_irq(&mut self) {
        self.irq = false;
    }

    /// Timer clock (every CPU cycle). On expiry: refill the shift register if
    /// it has drained, then emit one delta bit unless silenced.
    pub fn clock_timer(&mut self, mem: &mut dyn SampleMemory) {
        if self.timer > 0 {
            self.timer -= 1;
            return;
        }
        self.timer = RATE_TABLE[self.rate_index as usize].saturating_sub(1);

        if self.bits_remaining == 0 {
            self.refill(mem);
        }
        if self.silence {
            return;
        }

        if self.shift & 1 != 0 {
            if self.output_level <= 125 {
                self.output_level += 2;
            }
        } else if self.output_level >= 2 {
            self.output_level -= 2;
        }
        self.shift >>= 1;
        self.bits_remaining -= 1;
    }

    /// Start a new 8-bit output cycle: loop or silence at end of sample
    /// (raising the IRQ when enabled), else fetch the next byte and advance
    /// the cursor, wrapping $FFFF → $8000.
    fn refill(&mut self, mem: &mut dyn SampleMemory) {
        if self.bytes_remaining == 0 {
            if self.enabled && self.loop_flag {
                self.current_address = self.sample_address;
                self.bytes_remaining = self.sample_length;
            } else {
                if !self.silence && self.irq_enable {
                    self.irq = true;
                }
                self.silence = true;
                return;
            }
        }

        self.shift = mem.read(self.current_address);
        self.current_address = self.current_address.wrapping_add(1);
        if self.current_address == 0 {
            self.current_address = 0x8000;
        }
        self.bytes_remaining -= 1;
        self.bits_remaining = 8;
        self.silence = false;
    }

    /// Current sample: the 7-bit level latch, silenced or not.
    pub fn output(&self) -> u8 {
        self.output_level
    }
}

impl Default for Dmc {
    fn default() -> Self {
        Self::new()
    }
}
