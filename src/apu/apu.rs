//! The APU context object: register dispatch, per-cycle advancement, status.
//!
//! The CPU collaborator interleaves `write`/`read_status` with `tick`; nothing
//! here is global, so multiple consoles can run side by side. One mixed sample
//! is pushed to the output queue every `cpu_clock / sample_rate` CPU cycles,
//! with the fractional remainder carried so the rate never drifts.

use crate::apu::frame::FrameCounter;
use crate::channel::dmc::{Dmc, SampleMemory};
use crate::channel::noise::Noise;
use crate::channel::pulse::Pulse;
use crate::channel::triangle::Triangle;
use crate::mixer;
use crate::output::SampleQueue;

/// NTSC 2A03 CPU clock in Hz.
pub const NTSC_CPU_CLOCK: u32 = 1_789_773;
/// PAL 2A07 CPU clock in Hz.
pub const PAL_CPU_CLOCK: u32 = 1_662_607;

/// Default output sample rate.
pub const SAMPLE_RATE: u32 = 44_100;

/// The five channels, frame counter and mixer behind registers $4000–$4017.
pub struct Apu {
    pulse1: Pulse,
    pulse2: Pulse,
    triangle: Triangle,
    noise: Noise,
    dmc: Dmc,
    frame: FrameCounter,
    cycle: u64,
    sample_rate: u32,
    cycles_per_sample: f64,
    sample_clock: f64,
    queue: SampleQueue,
}

impl Apu {
    /// NTSC clock, 44.1 kHz output.
    pub fn new() -> Self {
        Self::with_rates(NTSC_CPU_CLOCK, SAMPLE_RATE)
    }

    /// Custom input clock (e.g. [`PAL_CPU_CLOCK`]) and output sample rate.
    pub fn with_rates(cpu_clock: u32, sample_rate: u32) -> Self {
        Self {
            pulse1: Pulse::new(true),
            pulse2: Pulse::new(false),
            triangle: Triangle::new(),
            noise: Noise::new(),
            dmc: Dmc::new(),
            frame: FrameCounter::new(),
            cycle: 0,
            sample_rate,
            cycles_per_sample: cpu_clock as f64 / sample_rate as f64,
            sample_clock: 0.0,
            // Bound the queue at a quarter second; a stalled sink drops the
            // oldest samples rather than growing latency without limit.
            queue: SampleQueue::new((sample_rate / 4) as usize),
        }
    }

    /// Handle for the audio-sink side of the output queue. Clones share the
    /// same queue, so this can be handed to the sink thread.
    pub fn samples(&self) -> SampleQueue {
        self.queue.clone()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Write to the APU registers. $4000–$4013 = channel registers, $4015 =
    /// channel enables, $4017 = frame counter; anything else is a no-op.
    pub fn write(&mut self, addr: u16, data: u8) {
        match addr {
            0x4000 => self.pulse1.write_control(data),
            0x4001 => self.pulse1.write_sweep(data),
            0x4002 => self.pulse1.write_timer_low(data),
            0x4003 => self.pulse1.write_length(data),
            0x4004 => self.pulse2.write_control(data),
            0x4005 => self.pulse2.write_sweep(data),
            0x4006 => self.pulse2.write_timer_low(data),
            0x4007 => self.pulse2.write_length(data),
            0x4008 => self.triangle.write_control(data),
            0x400A => self.triangle.write_timer_low(data),
            0x400B => self.triangle.write_length(data),
            0x400C => self.noise.write_control(data),
            0x400E => self.noise.write_period(data),
            0x400F => self.noise.write_length(data),
            0x4010 => self.dmc.write_control(data),
            0x4011 => self.dmc.write_load(data),
            0x4012 => self.dmc.write_address(data),
            0x4013 => self.dmc.write_length(data),
            0x4015 => self.write_status(data),
            0x4017 => {
                if self.frame.write_control(data) {
                    self.clock_quarter_frame();
                    self.clock_half_frame();
                }
            }
            _ => {}
        }
    }

    /// $4015 write: per-channel enables. A cleared bit zeroes that channel's
    /// length counter at once; bit 4 starts/stops the DMC sample. Always
    /// acknowledges the DMC interrupt.
    fn write_status(&mut self, data: u8) {
        self.pulse1.length.set_enabled(data & 0x01 != 0);
        self.pulse2.length.set_enabled(data & 0x02 != 0);
        self.triangle.length.set_enabled(data & 0x04 != 0);
        self.noise.length.set_enabled(data & 0x08 != 0);
        self.dmc.set_enabled(data & 0x10 != 0);
        self.dmc.clear_irq();
    }

    /// $4015 read: bits 0–3 = length counter live for pulse 1/2, triangle,
    /// noise; bit 4 = DMC bytes remaining; bit 6 = frame IRQ; bit 7 = DMC IRQ.
    /// Reading acknowledges the frame IRQ (only).
    pub fn read_status(&mut self) -> u8 {
        let mut status = 0;
        if self.pulse1.length.active() {
            status |= 0x01;
        }
        if self.pulse2.length.active() {
            status |= 0x02;
        }
        if self.triangle.length.active() {
            status |= 0x04;
        }
        if self.noise.length.active() {
            status |= 0x08;
        }
        if self.dmc.active() {
            status |= 0x10;
        }
        if self.frame.irq() {
            status |= 0x40;
        }
        if self.dmc.irq() {
            status |= 0x80;
        }
        self.frame.clear_irq();
        status
    }

    /// Interrupt line to the CPU collaborator: frame IRQ OR DMC IRQ.
    pub fn irq(&self) -> bool {
        self.frame.irq() || self.dmc.irq()
    }

    /// Return every unit to power-on defaults. The output queue (and any sink
    /// holding a clone of it) survives the reset.
    pub fn reset(&mut self) {
        self.pulse1 = Pulse::new(true);
        self.pulse2 = Pulse::new(false);
        self.triangle = Triangle::new();
        self.noise = Noise::new();
        self.dmc = Dmc::new();
        self.frame = FrameCounter::new();
        self.cycle = 0;
        self.sample_clock = 0.0;
    }

    /// Quarter frame: clock envelopes and the triangle linear counter.
    fn clock_quarter_frame(&mut self) {
        self.pulse1.envelope.clock();
        self.pulse2.envelope.clock();
        self.noise.envelope.clock();
        self.triangle.clock_linear();
    }

    /// Half frame: additionally clock length counters and sweep units.
    fn clock_half_frame(&mut self) {
        self.pulse1.length.clock();
        self.pulse2.length.clock();
        self.triangle.length.clock();
        self.noise.length.clock();
        self.pulse1.clock_sweep();
        self.pulse2.clock_sweep();
    }

    /// Advance `cycles` CPU cycles: frame counter, channel timers (pulse
    /// timers on every second cycle), DMC fetches through `mem`, and one
    /// mixed sample per output period.
    pub fn tick(&mut self, cycles: usize, mem: &mut dyn SampleMemory) {
        for _ in 0..cycles {
            self.cycle += 1;

            let frame = self.frame.clock();
            if frame.quarter {
                self.clock_quarter_frame();
            }
            if frame.half {
                self.clock_half_frame();
            }

            if self.cycle % 2 == 0 {
                self.pulse1.clock_timer();
                self.pulse2.clock_timer();
            }
            self.triangle.clock_timer();
            self.noise.clock_timer();
            self.dmc.clock_timer(mem);

            self.sample_clock += 1.0;
            if self.sample_clock >= self.cycles_per_sample {
                self.sample_clock -= self.cycles_per_sample;
                self.queue.push(mixer::mix(
                    self.pulse1.output(),
                    self.pulse2.output(),
                    self.triangle.output(),
                    self.noise.output(),
                    self.dmc.output(),
                ));
            }
        }
    }
}

impl Default for Apu {
    fn default() -> Self {
        Self::new()
    }
}
