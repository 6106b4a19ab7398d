use std::collections::HashSet;

use crate::apu::apu::Apu;
use crate::channel::dmc::SampleMemory;

/// Empty sample memory for tests that never reach the DMC.
struct NoSamples;

impl SampleMemory for NoSamples {
    fn read(&mut self, _addr: u16) -> u8 {
        0
    }
}

/// Run the APU for one simulated second, draining the queue in 0.1 s chunks
/// so the bounded queue never overruns.
fn run_one_second(apu: &mut Apu) -> Vec<i16> {
    let queue = apu.samples();
    let mut mem = NoSamples;
    let mut samples = Vec::new();
    let mut chunk = [0i16; 8192];
    for _ in 0..10 {
        apu.tick(178_977, &mut mem);
        let n = queue.fill(&mut chunk);
        samples.extend_from_slice(&chunk[..n]);
    }
    samples
}

#[test]
fn four_step_mode_raises_irq_once_per_sequence() {
    let mut apu = Apu::new();
    let mut mem = NoSamples;
    apu.write(0x4017, 0x00);

    apu.tick(29_828, &mut mem);
    assert!(!apu.irq());
    apu.tick(1, &mut mem);
    assert!(apu.irq(), "IRQ due at cycle 29829");

    // Reading $4015 reports and acknowledges the frame IRQ.
    assert_ne!(apu.read_status() & 0x40, 0);
    assert!(!apu.irq());
    assert_eq!(apu.read_status() & 0x40, 0);

    // Exactly one more sequence until the next IRQ.
    apu.tick(29_829, &mut mem);
    assert!(!apu.irq());
    apu.tick(1, &mut mem);
    assert!(apu.irq());
}

#[test]
fn irq_inhibit_suppresses_and_acknowledges() {
    let mut apu = Apu::new();
    let mut mem = NoSamples;
    apu.write(0x4017, 0x00);
    apu.tick(29_829, &mut mem);
    assert!(apu.irq());

    // Setting the inhibit bit clears the pending flag too.
    apu.write(0x4017, 0x40);
    assert!(!apu.irq());
    apu.tick(100_000, &mut mem);
    assert!(!apu.irq());
}

#[test]
fn five_step_mode_never_raises_irq() {
    let mut apu = Apu::new();
    let mut mem = NoSamples;
    apu.write(0x4017, 0x80);
    apu.tick(200_000, &mut mem);
    assert!(!apu.irq());
    assert_eq!(apu.read_status() & 0x40, 0);
}

#[test]
fn five_step_write_fires_an_immediate_half_frame() {
    let mut apu = Apu::new();
    apu.write(0x4015, 0x01);
    apu.write(0x4003, 0x18); // length entry 3 = 2 half frames
    assert_ne!(apu.read_status() & 0x01, 0);

    // Each $4017 write selecting 5-step mode clocks length counters at once.
    apu.write(0x4017, 0x80);
    assert_ne!(apu.read_status() & 0x01, 0);
    apu.write(0x4017, 0x80);
    assert_eq!(apu.read_status() & 0x01, 0);
}

#[test]
fn unmapped_addresses_are_ignored() {
    let mut apu = Apu::new();
    let mut mem = NoSamples;
    apu.write(0x4009, 0xFF); // triangle's unused slot
    apu.write(0x400D, 0xFF); // noise's unused slot
    apu.write(0x5000, 0xFF);
    apu.tick(1000, &mut mem);
    assert_eq!(apu.read_status() & 0x0F, 0);
}

#[test]
fn status_read_reports_dmc_bytes_remaining() {
    let mut apu = Apu::new();
    apu.write(0x4013, 0x01); // 17-byte sample
    apu.write(0x4015, 0x10);
    assert_ne!(apu.read_status() & 0x10, 0);

    apu.write(0x4015, 0x00);
    assert_eq!(apu.read_status() & 0x10, 0);
}

#[test]
fn pulse_tone_has_programmed_frequency_and_duty() {
    let mut apu = Apu::new();
    apu.write(0x4017, 0x40); // inhibit the frame IRQ; clocks still run
    apu.write(0x4015, 0x01);
    apu.write(0x4000, 0x38); // duty 12.5%, halt, constant volume 8
    apu.write(0x4002, 0xFE); // timer period 254
    apu.write(0x4003, 0x08); // timer high 0, length entry 1

    let samples = run_one_second(&mut apu);
    assert!(samples.len() > 44_000);

    // Expected tone: 1789773 / (16 × 255) ≈ 438.7 Hz at 12.5% duty.
    let highs = samples.iter().filter(|&&s| s > 0).count();
    let ratio = highs as f64 / samples.len() as f64;
    assert!((0.115..=0.135).contains(&ratio), "duty ratio was {ratio}");

    let edges = samples
        .windows(2)
        .filter(|w| w[0] == 0 && w[1] > 0)
        .count();
    assert!((436..=441).contains(&edges), "counted {edges} cycles");

    // Constant volume: every high sample sits at the same mixed level.
    let high = samples.iter().copied().find(|&s| s > 0).unwrap();
    assert!(samples.iter().all(|&s| s == 0 || s == high));
}

#[test]
fn disabling_a_channel_zeroes_output_immediately() {
    let mut apu = Apu::new();
    let queue = apu.samples();
    let mut mem = NoSamples;
    apu.write(0x4015, 0x01);
    apu.write(0x4000, 0x38);
    apu.write(0x4002, 0xFE);
    apu.write(0x4003, 0x08);

    apu.tick(100_000, &mut mem);
    let mut chunk = [0i16; 4096];
    let n = queue.fill(&mut chunk);
    assert!(chunk[..n].iter().any(|&s| s > 0), "tone should be audible");

    apu.write(0x4015, 0x00);
    assert_eq!(apu.read_status() & 0x01, 0);

    apu.tick(1_000, &mut mem);
    let n = queue.fill(&mut chunk);
    assert!(n > 0);
    assert!(
        chunk[..n].iter().all(|&s| s == 0),
        "no residual output after disable"
    );
}

#[test]
fn triangle_output_ramps_through_many_levels() {
    let mut apu = Apu::new();
    apu.write(0x4015, 0x04);
    apu.write(0x4008, 0xFF); // control set, linear load 127
    apu.write(0x400A, 0x80); // timer period 128
    apu.write(0x400B, 0x08);

    let samples = run_one_second(&mut apu);
    let levels: HashSet<i16> = samples.into_iter().collect();
    assert!(levels.len() >= 12, "only {} distinct levels", levels.len());
}

#[test]
fn queue_overrun_is_counted_not_fatal() {
    let mut apu = Apu::new();
    let queue = apu.samples();
    let mut mem = NoSamples;

    // A full second with nobody draining: far beyond the queue bound.
    apu.tick(1_789_773, &mut mem);
    assert_eq!(queue.len(), 11_025);
    assert!(queue.overruns() > 30_000);
}

#[test]
fn reset_returns_to_power_on_defaults() {
    let mut apu = Apu::new();
    let mut mem = NoSamples;
    apu.write(0x4015, 0x0F);
    apu.write(0x4003, 0x08);
    apu.write(0x400F, 0x08);
    apu.write(0x4017, 0x00);
    apu.tick(50_000, &mut mem);

    apu.reset();
    assert_eq!(apu.read_status(), 0);
    assert!(!apu.irq());

    // Still runs cleanly from the reset state.
    apu.tick(50_000, &mut mem);
}
