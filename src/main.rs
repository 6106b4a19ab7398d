//! Demo entry point: programs a short jingle into the APU registers and plays
//! it through the host audio device.
//!
//! Usage: pentatone

use std::thread;
use std::time::Duration;

use pentatone::apu::apu::{Apu, NTSC_CPU_CLOCK};
use pentatone::channel::dmc::SampleMemory;
use pentatone::output::QueueSource;
use rodio::{OutputStream, Sink};

/// No cartridge in the demo; the DMC reads silence.
struct NoSamples;

impl SampleMemory for NoSamples {
    fn read(&mut self, _addr: u16) -> u8 {
        0
    }
}

/// 11-bit pulse timer period for a tone: f = clock / (16 × (t + 1)).
fn pulse_period(freq: f64) -> u16 {
    (NTSC_CPU_CLOCK as f64 / (16.0 * freq) - 1.0).round() as u16 & 0x7FF
}

/// The triangle sounds one octave below a pulse with the same period.
fn triangle_period(freq: f64) -> u16 {
    (NTSC_CPU_CLOCK as f64 / (32.0 * freq) - 1.0).round() as u16 & 0x7FF
}

fn main() {
    let mut apu = Apu::new();
    let mut mem = NoSamples;

    let (_stream, handle) = OutputStream::try_default().expect("no audio output device");
    let sink = Sink::try_new(&handle).expect("failed to open audio sink");
    sink.append(QueueSource::new(apu.samples(), apu.sample_rate()));

    apu.write(0x4017, 0x40); // 4-step, IRQ inhibited
    apu.write(0x4015, 0x05); // pulse 1 + triangle

    // A-minor arpeggio on pulse 1, with the triangle an octave below.
    let melody = [440.0, 523.25, 659.25, 880.0, 659.25, 523.25, 440.0, 329.63];

    for &freq in &melody {
        let p = pulse_period(freq);
        apu.write(0x4000, 0xBF); // duty 50%, halt, constant volume 15
        apu.write(0x4002, (p & 0xFF) as u8);
        apu.write(0x4003, (p >> 8) as u8);

        let t = triangle_period(freq / 2.0);
        apu.write(0x4008, 0xFF); // control set, linear load 127
        apu.write(0x400A, (t & 0xFF) as u8);
        apu.write(0x400B, (t >> 8) as u8);

        // Quarter-second note, simulated in 10 ms slices to pace real time.
        for _ in 0..25 {
            apu.tick((NTSC_CPU_CLOCK / 100) as usize, &mut mem);
            thread::sleep(Duration::from_millis(10));
        }
    }

    apu.write(0x4015, 0x00);
    thread::sleep(Duration::from_millis(300)); // let the sink drain

    let dropped = apu.samples().overruns();
    if dropped > 0 {
        eprintln!("audio overrun: dropped {dropped} samples");
    }
}
