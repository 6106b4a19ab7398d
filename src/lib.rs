//! Pentatone: a cycle-stepped emulation core for the NES APU (Ricoh 2A03 audio).
//!
//! Implements the five-channel sound generator of the 2A03 as documented on the
//! [NESdev Wiki](https://www.nesdev.org/wiki/APU): two pulse channels, triangle,
//! noise, DMC, the [frame counter](https://www.nesdev.org/wiki/APU_Frame_Counter)
//! (4-step or 5-step), and the [APU Mixer](https://www.nesdev.org/wiki/APU_Mixer)
//! (non-linear). Registers $4000–$4013, $4015, $4017.
//!
//! The CPU collaborator drives the core through [`apu::apu::Apu`]: `write` for
//! register writes, `tick` once per CPU cycle, `read_status` for $4015 and `irq`
//! for the interrupt line. Mixed 16-bit samples land in a bounded
//! [`output::SampleQueue`] that the audio-sink thread drains on its own clock.
//!
//! ## Modules (NESdev references)
//!
//! - **apu** – [APU registers](https://www.nesdev.org/wiki/APU_registers): register
//!   dispatch, frame counter, per-cycle advancement, status/IRQ
//! - **channel** – [APU Pulse](https://www.nesdev.org/wiki/APU_Pulse),
//!   [APU Triangle](https://www.nesdev.org/wiki/APU_Triangle),
//!   [APU Noise](https://www.nesdev.org/wiki/APU_Noise),
//!   [APU DMC](https://www.nesdev.org/wiki/APU_DMC), and the shared
//!   envelope/sweep/length-counter units
//! - **mixer** – non-linear pulse and TND combination → signed 16-bit samples
//! - **output** – bounded sample queue and `rodio` source for the sink thread

pub mod apu;
pub mod channel;
pub mod mixer;
pub mod output;
