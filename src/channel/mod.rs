//! The five 2A03 sound channels and their shared sequencer units.
//!
//! - **pulse** (×2): duty sequencer, envelope, sweep, length counter.
//! - **triangle**: 32-step ramp, linear counter, length counter.
//! - **noise**: 15-bit LFSR, envelope, length counter.
//! - **dmc**: delta-modulated sample playback from external memory.
//! - **units**: the envelope/sweep/length-counter blocks the channels embed.

pub mod dmc;
pub mod noise;
pub mod pulse;
pub mod triangle;
pub mod units;
