//! APU front end: register dispatch, frame counter, per-cycle advancement.
//!
//! [`apu::Apu`] is the context object the CPU collaborator owns and drives;
//! [`frame::FrameCounter`] is the $4017 sequencer fanning out quarter- and
//! half-frame clocks to the channels.

pub mod apu;
pub mod frame;

#[cfg(test)]
mod tests;
