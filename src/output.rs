//! Sample handoff to the audio sink.
//!
//! The simulation thread pushes mixed samples into a bounded queue; the sink
//! thread pulls them on its own clock. Neither side ever blocks on the other:
//! a full queue drops its oldest samples (overrun), an empty one hands the
//! sink silence (underrun). Both conditions are counted, not fatal.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rodio::Source;

struct Shared {
    samples: VecDeque<i16>,
    capacity: usize,
    overruns: u64,
    underruns: u64,
}

/// Bounded queue of signed 16-bit samples shared between the APU and the
/// audio sink. Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct SampleQueue {
    inner: Arc<Mutex<Shared>>,
}

impl SampleQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Shared {
                samples: VecDeque::with_capacity(capacity),
                capacity,
                overruns: 0,
                underruns: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        // A poisoned lock only means another thread panicked mid-push; the
        // queue contents are still plain samples, so keep going.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Push one sample; never blocks. When the queue is full the oldest
    /// sample is dropped and the overrun count goes up.
    pub fn push(&self, sample: i16) {
        let mut shared = self.lock();
        if shared.samples.len() == shared.capacity {
            shared.samples.pop_front();
            shared.overruns += 1;
        }
        shared.samples.push_back(sample);
    }

    /// Fill `out` from the front of the queue; returns how many samples were
    /// copied (the rest of `out` is untouched).
    pub fn fill(&self, out: &mut [i16]) -> usize {
        let mut shared = self.lock();
        let count = out.len().min(shared.samples.len());
        for (slot, sample) in out.iter_mut().zip(shared.samples.drain(..count)) {
            *slot = sample;
        }
        count
    }

    /// Pop one sample, or silence when the queue has run dry (underrun).
    pub fn pop_or_silence(&self) -> i16 {
        let mut shared = self.lock();
        match shared.samples.pop_front() {
            Some(sample) => sample,
            None => {
                shared.underruns += 1;
                0
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().samples.is_empty()
    }

    /// Samples dropped because the sink fell behind.
    pub fn overruns(&self) -> u64 {
        self.lock().overruns
    }

    /// Silence samples handed out because the simulation fell behind.
    pub fn underruns(&self) -> u64 {
        self.lock().underruns
    }
}

/// `rodio` source over a [`SampleQueue`]: mono, yields silence on underrun so
/// the output stream never starves.
pub struct QueueSource {
    queue: SampleQueue,
    sample_rate: u32,
}

impl QueueSource {
    pub fn new(queue: SampleQueue, sample_rate: u32) -> Self {
        Self { queue, sample_rate }
    }
}

impl Iterator for QueueSource {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        Some(self.queue.pop_or_silence())
    }
}

impl Source for QueueSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::SampleQueue;

    #[test]
    fn push_and_fill_in_order() {
        let queue = SampleQueue::new(8);
        for s in [3, 1, 4, 1, 5] {
            queue.push(s);
        }
        let mut out = [0i16; 5];
        assert_eq!(queue.fill(&mut out), 5);
        assert_eq!(out, [3, 1, 4, 1, 5]);
        assert!(queue.is_empty());
    }

    #[test]
    fn overrun_drops_oldest_and_counts() {
        let queue = SampleQueue::new(3);
        for s in 0..5 {
            queue.push(s);
        }
        assert_eq!(queue.overruns(), 2);
        let mut out = [0i16; 3];
        assert_eq!(queue.fill(&mut out), 3);
        assert_eq!(out, [2, 3, 4]);
    }

    #[test]
    fn underrun_yields_silence_and_counts() {
        let queue = SampleQueue::new(3);
        queue.push(7);
        assert_eq!(queue.pop_or_silence(), 7);
        assert_eq!(queue.pop_or_silence(), 0);
        assert_eq!(queue.underruns(), 1);
    }

    #[test]
    fn handles_share_one_queue() {
        let queue = SampleQueue::new(4);
        let sink_side = queue.clone();
        queue.push(9);
        assert_eq!(sink_side.pop_or_silence(), 9);
    }
}
