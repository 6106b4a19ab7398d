//! Channel mixer: the 2A03's non-linear DAC combination (APU_Mixer).
//!
//! The pulse pair and the triangle/noise/DMC group feed two separate resistor
//! ladders; both curves map a zero input to exactly zero output, so a muted
//! channel contributes nothing, not a residual level.

/// Pulse group: 95.52 / (8128/n + 100), n = pulse1 + pulse2 (0–30).
fn pulse_level(n: u16) -> f32 {
    if n == 0 {
        return 0.0;
    }
    95.52 / (8128.0 / n as f32 + 100.0)
}

/// TND group: 163.67 / (24329/n + 100), n = 3·triangle + 2·noise + dmc (0–202).
fn tnd_level(n: u16) -> f32 {
    if n == 0 {
        return 0.0;
    }
    163.67 / (24329.0 / n as f32 + 100.0)
}

/// Combine the five channel outputs into one signed 16-bit sample. The summed
/// curves span roughly 0.0–1.0; scaled so full drive lands near i16::MAX and
/// silence at exactly 0.
pub fn mix(pulse1: u8, pulse2: u8, triangle: u8, noise: u8, dmc: u8) -> i16 {
    let pulse = pulse_level(pulse1 as u16 + pulse2 as u16);
    let tnd = tnd_level(3 * triangle as u16 + 2 * noise as u16 + dmc as u16);
    ((pulse + tnd) * 32767.0) as i16
}

#[cfg(test)]
mod tests {
    use super::mix;

    #[test]
    fn silence_mixes_to_exactly_zero() {
        assert_eq!(mix(0, 0, 0, 0, 0), 0);
    }

    #[test]
    fn levels_are_monotonic_in_each_channel() {
        let mut last = -1;
        for v in 0..=15 {
            let s = mix(v, 0, 0, 0, 0);
            assert!(s as i32 > last as i32, "pulse level {v} did not increase");
            last = s;
        }
        assert!(mix(0, 0, 15, 0, 0) > mix(0, 0, 7, 0, 0));
        assert!(mix(0, 0, 0, 15, 0) > mix(0, 0, 0, 7, 0));
        assert!(mix(0, 0, 0, 0, 127) > mix(0, 0, 0, 0, 64));
    }

    #[test]
    fn full_drive_stays_in_range() {
        let s = mix(15, 15, 15, 15, 127);
        assert!(s > 0);
        assert!(s <= i16::MAX);
    }
}
