use std::f32::consts::PI;

/// Frequency of a MIDI note number in Hz (A4 = 69 = 440 Hz)
pub fn midi_note_hz(note: u8) -> f32 {
    440.0 * 2f32.powf((f32::from(note) - 69.0) / 12.0)
}

#[derive(Debug, Clone, Copy)]
pub struct SineOscillator {
    freq: f32,
    sample_rate: f32,
    phase: f32,
}

impl SineOscillator {
    pub fn new(freq: f32, sample_rate: f32) -> Self {
        Self {
            freq,
            sample_rate,
            phase: 0.0,
        }
    }

    pub fn set_freq(&mut self, freq: f32) {
        self.freq = freq;
    }

    pub fn next_sample(&mut self) -> f32 {
        let phase_increment = 2.0 * PI * self.freq / self.sample_rate;

        let sample = self.phase.sin();
        self.phase += phase_increment;
        if self.phase >= 2.0 * PI {
            self.phase -= 2.0 * PI;
        }
        sample
    }

    /// Fill `out` with consecutive samples
    pub fn fill(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::AUDIO_SAMPLE_EPSILON;

    #[test]
    fn test_a4_is_440_hz() {
        assert!((midi_note_hz(69) - 440.0).abs() < AUDIO_SAMPLE_EPSILON);
        assert!((midi_note_hz(81) - 880.0).abs() < 1e-3);
    }

    #[test]
    fn test_starts_at_zero_and_stays_in_range() {
        let mut osc = SineOscillator::new(440.0, 22050.0);
        let mut out = vec![0.0f32; 1024];
        osc.fill(&mut out);

        assert!(out[0].abs() < AUDIO_SAMPLE_EPSILON);
        assert!(out.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn test_quarter_period_reaches_peak() {
        // 1 Hz at 4 samples per second peaks on the second sample
        let mut osc = SineOscillator::new(1.0, 4.0);
        osc.next_sample();
        assert!((osc.next_sample() - 1.0).abs() < AUDIO_SAMPLE_EPSILON);
    }
}
