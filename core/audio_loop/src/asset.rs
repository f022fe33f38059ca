//! The demo's audio asset, synthesized in memory as a WAV file.
//!
//! Layout: an intro phrase, then a loop phrase, then a short tail past the
//! loop end that an intro + loop stream never reaches.

use std::{io::Cursor, time::Duration};

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::synth::{SineOscillator, midi_note_hz};

const NOTE_LENGTH: Duration = Duration::from_millis(250);
const TAIL_LENGTH: Duration = Duration::from_secs(1);
/// Fade applied at both ends of every note to avoid clicks
const NOTE_FADE_FRAMES: usize = 64;
const AMPLITUDE: f32 = 0.3;

const INTRO_NOTES: [u8; 8] = [60, 64, 67, 72, 67, 64, 60, 55];
const LOOP_NOTES: [u8; 8] = [57, 60, 64, 69, 65, 69, 72, 67];
const TAIL_NOTE: u8 = 48;

/// Render the demo asset as 16-bit stereo WAV bytes.
pub fn render_wav(
    sample_rate: u32,
    intro: Duration,
    loop_length: Duration,
) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut buffer = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut buffer, spec)?;
    let mut osc = SineOscillator::new(0.0, sample_rate as f32);

    for (length, notes) in [
        (intro, &INTRO_NOTES[..]),
        (loop_length, &LOOP_NOTES[..]),
        (TAIL_LENGTH, &[TAIL_NOTE][..]),
    ] {
        let mono = render_phrase(&mut osc, sample_rate, length, notes);
        for sample in mono {
            let value = (sample * f32::from(i16::MAX)) as i16;
            writer.write_sample(value)?;
            writer.write_sample(value)?;
        }
    }
    writer.finalize()?;

    Ok(buffer.into_inner())
}

/// Exactly `length` worth of frames, cycling through `notes`.
fn render_phrase(
    osc: &mut SineOscillator,
    sample_rate: u32,
    length: Duration,
    notes: &[u8],
) -> Vec<f32> {
    let total = frames_in(sample_rate, length);
    let note_frames = frames_in(sample_rate, NOTE_LENGTH).max(1);

    let mut out = vec![0.0f32; total];
    for (chunk, &note) in out.chunks_mut(note_frames).zip(notes.iter().cycle()) {
        osc.set_freq(midi_note_hz(note));
        osc.fill(chunk);
        apply_envelope(chunk);
    }
    out
}

fn apply_envelope(note: &mut [f32]) {
    let len = note.len();
    let fade = NOTE_FADE_FRAMES.min(len / 2).max(1);
    for (i, sample) in note.iter_mut().enumerate() {
        let edge = i.min(len - 1 - i);
        let gain = if edge < fade {
            edge as f32 / fade as f32
        } else {
            1.0
        };
        *sample *= gain * AMPLITUDE;
    }
}

fn frames_in(sample_rate: u32, length: Duration) -> usize {
    (length.as_nanos() * u128::from(sample_rate) / 1_000_000_000) as usize
}
