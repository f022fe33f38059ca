use std::{io::Read, time::Duration};

use hound::{SampleFormat, WavReader};
use transport::format::FrameLayout;

use crate::{context::AudioContext, error::DecodeError, stream::bytes::BytesReadSeekCloser};

/// A fully decoded asset in the context's output format: interleaved stereo,
/// signed 16-bit little-endian PCM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAudio {
    bytes: Vec<u8>,
    sample_rate: u32,
    layout: FrameLayout,
}

impl DecodedAudio {
    pub fn len_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    pub fn duration(&self) -> Duration {
        transport::clock::PlaybackClock::new(self.sample_rate, self.layout)
            .bytes_to_duration(self.len_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hand the PCM buffer over to a seekable, closable stream
    pub fn into_stream(self) -> BytesReadSeekCloser {
        BytesReadSeekCloser::new(self.bytes)
    }
}

/// Decode a RIFF/WAVE stream for playback in `context`.
///
/// Supports:
/// - Mono and stereo files (mono is duplicated into both channels)
/// - 8 to 32-bit integer or 32-bit float samples (converted to 16-bit)
///
/// Does NOT support:
/// - More than 2 channels
/// - Sample rates other than the context rate (no resampling)
pub fn decode<R: Read>(context: &AudioContext, src: R) -> Result<DecodedAudio, DecodeError> {
    let reader = WavReader::new(src)?;
    let spec = reader.spec();

    if spec.channels == 0 || spec.channels > 2 {
        return Err(DecodeError::UnsupportedChannels(spec.channels));
    }
    if spec.sample_rate != context.sample_rate() {
        return Err(DecodeError::SampleRateMismatch {
            expected: context.sample_rate(),
            actual: spec.sample_rate,
        });
    }

    let samples = decode_pcm_samples(reader)?;
    let stereo = interleave_stereo(samples, spec.channels);

    let mut bytes = Vec::with_capacity(stereo.len() * 2);
    for sample in stereo {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }

    let decoded = DecodedAudio {
        bytes,
        sample_rate: spec.sample_rate,
        layout: context.layout(),
    };
    log::debug!(
        "decoded {} bytes ({:.2}s) from {}-channel {}-bit WAV",
        decoded.len_bytes(),
        decoded.duration().as_secs_f64(),
        spec.channels,
        spec.bits_per_sample
    );
    Ok(decoded)
}

fn decode_pcm_samples<R: Read>(reader: WavReader<R>) -> Result<Vec<i16>, DecodeError> {
    let spec = reader.spec();
    let bits = spec.bits_per_sample;

    let samples = match (spec.sample_format, bits) {
        (SampleFormat::Int, 1..=32) => reader
            .into_samples::<i32>()
            .map(|s| s.map(|s| int_to_i16(s, bits)))
            .collect::<Result<Vec<i16>, _>>()?,
        (SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .map(|s| s.map(float_to_i16))
            .collect::<Result<Vec<i16>, _>>()?,
        (format, bits) => return Err(DecodeError::UnsupportedSampleFormat { bits, format }),
    };

    Ok(samples)
}

fn int_to_i16(sample: i32, bits: u16) -> i16 {
    if bits > 16 {
        (sample >> (bits - 16)) as i16
    } else {
        (sample << (16 - bits)) as i16
    }
}

fn float_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16
}

/// Mono is duplicated into both channels; stereo passes through.
fn interleave_stereo(samples: Vec<i16>, channels: u16) -> Vec<i16> {
    match channels {
        1 => samples.into_iter().flat_map(|s| [s, s]).collect(),
        _ => samples,
    }
}
