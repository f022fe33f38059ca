use std::{collections::VecDeque, fmt};

use rubato::{FastFixedIn, PolynomialDegree, ResampleError, Resampler, ResamplerConstructionError};

/// Stream frames fed to the resampler per call
const CHUNK_FRAMES: usize = 256;

/// Converts stereo frames from the stream rate to the device rate.
///
/// Input goes in fixed chunks, output is buffered until the device asks for it.
pub struct RateConverter {
    resampler: FastFixedIn<f32>,
    from_rate: u32,
    to_rate: u32,
    /// Planar input, one `Vec` per channel
    input: Vec<Vec<f32>>,
    pending: VecDeque<(f32, f32)>,
}

impl fmt::Debug for RateConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateConverter")
            .field("from_rate", &self.from_rate)
            .field("to_rate", &self.to_rate)
            .field("buffered", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl RateConverter {
    pub fn new(from_rate: u32, to_rate: u32) -> Result<Self, ResamplerConstructionError> {
        let resampler = FastFixedIn::<f32>::new(
            f64::from(to_rate) / f64::from(from_rate),
            1.0,
            PolynomialDegree::Cubic,
            CHUNK_FRAMES,
            2,
        )?;

        log::debug!("resampling {from_rate} Hz to {to_rate} Hz in chunks of {CHUNK_FRAMES} frames");

        Ok(Self {
            resampler,
            from_rate,
            to_rate,
            input: vec![Vec::with_capacity(CHUNK_FRAMES); 2],
            pending: VecDeque::new(),
        })
    }

    /// Stream frames the next [`Self::process`] call expects.
    pub fn input_frames(&self) -> usize {
        self.resampler.input_frames_next()
    }

    /// Converted frames not yet handed to the device
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }

    /// Resample one chunk of exactly [`Self::input_frames`] stream frames.
    pub fn process(&mut self, frames: &[(f32, f32)]) -> Result<(), ResampleError> {
        for channel in &mut self.input {
            channel.clear();
        }
        for &(l, r) in frames {
            self.input[0].push(l);
            self.input[1].push(r);
        }

        let output = self.resampler.process(&self.input[..], None)?;
        self.pending
            .extend(output[0].iter().copied().zip(output[1].iter().copied()));
        Ok(())
    }

    /// Move buffered frames into `out`, padding with silence when short.
    pub fn drain_into(&mut self, out: &mut [(f32, f32)]) {
        for frame in out {
            *frame = self.pending.pop_front().unwrap_or((0.0, 0.0));
        }
    }
}
