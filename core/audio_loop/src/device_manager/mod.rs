pub use crate::error::AudioDeviceError;

pub mod cpal_dm;

/// Output buffer handed over by the device, in the device's sample format.
#[derive(Debug)]
pub enum AudioSourceBufferKind<'a> {
    F32(&'a mut [f32]),
    I16(&'a mut [i16]),
    U16(&'a mut [u16]),
}

/// Render side of playback, driven from the device callback.
pub trait AudioSource: Send {
    /// Called once with the rate the device actually runs at, before the
    /// first [`Self::fill_buffer`].
    fn prepare(&mut self, device_rate: u32) -> Result<(), AudioDeviceError> {
        let _ = device_rate;
        Ok(())
    }

    /// Fill `buffer` with `frame_size` interleaved frames of `channels` samples.
    fn fill_buffer(&mut self, buffer: AudioSourceBufferKind<'_>, frame_size: usize, channels: usize);
}

pub trait AudioDeviceManager {
    /// Open the output device and start pulling audio from `audio_source`.
    /// The device is asked for `sample_rate`; returns the rate actually used.
    fn start_output_stream(
        &mut self,
        audio_source: Box<dyn AudioSource>,
        sample_rate: u32,
    ) -> Result<u32, AudioDeviceError>;
}
