use std::fmt;

use super::AudioDeviceManager;
use crate::device_manager::{AudioDeviceError, AudioSource, AudioSourceBufferKind};
use cpal::{
    OutputCallbackInfo,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};

const PREFERRED_CHANNELS: u16 = 2;

pub struct CpalAudioDeviceManager {
    stream: Option<cpal::Stream>,
}

impl fmt::Debug for CpalAudioDeviceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpalAudioDeviceManager")
            .field("running", &self.stream.is_some())
            .finish()
    }
}

impl CpalAudioDeviceManager {
    pub fn new() -> Self {
        Self { stream: None }
    }

    /// Stereo config at `sample_rate` when the device offers one,
    /// otherwise the device default.
    fn pick_config(
        device: &cpal::Device,
        sample_rate: u32,
    ) -> Result<cpal::SupportedStreamConfig, AudioDeviceError> {
        let wanted = cpal::SampleRate(sample_rate);
        let matching = device
            .supported_output_configs()
            .map_err(|e| AudioDeviceError::StreamBuildFailed(e.to_string()))?
            .filter(|range| range.channels() == PREFERRED_CHANNELS)
            .find(|range| range.min_sample_rate() <= wanted && wanted <= range.max_sample_rate());

        if let Some(range) = matching {
            return Ok(range.with_sample_rate(wanted));
        }

        let fallback = device
            .default_output_config()
            .map_err(|e| AudioDeviceError::StreamBuildFailed(e.to_string()))?;
        log::info!(
            "device has no stereo config at {sample_rate} Hz, using {} Hz / {} channels",
            fallback.sample_rate().0,
            fallback.channels()
        );
        Ok(fallback)
    }

    fn build_output_stream<T, C>(
        &self,
        device: &cpal::Device,
        config: cpal::SupportedStreamConfig,
        mut cb: C,
    ) -> Result<cpal::Stream, AudioDeviceError>
    where
        T: cpal::SizedSample,
        C: FnMut(&mut [T], usize, usize) + Send + 'static,
    {
        let error_cb = move |err| {
            log::error!("output stream error: {err}");
        };

        let channels = usize::from(config.channels());
        let data_cb = move |data: &mut [T], _: &OutputCallbackInfo| {
            let frame_size = data.len() / channels;
            cb(data, frame_size, channels);
        };

        let stream = device
            .build_output_stream(&config.into(), data_cb, error_cb, None)
            .map_err(|e| AudioDeviceError::StreamBuildFailed(e.to_string()))?;

        Ok(stream)
    }
}

impl Default for CpalAudioDeviceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioDeviceManager for CpalAudioDeviceManager {
    fn start_output_stream(
        &mut self,
        mut audio_source: Box<dyn AudioSource>,
        sample_rate: u32,
    ) -> Result<u32, AudioDeviceError> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or(AudioDeviceError::DeviceNotFound)?;

        let config = Self::pick_config(&device, sample_rate)?;
        let device_rate = config.sample_rate().0;
        audio_source.prepare(device_rate)?;

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                self.build_output_stream(&device, config, move |data, frame_size, channels| {
                    audio_source.fill_buffer(AudioSourceBufferKind::F32(data), frame_size, channels)
                })?
            }
            cpal::SampleFormat::I16 => {
                self.build_output_stream(&device, config, move |data, frame_size, channels| {
                    audio_source.fill_buffer(AudioSourceBufferKind::I16(data), frame_size, channels)
                })?
            }
            cpal::SampleFormat::U16 => {
                self.build_output_stream(&device, config, move |data, frame_size, channels| {
                    audio_source.fill_buffer(AudioSourceBufferKind::U16(data), frame_size, channels)
                })?
            }
            format => {
                return Err(AudioDeviceError::StreamBuildFailed(format!(
                    "Unsupported sample format '{format}'"
                )));
            }
        };

        stream
            .play()
            .map_err(|e| AudioDeviceError::StreamStartFailed(e.to_string()))?;

        log::info!("output stream started at {device_rate} Hz");
        self.stream = Some(stream);
        Ok(device_rate)
    }
}
