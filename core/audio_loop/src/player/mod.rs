use std::{
    fmt,
    io::{self, Read},
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use cpal::Sample;
use rtrb::RingBuffer;
use transport::{clock::PlaybackClock, format::FrameLayout};

use crate::{
    constants::PLAYER_COMMAND_CAPACITY,
    context::AudioContext,
    device_manager::{AudioSource, AudioSourceBufferKind},
    error::{AudioDeviceError, PlayerError},
    player::{
        command::{PlayerCommand, PlayerCommandConsumer, PlayerCommandProducer},
        resample::RateConverter,
    },
    stream::AudioStream,
};

pub mod command;
pub mod resample;

/// Full scale of signed 16-bit PCM
const I16_SCALE: f32 = 32_768.0;

/// Written by the render side, read by the handle.
#[derive(Debug, Default)]
struct PlaybackStatus {
    consumed_bytes: AtomicU64,
    playing: AtomicBool,
    failed: AtomicBool,
}

/// Control handle of a playing stream: start, pause and position queries.
///
/// The matching [`PlayerSource`] owns the stream and runs on the audio
/// device thread; the two only talk through a command ring and atomics.
#[derive(Debug)]
pub struct Player {
    commands: PlayerCommandProducer,
    status: Arc<PlaybackStatus>,
    clock: PlaybackClock,
}

impl Player {
    /// Create a paused player for `stream` and the render side that feeds
    /// it to the device.
    pub fn new<S: AudioStream + 'static>(context: &AudioContext, stream: S) -> (Self, PlayerSource) {
        let (producer, consumer) = RingBuffer::new(PLAYER_COMMAND_CAPACITY);
        let status = Arc::new(PlaybackStatus::default());

        let player = Self {
            commands: producer,
            status: Arc::clone(&status),
            clock: context.clock(),
        };
        let source = PlayerSource {
            stream: Some(Box::new(stream)),
            commands: consumer,
            status,
            sample_rate: context.sample_rate(),
            layout: context.layout(),
            converter: None,
            playing: false,
            scratch: Vec::new(),
            decoded: Vec::new(),
            frames: Vec::new(),
        };

        (player, source)
    }

    pub fn play(&mut self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Play)
    }

    pub fn pause(&mut self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Pause)
    }

    pub fn stop(&mut self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Stop)
    }

    fn send(&mut self, command: PlayerCommand) -> Result<(), PlayerError> {
        self.commands
            .push(command)
            .map_err(|_| PlayerError::CommandQueueFull)
    }

    /// Elapsed playback time, from the bytes pulled out of the stream so far.
    ///
    /// Counted in stream time, so it holds whatever rate the device runs at.
    pub fn current(&self) -> Duration {
        self.clock.bytes_to_duration(self.consumed_bytes())
    }

    pub fn consumed_bytes(&self) -> u64 {
        self.status.consumed_bytes.load(Ordering::Acquire)
    }

    pub fn is_playing(&self) -> bool {
        self.status.playing.load(Ordering::Acquire)
    }

    /// True once the stream failed; playback does not resume after that.
    pub fn has_failed(&self) -> bool {
        self.status.failed.load(Ordering::Acquire)
    }
}

/// Render side of a [`Player`]. Pulls PCM from the stream on every device
/// callback, resamples it to the device rate when the two differ and
/// converts it to the device format.
pub struct PlayerSource {
    /// `None` once stopped or failed
    stream: Option<Box<dyn AudioStream>>,
    commands: PlayerCommandConsumer,
    status: Arc<PlaybackStatus>,
    /// Rate of the stream
    sample_rate: u32,
    layout: FrameLayout,
    /// Set when the device runs at another rate than the stream
    converter: Option<RateConverter>,
    playing: bool,
    scratch: Vec<u8>,
    /// Stream frames waiting for the converter
    decoded: Vec<(f32, f32)>,
    /// Device frames handed out by `next_frames`
    frames: Vec<(f32, f32)>,
}

impl fmt::Debug for PlayerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerSource")
            .field("stream", &self.stream)
            .field("sample_rate", &self.sample_rate)
            .field("layout", &self.layout)
            .field("converter", &self.converter)
            .field("playing", &self.playing)
            .finish_non_exhaustive()
    }
}

impl PlayerSource {
    fn process_command(&mut self, cmd: PlayerCommand) {
        match cmd {
            PlayerCommand::Play => self.playing = self.stream.is_some(),
            PlayerCommand::Pause => self.playing = false,
            PlayerCommand::Stop => self.release_stream(),
        }
        self.status.playing.store(self.playing, Ordering::Release);
    }

    fn release_stream(&mut self) {
        self.playing = false;
        if let Some(mut stream) = self.stream.take() {
            if let Err(err) = stream.close() {
                log::warn!("failed to close stream: {err}");
            }
        }
    }

    /// Next `frame_count` stereo frames at the device rate; silence while
    /// paused or stopped.
    pub fn next_frames(&mut self, frame_count: usize) -> &[(f32, f32)] {
        while let Ok(cmd) = self.commands.pop() {
            self.process_command(cmd);
        }

        self.frames.clear();
        self.frames.resize(frame_count, (0.0, 0.0));

        if !self.playing {
            return &self.frames;
        }

        if let Err(err) = self.render(frame_count) {
            log::error!("stream read failed, stopping playback: {err}");
            self.status.failed.store(true, Ordering::Release);
            self.release_stream();
            self.status.playing.store(false, Ordering::Release);
            self.frames.fill((0.0, 0.0));
        }
        &self.frames
    }

    fn render(&mut self, frame_count: usize) -> io::Result<()> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(());
        };

        let Some(converter) = self.converter.as_mut() else {
            let read = read_frames(
                stream,
                self.layout,
                &mut self.scratch,
                &mut self.frames,
                frame_count,
            )?;
            self.status.consumed_bytes.fetch_add(read, Ordering::AcqRel);
            return Ok(());
        };

        while converter.buffered() < frame_count {
            let wanted = converter.input_frames();
            let read = read_frames(
                stream,
                self.layout,
                &mut self.scratch,
                &mut self.decoded,
                wanted,
            )?;
            self.status.consumed_bytes.fetch_add(read, Ordering::AcqRel);
            converter.process(&self.decoded).map_err(io::Error::other)?;
        }
        converter.drain_into(&mut self.frames);
        Ok(())
    }
}

/// Read `frame_count` frames of PCM from `stream` into `out`, returning the
/// bytes consumed. `out` is left untouched on error.
fn read_frames<R: Read + ?Sized>(
    stream: &mut R,
    layout: FrameLayout,
    scratch: &mut Vec<u8>,
    out: &mut Vec<(f32, f32)>,
    frame_count: usize,
) -> io::Result<u64> {
    let frame_size = layout.frame_size() as usize;
    scratch.resize(frame_count * frame_size, 0);
    stream.read_exact(scratch)?;

    let bytes_per_sample = usize::from(layout.bytes_per_sample);
    out.clear();
    out.extend(scratch.chunks_exact(frame_size).map(|bytes| {
        let left = pcm16_to_f32(&bytes[..bytes_per_sample]);
        let right = if layout.channels > 1 {
            pcm16_to_f32(&bytes[bytes_per_sample..2 * bytes_per_sample])
        } else {
            left
        };
        (left, right)
    }));

    Ok(scratch.len() as u64)
}

fn pcm16_to_f32(bytes: &[u8]) -> f32 {
    f32::from(i16::from_le_bytes([bytes[0], bytes[1]])) / I16_SCALE
}

/// Spread stereo frames over a device buffer with `channels` interleaved channels.
fn fill_sample<T>(data: &mut [T], frames: &[(f32, f32)], channels: usize)
where
    T: Sample + cpal::FromSample<f32>,
{
    for (out, &(l, r)) in data.chunks_mut(channels.max(1)).zip(frames) {
        for (channel, sample) in out.iter_mut().enumerate() {
            let raw_sample = match (channels, channel) {
                (1, _) => (l + r) * 0.5,
                (_, 0) => l,
                (_, 1) => r,
                _ => 0.0,
            };
            *sample = raw_sample.to_sample::<T>();
        }
    }
}

impl AudioSource for PlayerSource {
    fn prepare(&mut self, device_rate: u32) -> Result<(), AudioDeviceError> {
        if device_rate == self.sample_rate {
            self.converter = None;
            return Ok(());
        }

        let unsupported = |reason: String| AudioDeviceError::UnsupportedRate {
            from: self.sample_rate,
            to: device_rate,
            reason,
        };
        if device_rate == 0 {
            return Err(unsupported("device reports no sample rate".to_owned()));
        }

        let converter = RateConverter::new(self.sample_rate, device_rate)
            .map_err(|err| unsupported(err.to_string()))?;
        log::info!(
            "resampling {} Hz stream to the {device_rate} Hz device",
            self.sample_rate
        );
        self.converter = Some(converter);
        Ok(())
    }

    fn fill_buffer(&mut self, buffer: AudioSourceBufferKind<'_>, frame_size: usize, channels: usize) {
        let frames = self.next_frames(frame_size);

        match buffer {
            AudioSourceBufferKind::F32(data) => fill_sample(data, frames, channels),
            AudioSourceBufferKind::I16(data) => fill_sample(data, frames, channels),
            AudioSourceBufferKind::U16(data) => fill_sample(data, frames, channels),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Seek, SeekFrom};

    use super::*;
    use crate::{
        constants::AUDIO_SAMPLE_EPSILON,
        stream::{bytes::BytesReadSeekCloser, infinite_loop::InfiniteLoopWithIntro},
    };

    const SAMPLE_RATE: u32 = 100;

    fn context() -> AudioContext {
        AudioContext::new(SAMPLE_RATE).unwrap()
    }

    /// Stereo PCM where frame `i` holds (i * 100, -(i * 100)).
    fn ramp_bytes(frames: i16) -> Vec<u8> {
        (0..frames)
            .flat_map(|i| {
                let mut frame = (i * 100).to_le_bytes().to_vec();
                frame.extend_from_slice(&(-(i * 100)).to_le_bytes());
                frame
            })
            .collect()
    }

    fn looping_player(frames: i16, intro_frames: u64, loop_frames: u64) -> (Player, PlayerSource) {
        let stream = InfiniteLoopWithIntro::new(
            BytesReadSeekCloser::new(ramp_bytes(frames)),
            intro_frames * 4,
            loop_frames * 4,
            FrameLayout::STEREO_I16,
        )
        .unwrap();
        Player::new(&context(), stream)
    }

    fn left_channel(frames: &[(f32, f32)]) -> Vec<i16> {
        frames
            .iter()
            .map(|(l, _)| (l * I16_SCALE).round() as i16)
            .collect()
    }

    #[derive(Debug)]
    struct BrokenStream;

    impl Read for BrokenStream {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("decoder crashed"))
        }
    }

    impl Seek for BrokenStream {
        fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
            Ok(0)
        }
    }

    impl AudioStream for BrokenStream {
        fn close(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_new_player_is_silent_until_played() {
        let (player, mut source) = looping_player(8, 2, 6);

        let out = source.next_frames(4);
        assert!(out.iter().all(|&(l, r)| l == 0.0 && r == 0.0));
        assert_eq!(player.current(), Duration::ZERO);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_play_pulls_frames_through_the_loop() {
        let (mut player, mut source) = looping_player(8, 2, 6);
        player.play().unwrap();

        let out = source.next_frames(10);
        // intro 0,1 then loop 2..6 twice
        assert_eq!(
            left_channel(out),
            vec![0, 100, 200, 300, 400, 500, 200, 300, 400, 500]
        );
        assert!((out[1].1 + 100.0 / I16_SCALE).abs() < AUDIO_SAMPLE_EPSILON);
        assert!(player.is_playing());
    }

    #[test]
    fn test_position_tracks_consumed_frames() {
        let (mut player, mut source) = looping_player(8, 2, 6);
        player.play().unwrap();

        source.next_frames(50);
        source.next_frames(100);

        // 150 frames at 100 Hz, never wrapping back to zero
        assert_eq!(player.consumed_bytes(), 600);
        assert_eq!(player.current(), Duration::from_millis(1_500));
    }

    #[test]
    fn test_pause_holds_position() {
        let (mut player, mut source) = looping_player(8, 2, 6);
        player.play().unwrap();
        source.next_frames(10);

        player.pause().unwrap();
        let out = source.next_frames(10);

        assert!(out.iter().all(|&(l, _)| l == 0.0));
        assert_eq!(player.consumed_bytes(), 40);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_stop_releases_stream_and_ignores_play() {
        let (mut player, mut source) = looping_player(8, 2, 6);
        player.play().unwrap();
        source.next_frames(2);

        player.stop().unwrap();
        source.next_frames(2);
        player.play().unwrap();
        let out = source.next_frames(2).to_vec();

        assert!(source.stream.is_none());
        assert!(out.iter().all(|&(l, _)| l == 0.0));
        assert!(!player.is_playing());
        assert!(!player.has_failed());
    }

    #[test]
    fn test_read_failure_is_fatal() {
        let (mut player, mut source) = Player::new(&context(), BrokenStream);
        player.play().unwrap();

        let out = source.next_frames(4);
        assert!(out.iter().all(|&(l, r)| l == 0.0 && r == 0.0));
        assert!(player.has_failed());
        assert!(!player.is_playing());
        assert_eq!(player.current(), Duration::ZERO);

        player.play().unwrap();
        source.next_frames(4);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_full_command_queue_is_reported() {
        let (mut player, _source) = looping_player(8, 2, 6);
        for _ in 0..PLAYER_COMMAND_CAPACITY {
            player.pause().unwrap();
        }
        assert_eq!(player.play(), Err(PlayerError::CommandQueueFull));
    }

    #[test]
    fn test_fill_buffer_writes_interleaved_device_samples() {
        let (mut player, mut source) = looping_player(8, 2, 6);
        player.play().unwrap();

        let mut data = vec![0i16; 3 * 2];
        source.fill_buffer(AudioSourceBufferKind::I16(&mut data), 3, 2);

        assert_eq!(data, vec![0, 0, 100, -100, 200, -200]);
    }

    #[test]
    fn test_matching_device_rate_reads_stream_directly() {
        let (mut player, mut source) = looping_player(8, 2, 6);
        source.prepare(SAMPLE_RATE).unwrap();
        player.play().unwrap();

        let out = source.next_frames(4);
        assert_eq!(left_channel(out), vec![0, 100, 200, 300]);
        assert!(source.converter.is_none());
    }

    #[test]
    fn test_faster_device_should_keep_position_in_stream_time() {
        let (mut player, mut source) = looping_player(8, 2, 6);
        source.prepare(SAMPLE_RATE * 2).unwrap();
        player.play().unwrap();

        // 20s of device time at 200 Hz, pulled in device-sized callbacks
        let mut data = vec![0.0f32; 200 * 2];
        for _ in 0..20 {
            source.fill_buffer(AudioSourceBufferKind::F32(&mut data), 200, 2);
        }

        let current = player.current().as_secs_f64();
        assert!((19.5..24.5).contains(&current), "position {current}s");
        assert!(data.iter().any(|s| *s != 0.0));
        assert!(!player.has_failed());
    }

    #[test]
    fn test_slower_device_should_keep_position_in_stream_time() {
        let (mut player, mut source) = looping_player(8, 2, 6);
        source.prepare(SAMPLE_RATE / 2).unwrap();
        player.play().unwrap();

        for _ in 0..20 {
            source.next_frames(50);
        }

        let current = player.current().as_secs_f64();
        assert!((19.5..26.0).contains(&current), "position {current}s");
    }

    #[test]
    fn test_zero_device_rate_should_fail() {
        let (_player, mut source) = looping_player(8, 2, 6);
        assert!(matches!(
            source.prepare(0),
            Err(AudioDeviceError::UnsupportedRate { from: 100, to: 0, .. })
        ));
    }

    #[test]
    fn test_fill_buffer_downmixes_to_mono_and_pads_extra_channels() {
        let mut mono = [0.0f32; 2];
        fill_sample(&mut mono, &[(0.5, 0.25), (1.0, -1.0)], 1);
        assert_eq!(mono, [0.375, 0.0]);

        let mut quad = [9.0f32; 4];
        fill_sample(&mut quad, &[(0.5, 0.25)], 4);
        assert_eq!(quad, [0.5, 0.25, 0.0, 0.0]);
    }
}
