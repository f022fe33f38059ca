use std::{
    io::{self, Cursor},
    thread,
    time::Instant,
};

use thiserror::Error;
use transport::{tick_rate::TickRateMeter, timeline::LoopTimeline};

use crate::{
    asset,
    config::DemoConfig,
    context::AudioContext,
    decoder,
    device_manager::AudioDeviceManager,
    error::{AudioDeviceError, ContextError, DecodeError, PlayerError},
    overlay::{DebugOverlay, format_overlay},
    player::{Player, PlayerSource},
    stream::infinite_loop::InfiniteLoopWithIntro,
};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("failed to render demo asset: {0}")]
    Asset(#[from] hound::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("failed to set up loop stream: {0}")]
    Stream(#[source] io::Error),

    #[error(transparent)]
    Device(#[from] AudioDeviceError),

    #[error(transparent)]
    Player(#[from] PlayerError),

    #[error("failed to draw overlay: {0}")]
    Overlay(#[source] io::Error),

    #[error("playback stopped after a stream failure")]
    PlaybackFailed,
}

/// Decode the demo asset once and wrap it in an endless intro + loop stream.
pub fn build_player(
    config: &DemoConfig,
    context: &AudioContext,
) -> Result<(Player, PlayerSource), AppError> {
    let wav = asset::render_wav(
        context.sample_rate(),
        config.intro_length,
        config.loop_length,
    )?;
    let decoded = decoder::decode(context, Cursor::new(wav))?;

    let stream = InfiniteLoopWithIntro::with_durations(
        decoded.into_stream(),
        &context.clock(),
        config.intro_length,
        config.loop_length,
    )
    .map_err(AppError::Stream)?;

    Ok(Player::new(context, stream))
}

/// The demo: one player looping forever, polled once per frame to draw
/// its position.
#[derive(Debug)]
pub struct App<O> {
    config: DemoConfig,
    timeline: LoopTimeline,
    player: Player,
    tick_rate: TickRateMeter,
    overlay: O,
}

impl<O: DebugOverlay> App<O> {
    /// Set up the context, start the device and begin playback.
    pub fn new(
        config: DemoConfig,
        device: &mut impl AudioDeviceManager,
        overlay: O,
    ) -> Result<Self, AppError> {
        let context = AudioContext::new(config.sample_rate)?;
        let (mut player, source) = build_player(&config, &context)?;

        let device_rate = device.start_output_stream(Box::new(source), context.sample_rate())?;
        if device_rate != context.sample_rate() {
            log::info!(
                "device runs at {device_rate} Hz, resampling from {} Hz",
                context.sample_rate()
            );
        }

        // Plays forever: the stream never ends.
        player.play()?;

        Ok(Self {
            config,
            timeline: LoopTimeline::new(config.intro_length, config.loop_length),
            player,
            tick_rate: TickRateMeter::new(),
            overlay,
        })
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    /// One frame: query the position and redraw the overlay.
    pub fn update(&mut self, now: Instant) -> Result<(), AppError> {
        if self.player.has_failed() {
            return Err(AppError::PlaybackFailed);
        }

        self.tick_rate.tick(now);
        let text = format_overlay(
            self.tick_rate.current(),
            &self.timeline,
            self.player.current(),
        );
        self.overlay.print(&text).map_err(AppError::Overlay)
    }

    /// Run the frame loop. Only returns on error.
    pub fn run(&mut self) -> Result<(), AppError> {
        let interval = self.config.tick_interval();
        log::info!("running at {} ticks per second", self.config.ticks_per_second);

        loop {
            let started = Instant::now();
            self.update(started)?;

            if let Some(rest) = interval.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
    }

    /// Stop playback and release the stream.
    pub fn shutdown(&mut self) {
        if let Err(err) = self.player.stop() {
            log::warn!("could not stop player: {err}");
        }
    }
}
