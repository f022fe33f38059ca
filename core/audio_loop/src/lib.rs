//! Plays an audio asset as an intro followed by an endlessly repeating loop.
//!
//! The core is [`stream::infinite_loop::InfiniteLoopWithIntro`], a `Read + Seek`
//! adapter that turns a finite decoded buffer into an endless stream. The rest
//! is the demo around it: decoding, a player wired to `cpal`, and a debug
//! overlay showing the playback position.

// Used by the binary only.
use anyhow as _;
use tracing_subscriber as _;

pub mod app;
pub mod asset;
pub mod config;
pub mod constants;
pub mod context;
pub mod decoder;
pub mod device_manager;
pub mod error;
pub mod overlay;
pub mod player;
pub mod stream;
pub mod synth;
