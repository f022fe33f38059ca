//! Playback-time bookkeeping: frame layouts, byte/time conversion and the
//! intro + loop timeline used to display a looping position.

pub mod clock;
pub mod format;
pub mod tick_rate;
pub mod timeline;
