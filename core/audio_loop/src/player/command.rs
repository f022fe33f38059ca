use rtrb::{Consumer, Producer};

/// Control messages from the player handle to the render side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Play,
    Pause,
    /// Stop for good and release the stream
    Stop,
}

pub type PlayerCommandProducer = Producer<PlayerCommand>;
pub type PlayerCommandConsumer = Consumer<PlayerCommand>;
