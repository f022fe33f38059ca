use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelinePhase {
    Intro,
    Loop,
}

/// An intro played once followed by a loop repeated forever, in time units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTimeline {
    intro: Duration,
    loop_length: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelinePosition {
    /// Total time played since the start
    pub elapsed: Duration,
    /// Position inside the source material
    pub display: Duration,
    pub phase: TimelinePhase,
    /// Completed passes through the loop region
    pub loop_count: u64,
}

impl LoopTimeline {
    pub fn new(intro: Duration, loop_length: Duration) -> Self {
        Self { intro, loop_length }
    }

    pub fn intro(&self) -> Duration {
        self.intro
    }

    pub fn loop_length(&self) -> Duration {
        self.loop_length
    }

    /// Where the loop region ends in the source material
    pub fn loop_end(&self) -> Duration {
        self.intro + self.loop_length
    }

    pub fn phase(&self, elapsed: Duration) -> TimelinePhase {
        if elapsed < self.intro || self.loop_length.is_zero() {
            TimelinePhase::Intro
        } else {
            TimelinePhase::Loop
        }
    }

    /// Map elapsed playback time onto the source material.
    pub fn display_position(&self, elapsed: Duration) -> Duration {
        match self.phase(elapsed) {
            TimelinePhase::Intro => elapsed,
            TimelinePhase::Loop => {
                let into_loop = (elapsed - self.intro).as_nanos() % self.loop_length.as_nanos();
                self.intro + Duration::from_nanos(into_loop as u64)
            }
        }
    }

    pub fn position(&self, elapsed: Duration) -> TimelinePosition {
        let phase = self.phase(elapsed);
        let loop_count = match phase {
            TimelinePhase::Intro => 0,
            TimelinePhase::Loop => {
                ((elapsed - self.intro).as_nanos() / self.loop_length.as_nanos()) as u64
            }
        };

        TimelinePosition {
            elapsed,
            display: self.display_position(elapsed),
            phase,
            loop_count,
        }
    }
}
