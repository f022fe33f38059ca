use std::{
    io::{self, Write},
    time::Duration,
};

use transport::timeline::LoopTimeline;

/// Where the debug text ends up each frame.
pub trait DebugOverlay {
    fn print(&mut self, text: &str) -> io::Result<()>;
}

/// Redraws the text at the top of an ANSI terminal.
#[derive(Debug)]
pub struct TerminalOverlay<W: Write> {
    out: W,
}

impl<W: Write> TerminalOverlay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TerminalOverlay<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> DebugOverlay for TerminalOverlay<W> {
    fn print(&mut self, text: &str) -> io::Result<()> {
        // cursor home + clear screen
        write!(self.out, "\x1b[H\x1b[2J{text}")?;
        self.out.flush()
    }
}

/// Overlay text for one frame.
pub fn format_overlay(tps: f64, timeline: &LoopTimeline, elapsed: Duration) -> String {
    let intro = timeline.intro().as_secs();
    let loop_end = timeline.loop_end().as_secs();
    let current = timeline.position(elapsed).display.as_secs_f64();

    format!(
        r"TPS: {tps:0.2}
This is an example using
InfiniteLoopWithIntro.

Intro:   0[s] - {intro}[s]
Loop:    {intro}[s] - {loop_end}[s]
Current: {current:0.2}[s]"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline() -> LoopTimeline {
        LoopTimeline::new(Duration::from_secs(5), Duration::from_secs(4))
    }

    #[test]
    fn test_shows_intro_and_loop_bounds() {
        let text = format_overlay(60.0, &timeline(), Duration::ZERO);

        assert!(text.starts_with("TPS: 60.00\n"));
        assert!(text.contains("Intro:   0[s] - 5[s]\n"));
        assert!(text.contains("Loop:    5[s] - 9[s]\n"));
        assert!(text.ends_with("Current: 0.00[s]"));
    }

    #[test]
    fn test_overlay_text_should_match_the_full_layout() {
        let text = format_overlay(60.0, &timeline(), Duration::from_millis(2_500));
        assert_eq!(
            text,
            "TPS: 60.00\nThis is an example using\nInfiniteLoopWithIntro.\n\n\
             Intro:   0[s] - 5[s]\nLoop:    5[s] - 9[s]\nCurrent: 2.50[s]"
        );
    }

    #[test]
    fn test_current_position_folds_into_loop() {
        let text = format_overlay(59.94, &timeline(), Duration::from_millis(10_250));
        assert!(text.ends_with("Current: 6.25[s]"));
    }

    #[test]
    fn test_terminal_overlay_redraws_from_top() {
        let mut overlay = TerminalOverlay::new(Vec::new());
        overlay.print("hello").unwrap();
        overlay.print("again").unwrap();

        let out = String::from_utf8(overlay.into_inner()).unwrap();
        assert_eq!(out, "\x1b[H\x1b[2Jhello\x1b[H\x1b[2Jagain");
    }
}
