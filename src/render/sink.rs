use std::io::Write;

use crate::{
    eval::evaluator::TimelineState,
    foundation::{
        core::{Fps, FrameIndex, FrameRange},
        error::{ReelError, ReelResult},
    },
};

/// Configuration provided to a [`StateSink`] at the start of a range evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    pub fps: Fps,
    /// Frames that will be pushed.
    pub range: FrameRange,
}

/// Sink contract for consuming evaluated frame states in timeline order.
///
/// `push_state` is called in strictly increasing `FrameIndex` order within the requested range,
/// regardless of how many threads evaluated the frames.
pub trait StateSink: Send {
    /// Called once before any state is pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    /// Push one frame's state.
    fn push_state(&mut self, idx: FrameIndex, state: &TimelineState) -> ReelResult<()>;
    /// Called once after the last state is pushed.
    fn end(&mut self) -> ReelResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    states: Vec<(FrameIndex, TimelineState)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    pub fn states(&self) -> &[(FrameIndex, TimelineState)] {
        &self.states
    }

    /// Whether `end` has been called since the last `begin`.
    pub fn is_finished(&self) -> bool {
        self.ended
    }
}

impl StateSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.cfg = Some(cfg);
        self.states.clear();
        self.ended = false;
        Ok(())
    }

    fn push_state(&mut self, idx: FrameIndex, state: &TimelineState) -> ReelResult<()> {
        self.states.push((idx, state.clone()));
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes one compact JSON object per frame, newline separated.
pub struct JsonLinesSink<W: Write + Send> {
    out: W,
    started: bool,
    lines: u64,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            started: false,
            lines: 0,
        }
    }

    /// Number of states written so far.
    pub fn lines_written(&self) -> u64 {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> StateSink for JsonLinesSink<W> {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        tracing::debug!(
            width = cfg.width,
            height = cfg.height,
            frames = cfg.range.len_frames(),
            "json lines sink begin"
        );
        self.started = true;
        self.lines = 0;
        Ok(())
    }

    fn push_state(&mut self, _idx: FrameIndex, state: &TimelineState) -> ReelResult<()> {
        if !self.started {
            return Err(ReelError::evaluation("push_state called before begin"));
        }
        serde_json::to_writer(&mut self.out, state)?;
        self.out.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        self.out.flush()?;
        self.started = false;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sink.rs"]
mod tests;
