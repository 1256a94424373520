use std::collections::HashMap;

use rayon::prelude::*;

use crate::{
    eval::{
        evaluator::{ReelPlan, TimelineState},
        fingerprint::{StateFingerprint, fingerprint_frame},
    },
    foundation::{
        core::{FrameIndex, FrameRange},
        error::{ReelError, ReelResult},
    },
    render::sink::{SinkConfig, StateSink},
};

/// Evaluate a single frame.
pub fn evaluate_frame(plan: &ReelPlan, frame: FrameIndex) -> TimelineState {
    plan.evaluate_frame(timeline_frame(frame))
}

/// Evaluate a range of frames (inclusive start, exclusive end) sequentially.
pub fn evaluate_frames(plan: &ReelPlan, range: FrameRange) -> ReelResult<Vec<TimelineState>> {
    evaluate_frames_with_stats(plan, range, &EvalThreading::default()).map(|(states, _)| states)
}

#[derive(Clone, Debug)]
pub struct EvalThreading {
    pub parallel: bool,
    pub chunk_size: usize,
    pub threads: Option<usize>,
    pub static_frame_elision: bool,
}

impl Default for EvalThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            static_frame_elision: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct EvalStats {
    pub frames_total: u64,
    pub frames_evaluated: u64,
    pub frames_elided: u64,
}

impl EvalStats {
    fn add(&mut self, other: EvalStats) {
        self.frames_total += other.frames_total;
        self.frames_evaluated += other.frames_evaluated;
        self.frames_elided += other.frames_elided;
    }
}

#[tracing::instrument(skip(plan, threading), fields(start = range.start.0, end = range.end.0))]
pub fn evaluate_frames_with_stats(
    plan: &ReelPlan,
    range: FrameRange,
    threading: &EvalThreading,
) -> ReelResult<(Vec<TimelineState>, EvalStats)> {
    let mut out = Vec::with_capacity(range.len_frames().min(4096) as usize);
    let stats = drive(plan, range, threading, |_, state| {
        out.push(state);
        Ok(())
    })?;
    Ok((out, stats))
}

/// Evaluate `range` and push every state into `sink` in timeline order.
#[tracing::instrument(skip(plan, threading, sink), fields(start = range.start.0, end = range.end.0))]
pub fn stream_frames(
    plan: &ReelPlan,
    range: FrameRange,
    threading: &EvalThreading,
    sink: &mut dyn StateSink,
) -> ReelResult<EvalStats> {
    if range.is_empty() {
        return Err(ReelError::validation("evaluation range must be non-empty"));
    }
    sink.begin(SinkConfig {
        width: plan.width(),
        height: plan.height(),
        fps: plan.fps(),
        range,
    })?;
    let stats = drive(plan, range, threading, |idx, state| {
        sink.push_state(idx, &state)
    })?;
    sink.end()?;
    Ok(stats)
}

/// Walk `range` chunk by chunk, handing each state to `emit` in timeline order.
fn drive(
    plan: &ReelPlan,
    range: FrameRange,
    threading: &EvalThreading,
    mut emit: impl FnMut(FrameIndex, TimelineState) -> ReelResult<()>,
) -> ReelResult<EvalStats> {
    if range.is_empty() {
        return Err(ReelError::validation("evaluation range must be non-empty"));
    }

    let chunk_size = normalized_chunk_size(threading.chunk_size);
    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };

    let mut stats = EvalStats::default();
    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = chunk_start.saturating_add(chunk_size).min(range.end.0);
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))
            .map_err(|e| ReelError::evaluation(format!("invalid chunk range: {e}")))?;

        let (states, chunk_stats) = match &pool {
            Some(pool) => evaluate_chunk_parallel(plan, chunk, threading, pool)?,
            None => evaluate_chunk_sequential(plan, chunk, threading),
        };
        for (offset, state) in states.into_iter().enumerate() {
            emit(FrameIndex(chunk_start + offset as u64), state)?;
        }
        stats.add(chunk_stats);
        chunk_start = chunk_end;
    }

    tracing::debug!(
        frames_total = stats.frames_total,
        frames_evaluated = stats.frames_evaluated,
        frames_elided = stats.frames_elided,
        parallel = threading.parallel,
        "range evaluated"
    );
    Ok(stats)
}

fn evaluate_chunk_sequential(
    plan: &ReelPlan,
    range: FrameRange,
    threading: &EvalThreading,
) -> (Vec<TimelineState>, EvalStats) {
    let total = range.len_frames();
    if threading.static_frame_elision {
        let (out, evaluated) = evaluate_chunk_elided(plan, range, |frames| {
            frames.iter().map(|&f| plan.evaluate_frame(f)).collect()
        });
        return (out, chunk_stats(total, evaluated));
    }

    let out = (range.start.0..range.end.0)
        .map(|f| evaluate_frame(plan, FrameIndex(f)))
        .collect();
    (out, chunk_stats(total, total))
}

fn evaluate_chunk_parallel(
    plan: &ReelPlan,
    range: FrameRange,
    threading: &EvalThreading,
    pool: &rayon::ThreadPool,
) -> ReelResult<(Vec<TimelineState>, EvalStats)> {
    let total = range.len_frames();
    if threading.static_frame_elision {
        let (out, evaluated) = evaluate_chunk_elided(plan, range, |frames| {
            pool.install(|| frames.par_iter().map(|&f| plan.evaluate_frame(f)).collect())
        });
        return Ok((out, chunk_stats(total, evaluated)));
    }

    let frames: Vec<u64> = (range.start.0..range.end.0).collect();
    let out = pool.install(|| {
        frames
            .par_iter()
            .map(|&f| evaluate_frame(plan, FrameIndex(f)))
            .collect()
    });
    Ok((out, chunk_stats(total, total)))
}

/// Fingerprint every frame of `range`, evaluate only the first frame of each distinct
/// fingerprint with `eval_unique`, and fan the results back out in order.
fn evaluate_chunk_elided(
    plan: &ReelPlan,
    range: FrameRange,
    eval_unique: impl FnOnce(&[i64]) -> Vec<TimelineState>,
) -> (Vec<TimelineState>, u64) {
    let mut unique_frames = Vec::<i64>::new();
    let mut frame_to_unique = Vec::<usize>::with_capacity(range.len_frames() as usize);
    let mut first = HashMap::<StateFingerprint, usize>::new();
    for f in range.start.0..range.end.0 {
        let frame = timeline_frame(FrameIndex(f));
        let fp = fingerprint_frame(plan, frame);
        let slot = *first.entry(fp).or_insert_with(|| {
            unique_frames.push(frame);
            unique_frames.len() - 1
        });
        frame_to_unique.push(slot);
    }

    let unique_states = eval_unique(&unique_frames);
    let out = frame_to_unique
        .iter()
        .zip(range.start.0..range.end.0)
        .map(|(&u, f)| {
            let mut state = unique_states[u].clone();
            state.frame = timeline_frame(FrameIndex(f));
            state
        })
        .collect();
    (out, unique_frames.len() as u64)
}

fn chunk_stats(total: u64, evaluated: u64) -> EvalStats {
    EvalStats {
        frames_total: total,
        frames_evaluated: evaluated,
        frames_elided: total.saturating_sub(evaluated),
    }
}

fn timeline_frame(frame: FrameIndex) -> i64 {
    i64::try_from(frame.0).unwrap_or(i64::MAX)
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::validation(
            "evaluation threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
