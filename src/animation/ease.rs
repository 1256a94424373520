/// Easing curves applied to a normalized `t` in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    OutQuad,
    OutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Map `x` from `[in_start, in_end]` onto `[out_start, out_end]`, clamped at both ends.
///
/// A degenerate input span (`in_end <= in_start`) is a step at `in_start`: the output is
/// `out_start` before it and `out_end` from it on.
pub fn interpolate(x: f64, input: [f64; 2], output: [f64; 2], ease: Ease) -> f64 {
    let [in_start, in_end] = input;
    let [out_start, out_end] = output;
    let span = in_end - in_start;
    if !(span > 0.0) {
        return if x < in_start { out_start } else { out_end };
    }
    let t = ((x - in_start) / span).clamp(0.0, 1.0);
    out_start + (out_end - out_start) * ease.apply(t)
}

/// Map a unit progress value onto `[from, to]` without clamping, so spring overshoot carries
/// through.
pub fn lerp_unclamped(progress: f64, from: f64, to: f64) -> f64 {
    from + (to - from) * progress
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
