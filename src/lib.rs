//! follow-reel is a frame-deterministic timeline engine for "new followers" milestone videos.
//!
//! Given a follower count and an optional list of followers, it computes what every frame of a
//! short celebratory video looks like: an overlapping strip of avatars that pops in over three
//! reveal milestones, a label counting "<name> and N others followed you", and a finale with a
//! camera zoom, a "Thank You!" banner and a marquee scroll.
//!
//! # Pipeline overview
//!
//! 1. **Plan**: `ReelConfig -> ReelPlan` (validate, generate milestones, precompute frame constants)
//! 2. **Evaluate**: `ReelPlan + frame -> TimelineState` (pure, total, any order, any thread)
//! 3. **Dispatch** (optional): evaluate ranges sequentially or on a rayon pool and stream states
//!    into a [`StateSink`]
//!
//! Drawing pixels is left to the consumer; every visual quantity a renderer needs is in
//! [`TimelineState`].
#![forbid(unsafe_code)]

mod animation {
    pub(crate) mod ease;
    pub(crate) mod spring;
}
mod composition {
    pub(crate) mod dsl;
    pub(crate) mod model;
    pub(crate) mod roster;
    pub(crate) mod theme;
}
mod eval {
    pub(crate) mod evaluator;
    pub(crate) mod fingerprint;
}
mod foundation {
    pub(crate) mod core;
    pub(crate) mod error;
    pub(crate) mod math;
}
mod layout {
    pub(crate) mod capacity;
}
mod render {
    pub(crate) mod pipeline;
    pub(crate) mod sink;
}
mod timeline {
    pub(crate) mod milestones;
}

pub use animation::ease::{Ease, interpolate, lerp_unclamped};
pub use animation::spring::{SpringConfig, SpringPreset, spring_position};
pub use composition::dsl::ReelConfigBuilder;
pub use composition::model::{
    DEFAULT_DURATION_SECONDS, DEFAULT_FPS, DEFAULT_HEIGHT, DEFAULT_WIDTH, Entity, ReelConfig,
    Theme, sanitize_follower_count,
};
pub use composition::roster::shuffle_followers;
pub use composition::theme::{
    AVATAR_COLORS, AvatarImage, FIRST_AVATAR_COLOR, ThemeColors, avatar_color, avatar_image,
    filler_color, filler_image, generated_avatar_url,
};
pub use eval::evaluator::{
    AvatarPhase, AvatarState, CelebrationState, FillerAvatar, LabelState, ReelPlan,
    TimelineState, all_avatars_visible_frame, appear_frame, format_count,
};
pub use eval::fingerprint::{StateFingerprint, fingerprint_frame};
pub use foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
pub use foundation::error::{ReelError, ReelResult};
pub use layout::capacity::{
    AVATAR_OVERLAP, AVATAR_SIZE, AvatarLayout, CELEBRATION_HEIGHT, GRADIENT_WIDTH, SCROLL_BUFFER,
    SCROLL_DISTANCE, ZOOM, max_avatars,
};
pub use render::pipeline::{
    EvalStats, EvalThreading, evaluate_frame, evaluate_frames, evaluate_frames_with_stats,
    stream_frames,
};
pub use render::sink::{InMemorySink, JsonLinesSink, SinkConfig, StateSink};
pub use timeline::milestones::{
    FALLBACK_NAMES, FrameTiming, MILESTONE_COUNT, Milestone, Milestones, celebration_capacity,
    generate as generate_milestones, timing,
};
