//! Milestone generation: three progressive reveals plus the finale.

use crate::{
    composition::model::{Entity, sanitize_follower_count},
    foundation::core::Fps,
    layout::capacity::{AvatarLayout, SCROLL_DISTANCE},
};

/// Number of milestones in every timeline (three reveals and the finale).
pub const MILESTONE_COUNT: usize = 4;

/// Names used when fewer than four followers are supplied.
pub const FALLBACK_NAMES: [&str; MILESTONE_COUNT] = ["John", "Alex", "Sarah", "Cheers"];

/// Timing constants in seconds; converted to frames with [`Fps::secs_to_frames_round`].
pub mod timing {
    /// Gap between avatar entrances within a reveal milestone.
    pub const AVATAR_STAGGER: f64 = 0.066;
    /// Gap between avatar entrances during the finale.
    pub const AVATAR_STAGGER_FAST: f64 = 0.033;
    /// Fade-in of the finale banner.
    pub const FADE_DURATION: f64 = 0.4;
    /// Gap between consecutive milestones.
    pub const MILESTONE_INTERVAL: f64 = 1.0;
    /// Delay before the first milestone.
    pub const START_DELAY: f64 = 0.3;
    /// Time for an avatar entrance spring to visually settle.
    pub const SPRING_SETTLE: f64 = 0.33;
    /// Delay between a milestone firing and its label counting up.
    pub const SPRING_DELAY: f64 = 0.1;
}

/// Timing constants resolved to whole frames for one frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FrameTiming {
    pub stagger: i64,
    pub fast_stagger: i64,
    pub fade: i64,
    pub milestone_interval: i64,
    pub start_delay: i64,
    pub spring_settle: i64,
    pub spring_delay: i64,
}

impl FrameTiming {
    pub fn new(fps: Fps) -> Self {
        let f = |secs| fps.secs_to_frames_round(secs);
        Self {
            // Never zero, so staggered and milestone frames stay distinct.
            stagger: f(timing::AVATAR_STAGGER).max(1),
            fast_stagger: f(timing::AVATAR_STAGGER_FAST).max(1),
            fade: f(timing::FADE_DURATION),
            milestone_interval: f(timing::MILESTONE_INTERVAL).max(1),
            start_delay: f(timing::START_DELAY),
            spring_settle: f(timing::SPRING_SETTLE),
            spring_delay: f(timing::SPRING_DELAY),
        }
    }
}

/// A named checkpoint on the timeline.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// First frame at which this milestone is active.
    pub activation_frame: i64,
    /// Name shown in the label while this milestone is active.
    pub display_name: String,
    /// "and N others" count this milestone settles on.
    pub others_count: u64,
    /// Avatars on screen once this milestone's reveal is complete.
    pub cumulative_avatars: u32,
}

/// The fixed sequence of milestones for one video.
///
/// Immutable once generated and safe to share across threads.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Milestones([Milestone; MILESTONE_COUNT]);

impl Milestones {
    /// Wrap a hand-built sequence. Callers are responsible for ordering.
    pub fn from_array(milestones: [Milestone; MILESTONE_COUNT]) -> Self {
        Self(milestones)
    }

    pub fn as_slice(&self) -> &[Milestone] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Milestone> {
        self.0.iter()
    }

    pub fn get(&self, idx: usize) -> Option<&Milestone> {
        self.0.get(idx)
    }

    /// The last milestone.
    pub fn finale(&self) -> &Milestone {
        &self.0[MILESTONE_COUNT - 1]
    }

    /// Index of the last milestone whose activation frame is `<= frame`; 0 when none is.
    pub fn active_index(&self, frame: i64) -> usize {
        self.0
            .iter()
            .rposition(|m| m.activation_frame <= frame)
            .unwrap_or(0)
    }

    /// Milestone active at `frame`.
    pub fn active(&self, frame: i64) -> &Milestone {
        &self.0[self.active_index(frame)]
    }

    /// Milestone immediately before the active one, if any.
    pub fn previous(&self, frame: i64) -> Option<&Milestone> {
        self.active_index(frame)
            .checked_sub(1)
            .map(|idx| &self.0[idx])
    }
}

impl<'a> IntoIterator for &'a Milestones {
    type Item = &'a Milestone;
    type IntoIter = std::slice::Iter<'a, Milestone>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Largest avatar count the finale may show for a frame `width` pixels wide.
///
/// The scroll distance is added to the width so the strip still fills the frame after the
/// marquee has moved.
pub fn celebration_capacity(width: u32) -> u32 {
    AvatarLayout::default().max_avatars(f64::from(width) + SCROLL_DISTANCE)
}

/// Build the four milestones for a video.
///
/// Deterministic: identical inputs always produce identical milestones.
pub fn generate(total_count: f64, frame_width: u32, fps: Fps, entities: &[Entity]) -> Milestones {
    let safe_count = sanitize_follower_count(total_count);
    let capacity = celebration_capacity(frame_width);
    let celebration = u32::try_from(safe_count.min(u64::from(capacity))).unwrap_or(capacity);

    let names = milestone_names(entities);
    let counts = reveal_counts(celebration);
    let timing = FrameTiming::new(fps);

    let milestone = |i: usize, avatars: u32| Milestone {
        activation_frame: timing.start_delay + i as i64 * timing.milestone_interval,
        display_name: names[i].clone(),
        others_count: u64::from(avatars.saturating_sub(1)),
        cumulative_avatars: avatars,
    };

    let milestones = Milestones([
        milestone(0, counts[0]),
        milestone(1, counts[1]),
        milestone(2, counts[2]),
        milestone(3, celebration),
    ]);
    tracing::debug!(
        safe_count,
        capacity,
        celebration,
        counts = ?counts,
        "generated milestones"
    );
    milestones
}

fn milestone_names(entities: &[Entity]) -> [String; MILESTONE_COUNT] {
    std::array::from_fn(|i| {
        if entities.len() >= MILESTONE_COUNT && !entities[i].name.is_empty() {
            entities[i].name.clone()
        } else {
            FALLBACK_NAMES[i].to_owned()
        }
    })
}

/// Avatar targets for the three reveal milestones.
fn reveal_counts(celebration: u32) -> [u32; 3] {
    match celebration {
        0 | 1 => [1, 1, 1],
        2 => [1, 1, 2],
        3 => [1, 2, 3],
        c => {
            let share = |frac: f64| (f64::from(c) * frac).floor() as u32;
            let mut counts = [share(0.25).max(1), share(0.5).max(2), share(0.75).max(3)];
            for i in 1..counts.len() {
                if counts[i] <= counts[i - 1] {
                    counts[i] = counts[i - 1] + 1;
                }
            }
            counts.map(|n| n.min(c - 1))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/milestones.rs"]
mod tests;
