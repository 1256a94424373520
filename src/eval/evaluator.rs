//! Per-frame evaluation of a reel plan into a plain timeline state.

use crate::{
    animation::{
        ease::{Ease, interpolate, lerp_unclamped},
        spring::{SpringConfig, SpringPreset, spring_position},
    },
    composition::{
        model::{Entity, ReelConfig, Theme},
        theme::{AvatarImage, ThemeColors, avatar_color, avatar_image, filler_color, filler_image},
    },
    foundation::{core::Fps, error::ReelResult},
    layout::capacity::{AvatarLayout, CELEBRATION_HEIGHT, SCROLL_DISTANCE, ZOOM},
    timeline::milestones::{FrameTiming, Milestone, Milestones, celebration_capacity, generate},
};

/// Banner starts this many pixels below its resting position.
const CELEBRATION_SLIDE_PX: f64 = 30.0;
/// Extra filler avatars past the strict minimum.
const FILLER_BUFFER: u32 = 2;
/// Highest z-index; each later avatar sits one step below the previous.
const TOP_Z_INDEX: i32 = 100;

/// Lifecycle of one avatar at a given frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AvatarPhase {
    /// Not yet on screen (scale 0).
    Hidden,
    /// Entrance spring running.
    Entering,
    /// Entrance finished.
    Settled,
}

/// Visual state of one real avatar.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarState {
    pub index: usize,
    pub appear_frame: i64,
    pub phase: AvatarPhase,
    /// Entrance scale in `[0, 1]`.
    pub scale: f64,
    /// Always equal to `scale`; the same curve drives both.
    pub opacity: f64,
    pub color: &'static str,
    pub image: AvatarImage,
    pub z_index: i32,
    pub margin_left: f64,
    pub verified: bool,
}

/// A static, unnamed avatar appended to the strip while the marquee scrolls.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillerAvatar {
    pub index: usize,
    pub color: &'static str,
    pub image: AvatarImage,
    pub z_index: i32,
}

/// "<name> and <count> others followed you".
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelState {
    pub name: String,
    pub verified: bool,
    pub count: u64,
    pub text: String,
}

/// The "Thank You!" banner above the strip.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CelebrationState {
    pub height: f64,
    pub translate_y: f64,
    pub opacity: f64,
}

/// Complete visual state of one frame.
///
/// Produced fresh by every [`ReelPlan::evaluate_frame`] call and never reused between frames.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineState {
    pub frame: i64,
    pub active_milestone: Milestone,
    pub previous_milestone: Option<Milestone>,
    pub avatars: Vec<AvatarState>,
    pub fillers: Vec<FillerAvatar>,
    pub display_count: u64,
    pub display_name: String,
    pub label: LabelState,
    pub container_zoom: f64,
    pub scroll_offset: f64,
    pub celebration: CelebrationState,
    pub colors: ThemeColors,
}

impl TimelineState {
    /// Number of filler avatars appended after the real ones.
    pub fn filler_avatar_count(&self) -> usize {
        self.fillers.len()
    }
}

/// Everything derived once per config; evaluating a frame only reads from it.
///
/// A plan holds no interior mutability, so one instance can be shared by reference across any
/// number of threads evaluating frames in any order.
#[derive(Clone, Debug)]
pub struct ReelPlan {
    fps: Fps,
    duration_frames: u64,
    width: u32,
    height: u32,
    theme: Theme,
    total_count: u64,
    followers: Vec<Entity>,
    milestones: Milestones,
    timing: FrameTiming,
    layout: AvatarLayout,
    finale_frame: i64,
    all_avatars_visible_frame: i64,
    filler_target: u32,
}

impl ReelPlan {
    /// Validate `config`, generate milestones and precompute frame constants.
    #[tracing::instrument(skip(config), fields(count = config.follower_count, width = config.width))]
    pub fn new(config: &ReelConfig) -> ReelResult<Self> {
        config.validate()?;

        let followers = config.followers().to_vec();
        let milestones = generate(config.follower_count, config.width, config.fps, &followers);
        let timing = FrameTiming::new(config.fps);
        let finale_frame = milestones.finale().activation_frame;
        let all_avatars_visible_frame = all_avatars_visible_frame(&milestones, &timing);

        tracing::debug!(
            finale_frame,
            all_avatars_visible_frame,
            duration = config.duration_in_frames,
            "reel plan ready"
        );

        Ok(Self {
            fps: config.fps,
            duration_frames: config.duration_in_frames,
            width: config.width,
            height: config.height,
            theme: config.theme,
            total_count: config.total_count(),
            followers,
            milestones,
            timing,
            layout: AvatarLayout::default(),
            finale_frame,
            all_avatars_visible_frame,
            filler_target: celebration_capacity(config.width),
        })
    }

    pub fn milestones(&self) -> &Milestones {
        &self.milestones
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn duration_frames(&self) -> u64 {
        self.duration_frames
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Sanitized follower count.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn timing(&self) -> &FrameTiming {
        &self.timing
    }

    /// Activation frame of the finale milestone.
    pub fn finale_frame(&self) -> i64 {
        self.finale_frame
    }

    /// First frame at which every finale avatar has finished its entrance.
    pub fn all_avatars_visible_frame(&self) -> i64 {
        self.all_avatars_visible_frame
    }

    /// Full visual state for `frame`. Total: any `i64` is accepted.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn evaluate_frame(&self, frame: i64) -> TimelineState {
        let active_idx = self.milestones.active_index(frame);
        let active = &self.milestones.as_slice()[active_idx];
        let previous = self.milestones.previous(frame);

        let limit = active.cumulative_avatars as usize;
        let avatars = (0..limit).map(|i| self.avatar_state(i, frame)).collect();

        let fillers = (0..self.filler_count(frame) as usize)
            .map(|i| {
                let index = limit + i;
                FillerAvatar {
                    index,
                    color: filler_color(index),
                    image: filler_image(index),
                    z_index: z_index_for(index).max(1),
                }
            })
            .collect();

        let display_count = self.display_count(frame);
        let head = self.head_of_line(display_count);
        let display_name = head
            .map(|e| e.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(active.display_name.as_str())
            .to_owned();
        let label = LabelState {
            verified: head.is_some_and(Entity::is_verified),
            count: display_count,
            text: label_text(&display_name, display_count),
            name: display_name.clone(),
        };

        TimelineState {
            frame,
            active_milestone: active.clone(),
            previous_milestone: previous.cloned(),
            avatars,
            fillers,
            display_count,
            display_name,
            label,
            container_zoom: self.container_zoom(frame),
            scroll_offset: self.scroll_offset(frame),
            celebration: self.celebration(frame),
            colors: self.theme.colors(),
        }
    }

    /// Frame at which avatar `index` starts its entrance.
    pub fn appear_frame(&self, index: usize) -> i64 {
        appear_frame(index, &self.milestones, &self.timing)
    }

    /// Entrance scale of avatar `index` at `frame`, in `[0, 1]`.
    pub fn avatar_scale(&self, index: usize, frame: i64) -> f64 {
        if index == 0 {
            return 1.0;
        }
        let appear = self.appear_frame(index);
        let elapsed = frame.saturating_sub(appear);
        if elapsed < 0 {
            return 0.0;
        }
        let config = if appear >= self.finale_frame {
            finale_avatar_spring()
        } else {
            SpringPreset::Snappy.config()
        };
        spring_position(elapsed, self.fps, config).clamp(0.0, 1.0)
    }

    /// Lifecycle phase of avatar `index` at `frame`.
    pub fn avatar_phase(&self, index: usize, frame: i64) -> AvatarPhase {
        if index == 0 {
            return AvatarPhase::Settled;
        }
        let elapsed = frame.saturating_sub(self.appear_frame(index));
        if elapsed < 0 {
            AvatarPhase::Hidden
        } else if elapsed < self.timing.spring_settle {
            AvatarPhase::Entering
        } else {
            AvatarPhase::Settled
        }
    }

    fn avatar_state(&self, index: usize, frame: i64) -> AvatarState {
        let entity = self.followers.get(index);
        let scale = self.avatar_scale(index, frame);
        AvatarState {
            index,
            appear_frame: self.appear_frame(index),
            phase: self.avatar_phase(index, frame),
            scale,
            opacity: scale,
            color: avatar_color(index),
            image: avatar_image(entity, index),
            z_index: z_index_for(index),
            margin_left: if index == 0 { 0.0 } else { -self.layout.overlap },
            verified: entity.is_some_and(Entity::is_verified),
        }
    }

    /// The "others" count shown in the label at `frame`.
    ///
    /// Counts up linearly while the active milestone's avatars enter; during the finale it
    /// converges on `total_count - 1` even when fewer avatars fit on screen.
    pub fn display_count(&self, frame: i64) -> u64 {
        let first_frame = self.milestones.as_slice()[0].activation_frame;
        if frame < first_frame {
            return 0;
        }

        let active = self.milestones.active(frame);
        let previous = self.milestones.previous(frame);
        let is_finale = active.activation_frame == self.finale_frame;

        let previous_avatars = previous.map_or(1, |m| m.cumulative_avatars);
        let new_avatars = active.cumulative_avatars.saturating_sub(previous_avatars);
        if new_avatars == 0 {
            return u64::from(active.cumulative_avatars.saturating_sub(1));
        }

        let stagger = if is_finale {
            self.timing.fast_stagger
        } else {
            self.timing.stagger
        };
        let duration = (i64::from(new_avatars) * stagger).max(1);
        let start = active.activation_frame + self.timing.spring_delay;
        let target = if is_finale {
            self.total_count.saturating_sub(1)
        } else {
            u64::from(active.cumulative_avatars.saturating_sub(1))
        };
        let from = previous.map_or(0, |m| u64::from(m.cumulative_avatars.saturating_sub(1)));

        let v = interpolate(
            frame as f64,
            [start as f64, (start + duration) as f64],
            [from as f64, target as f64],
            Ease::Linear,
        );
        v.round().max(0.0) as u64
    }

    /// Entity at the head of the line for `display_count`, if one was supplied.
    fn head_of_line(&self, display_count: u64) -> Option<&Entity> {
        usize::try_from(display_count)
            .ok()
            .and_then(|i| self.followers.get(i))
    }

    /// Camera zoom at `frame`.
    ///
    /// Eases from [`ZOOM`] down to 1 before the finale, then springs back up with the heavy
    /// preset.
    pub fn container_zoom(&self, frame: i64) -> f64 {
        if frame < self.finale_frame {
            let end = (self.finale_frame - 1).max(1);
            return interpolate(frame as f64, [0.0, end as f64], [ZOOM, 1.0], Ease::OutCubic);
        }
        let progress = spring_position(
            frame - self.finale_frame,
            self.fps,
            SpringPreset::Heavy.config(),
        );
        lerp_unclamped(progress, 1.0, ZOOM)
    }

    /// Horizontal marquee offset at `frame` (always `<= 0`).
    pub fn scroll_offset(&self, frame: i64) -> f64 {
        let start = self.all_avatars_visible_frame;
        let end = i64::try_from(self.duration_frames).unwrap_or(i64::MAX);
        if frame < start || end <= start {
            return 0.0;
        }
        interpolate(
            frame as f64,
            [start as f64, end as f64],
            [0.0, -SCROLL_DISTANCE],
            Ease::OutQuad,
        )
    }

    /// Filler avatars needed at `frame` so scrolling never exposes empty background.
    pub fn filler_count(&self, frame: i64) -> u32 {
        if frame < self.all_avatars_visible_frame {
            return 0;
        }
        let current = self.milestones.active(frame).cumulative_avatars;
        if current < self.filler_target {
            self.filler_target - current + FILLER_BUFFER
        } else {
            0
        }
    }

    /// Finale banner geometry at `frame`.
    pub fn celebration(&self, frame: i64) -> CelebrationState {
        let fade_end = self.finale_frame + self.timing.fade;
        let opacity = interpolate(
            frame as f64,
            [self.finale_frame as f64, fade_end as f64],
            [0.0, 1.0],
            Ease::Linear,
        );
        if frame < self.finale_frame {
            return CelebrationState {
                height: 0.0,
                translate_y: CELEBRATION_SLIDE_PX,
                opacity,
            };
        }
        let progress = spring_position(
            frame - self.finale_frame,
            self.fps,
            SpringPreset::Heavy.config(),
        );
        CelebrationState {
            height: lerp_unclamped(progress, 0.0, CELEBRATION_HEIGHT),
            translate_y: lerp_unclamped(progress, CELEBRATION_SLIDE_PX, 0.0),
            opacity,
        }
    }
}

/// Entrance spring for avatars revealed during the finale.
fn finale_avatar_spring() -> SpringConfig {
    SpringPreset::Snappy.config().stiffness(300.0)
}

fn z_index_for(index: usize) -> i32 {
    TOP_Z_INDEX.saturating_sub(i32::try_from(index).unwrap_or(i32::MAX))
}

/// Frame at which avatar `index` starts its entrance.
///
/// The first milestone whose cumulative total exceeds `index` owns the avatar; its position among
/// that milestone's new avatars times the stagger is added to the activation frame. Finale
/// avatars use the fast stagger. Avatar 0 is on screen from frame 0.
pub fn appear_frame(index: usize, milestones: &Milestones, timing: &FrameTiming) -> i64 {
    if index == 0 {
        return 0;
    }
    let finale_frame = milestones.finale().activation_frame;
    let mut previous = 0usize;
    for m in milestones {
        let total = m.cumulative_avatars as usize;
        if index < total {
            let position = index.saturating_sub(previous) as i64;
            if m.activation_frame >= finale_frame {
                return finale_frame + position * timing.fast_stagger;
            }
            return m.activation_frame + position * timing.stagger;
        }
        previous = total;
    }
    0
}

/// First frame at which every avatar introduced by the finale has settled.
pub fn all_avatars_visible_frame(milestones: &Milestones, timing: &FrameTiming) -> i64 {
    let finale = milestones.finale();
    let before = milestones
        .as_slice()
        .iter()
        .rev()
        .nth(1)
        .map_or(0, |m| m.cumulative_avatars);
    let new_in_finale = finale.cumulative_avatars.saturating_sub(before);
    finale.activation_frame + i64::from(new_in_finale) * timing.fast_stagger + timing.spring_settle
}

fn label_text(name: &str, count: u64) -> String {
    if count == 0 {
        format!("{name} followed you")
    } else {
        format!("{name} and {} others followed you", format_count(count))
    }
}

/// Group thousands with commas (`1234567` -> `1,234,567`); smaller values are unchanged.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    if count < 1000 {
        return digits;
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
