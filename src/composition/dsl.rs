use crate::{
    composition::model::{Entity, ReelConfig, Theme},
    foundation::core::Fps,
    foundation::error::{ReelError, ReelResult},
};

/// Fluent construction of a validated [`ReelConfig`].
pub struct ReelConfigBuilder {
    cfg: ReelConfig,
    shuffle_seed: Option<u64>,
}

impl ReelConfigBuilder {
    pub fn new(follower_count: f64) -> Self {
        Self {
            cfg: ReelConfig {
                follower_count,
                ..ReelConfig::default()
            },
            shuffle_seed: None,
        }
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.cfg.theme = theme;
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.cfg.width = width;
        self.cfg.height = height;
        self
    }

    pub fn fps(mut self, fps: Fps) -> Self {
        self.cfg.fps = fps;
        self
    }

    pub fn duration_frames(mut self, frames: u64) -> Self {
        self.cfg.duration_in_frames = frames;
        self
    }

    /// Set the duration in whole seconds at the current frame rate.
    pub fn duration_secs(mut self, secs: f64) -> ReelResult<Self> {
        if !(secs > 0.0) || !secs.is_finite() {
            return Err(ReelError::validation("duration seconds must be > 0"));
        }
        self.cfg.duration_in_frames = (secs * self.cfg.fps.as_f64()).round() as u64;
        Ok(self)
    }

    pub fn follower(mut self, entity: Entity) -> Self {
        self.cfg.followers.get_or_insert_with(Vec::new).push(entity);
        self
    }

    pub fn followers(mut self, followers: impl IntoIterator<Item = Entity>) -> Self {
        self.cfg
            .followers
            .get_or_insert_with(Vec::new)
            .extend(followers);
        self
    }

    /// Shuffle the followers once, at build time.
    pub fn shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    pub fn build(self) -> ReelResult<ReelConfig> {
        let cfg = match self.shuffle_seed {
            Some(seed) => self.cfg.with_shuffled_followers(seed),
            None => self.cfg,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/dsl.rs"]
mod tests;
