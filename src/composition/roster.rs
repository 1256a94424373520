use crate::composition::model::{Entity, ReelConfig};
use crate::foundation::math::Rng64;

/// Fisher-Yates shuffle of the follower list.
///
/// Run once while preparing a [`ReelConfig`], never per frame: the resulting order is part of the
/// config, so every worker that receives the config sees the same sequence. The same seed always
/// yields the same order.
pub fn shuffle_followers(followers: &[Entity], seed: u64) -> Vec<Entity> {
    let mut out = followers.to_vec();
    let mut rng = Rng64::new(seed);
    for i in (1..out.len()).rev() {
        let j = ((rng.next_f64_01() * (i + 1) as f64).floor() as usize).min(i);
        out.swap(i, j);
    }
    out
}

impl ReelConfig {
    /// Copy of this config with its followers shuffled by `seed`.
    pub fn with_shuffled_followers(&self, seed: u64) -> Self {
        let mut cfg = self.clone();
        if let Some(followers) = cfg.followers.as_mut() {
            *followers = shuffle_followers(followers, seed);
        }
        cfg
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/roster.rs"]
mod tests;
