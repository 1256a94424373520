//! Closed-form damped spring.
//!
//! The response is the unit step of a mass-spring-damper that starts at rest at 0 and settles at
//! 1. Every call evaluates the analytic solution at the requested elapsed time, so frame 500 costs
//! the same as frame 1 and does not depend on any earlier call.

use crate::foundation::core::Fps;

const DEFAULT_STIFFNESS: f64 = 100.0;
const DEFAULT_MASS: f64 = 1.0;

/// Physical parameters of a spring.
///
/// `damping` is the viscous coefficient `c`, not the damping ratio; the ratio is derived as
/// `c / (2 * sqrt(stiffness * mass))`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpringConfig {
    /// Viscous damping coefficient.
    pub damping: f64,
    /// Spring constant `k`.
    #[serde(default = "default_stiffness")]
    pub stiffness: f64,
    /// Moving mass `m`.
    #[serde(default = "default_mass")]
    pub mass: f64,
}

fn default_stiffness() -> f64 {
    DEFAULT_STIFFNESS
}

fn default_mass() -> f64 {
    DEFAULT_MASS
}

impl SpringConfig {
    /// Spring with the given damping and default stiffness/mass.
    pub const fn with_damping(damping: f64) -> Self {
        Self {
            damping,
            stiffness: DEFAULT_STIFFNESS,
            mass: DEFAULT_MASS,
        }
    }

    /// Same spring with a different stiffness.
    pub const fn stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    /// Same spring with a different mass.
    pub const fn mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Damping ratio (`< 1` under-damped, `1` critical, `> 1` over-damped).
    pub fn damping_ratio(&self) -> f64 {
        let (c, k, m) = self.sanitized();
        c / (2.0 * (k * m).sqrt())
    }

    /// Undamped natural frequency in rad/s.
    pub fn natural_frequency(&self) -> f64 {
        let (_, k, m) = self.sanitized();
        (k / m).sqrt()
    }

    fn sanitized(&self) -> (f64, f64, f64) {
        let c = if self.damping.is_finite() {
            self.damping.max(0.0)
        } else {
            0.0
        };
        let k = if self.stiffness.is_finite() && self.stiffness > 0.0 {
            self.stiffness
        } else {
            DEFAULT_STIFFNESS
        };
        let m = if self.mass.is_finite() && self.mass > 0.0 {
            self.mass
        } else {
            DEFAULT_MASS
        };
        (c, k, m)
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::with_damping(10.0)
    }
}

/// Named spring tunings used throughout the reel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpringPreset {
    /// Heavily over-damped glide with no overshoot.
    Smooth,
    /// Quick entrance with slight overshoot; used for avatar pops.
    Snappy,
    /// Low damping, visible wobble.
    Bouncy,
    /// Slow, weighty motion for camera zoom and the finale banner.
    Heavy,
}

impl SpringPreset {
    /// Physical parameters for this preset.
    pub const fn config(self) -> SpringConfig {
        match self {
            Self::Smooth => SpringConfig::with_damping(200.0),
            Self::Snappy => SpringConfig::with_damping(20.0).stiffness(200.0),
            Self::Bouncy => SpringConfig::with_damping(8.0),
            Self::Heavy => SpringConfig::with_damping(15.0).stiffness(80.0).mass(2.0),
        }
    }
}

impl From<SpringPreset> for SpringConfig {
    fn from(preset: SpringPreset) -> Self {
        preset.config()
    }
}

/// Position of the spring `elapsed` frames after release.
///
/// Negative elapsed values mean the spring has not started and return exactly 0. Large values
/// converge on 1; under-damped configs overshoot past 1 on the way.
pub fn spring_position(elapsed: i64, fps: Fps, config: SpringConfig) -> f64 {
    if elapsed <= 0 {
        return 0.0;
    }
    let t = fps.frames_to_secs(elapsed as f64);
    step_response(t, config)
}

fn step_response(t: f64, config: SpringConfig) -> f64 {
    let zeta = config.damping_ratio();
    let omega0 = config.natural_frequency();

    if (zeta - 1.0).abs() < 1e-9 {
        let envelope = (-omega0 * t).exp();
        return 1.0 - envelope * (1.0 + omega0 * t);
    }

    if zeta < 1.0 {
        let omega1 = omega0 * (1.0 - zeta * zeta).sqrt();
        let envelope = (-zeta * omega0 * t).exp();
        return 1.0
            - envelope * ((zeta * omega0 / omega1) * (omega1 * t).sin() + (omega1 * t).cos());
    }

    // Over-damped: two real decaying modes. Writing it as a sum of exponentials (instead of
    // exp * cosh) keeps both terms finite for large t.
    let omega2 = omega0 * (zeta * zeta - 1.0).sqrt();
    let r_slow = -zeta * omega0 + omega2;
    let r_fast = -zeta * omega0 - omega2;
    1.0 + (r_fast * (r_slow * t).exp() - r_slow * (r_fast * t).exp()) / (2.0 * omega2)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;
