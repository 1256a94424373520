use crate::composition::model::{Entity, Theme};

/// Background of the very first avatar, which is on screen from frame 0.
pub const FIRST_AVATAR_COLOR: &str = "#3b82f6";

/// Placeholder backgrounds cycled by avatar index.
pub const AVATAR_COLORS: [&str; 20] = [
    "#ef4444", "#f97316", "#f59e0b", "#eab308", "#84cc16", "#22c55e", "#10b981", "#14b8a6",
    "#06b6d4", "#0ea5e9", "#3b82f6", "#6366f1", "#8b5cf6", "#a855f7", "#d946ef", "#ec4899",
    "#f43f5e", "#78716c", "#71717a", "#737373",
];

const GENERATED_AVATAR_BASE: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";

/// Colors for one theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub background: &'static str,
    pub text: &'static str,
    pub text_secondary: &'static str,
    pub avatar_border: &'static str,
    pub shadow: &'static str,
    pub gradient: &'static str,
}

const LIGHT: ThemeColors = ThemeColors {
    background: "#ffffff",
    text: "#0f1419",
    text_secondary: "#536471",
    avatar_border: "#ffffff",
    shadow: "0 4px 6px -1px rgba(0, 0, 0, 0.1)",
    gradient: "white",
};

const DIM: ThemeColors = ThemeColors {
    background: "#15202b",
    text: "#f7f9f9",
    text_secondary: "#8b98a5",
    avatar_border: "#15202b",
    shadow: "0 4px 6px -1px rgba(0, 0, 0, 0.3)",
    gradient: "#15202b",
};

const LIGHTS_OUT: ThemeColors = ThemeColors {
    background: "#000000",
    text: "#e7e9ea",
    text_secondary: "#71767b",
    avatar_border: "#000000",
    shadow: "0 4px 6px -1px rgba(0, 0, 0, 0.5)",
    gradient: "#000000",
};

impl Theme {
    /// Palette for this theme.
    pub fn colors(self) -> ThemeColors {
        match self {
            Self::Light => LIGHT,
            Self::Dim => DIM,
            Self::LightsOut => LIGHTS_OUT,
        }
    }
}

/// Placeholder background for the avatar at `index`.
pub fn avatar_color(index: usize) -> &'static str {
    if index == 0 {
        FIRST_AVATAR_COLOR
    } else {
        AVATAR_COLORS[index % AVATAR_COLORS.len()]
    }
}

/// Placeholder background for a filler avatar.
pub fn filler_color(index: usize) -> &'static str {
    AVATAR_COLORS[index % AVATAR_COLORS.len()]
}

/// Where an avatar's picture comes from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "camelCase")]
pub enum AvatarImage {
    /// The entity's own image reference.
    Provided(String),
    /// Generated placeholder, used when no reference exists.
    Generated(String),
}

impl AvatarImage {
    /// URL or path to load.
    pub fn url(&self) -> &str {
        match self {
            Self::Provided(u) | Self::Generated(u) => u,
        }
    }
}

/// Image for the avatar at `index`.
///
/// Prefers a non-empty image reference on the entity and otherwise generates one seeded by the
/// entity name (or the index when there is no name). If the provided image later fails to load,
/// falling back is the render layer's job.
pub fn avatar_image(entity: Option<&Entity>, index: usize) -> AvatarImage {
    if let Some(img) = entity.and_then(|e| e.image.as_deref()).filter(|s| !s.is_empty()) {
        return AvatarImage::Provided(img.to_owned());
    }
    match entity.map(|e| e.name.as_str()).filter(|n| !n.is_empty()) {
        Some(name) => AvatarImage::Generated(generated_avatar_url(name)),
        None => AvatarImage::Generated(generated_avatar_url(&index.to_string())),
    }
}

/// Image for a filler avatar.
pub fn filler_image(index: usize) -> AvatarImage {
    AvatarImage::Generated(generated_avatar_url(&format!("filler-{index}")))
}

/// Placeholder avatar URL with a percent-encoded seed.
pub fn generated_avatar_url(seed: &str) -> String {
    let mut out = String::with_capacity(GENERATED_AVATAR_BASE.len() + seed.len());
    out.push_str(GENERATED_AVATAR_BASE);
    for b in seed.bytes() {
        // Same unreserved set as ECMAScript encodeURIComponent.
        let keep = b.is_ascii_alphanumeric()
            || matches!(b, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')');
        if keep {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/composition/theme.rs"]
mod tests;
