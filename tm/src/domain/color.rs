//! List color tags
//!
//! The palette is a closed set of six tags stored as lowercase strings. How a
//! tag is drawn is decided by the presentation layer, not here.

use std::fmt;
use std::str::FromStr;

use rand::seq::IndexedRandom;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::warn;

/// Color tag attached to a task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    Blue,
    Purple,
    Emerald,
    Rose,
    Amber,
    #[default]
    Indigo,
}

/// Error for a color tag outside the palette
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown color '{0}'. Expected one of: blue, purple, emerald, rose, amber, indigo")]
pub struct UnknownColor(pub String);

impl ThemeColor {
    /// Every tag in palette order
    pub const ALL: [ThemeColor; 6] = [
        ThemeColor::Blue,
        ThemeColor::Purple,
        ThemeColor::Emerald,
        ThemeColor::Rose,
        ThemeColor::Amber,
        ThemeColor::Indigo,
    ];

    /// The stored tag string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Emerald => "emerald",
            Self::Rose => "rose",
            Self::Amber => "amber",
            Self::Indigo => "indigo",
        }
    }

    /// Pick a tag uniformly at random
    pub fn random() -> Self {
        Self::ALL.choose(&mut rand::rng()).copied().unwrap_or_default()
    }

    /// Parse a stored value leniently
    ///
    /// Accepts the tag in any case, and the `bg-<tag>-500` class strings older
    /// data files carry.
    pub fn from_stored(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        let tag = value
            .strip_prefix("bg-")
            .and_then(|rest| rest.strip_suffix("-500"))
            .unwrap_or(value.as_str());
        Self::ALL.into_iter().find(|c| c.as_str() == tag)
    }
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_stored(s).ok_or_else(|| UnknownColor(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for ThemeColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_stored(&raw).unwrap_or_else(|| {
            warn!(color = %raw, "ThemeColor: unknown stored color, using default");
            Self::default()
        }))
    }
}
