use std::fmt;

use serde::Deserialize;

/// A fill color exactly as the workbook stores it (ARGB hex, e.g. `FF92D050`).
///
/// Equality is plain string equality: `FF92D050` and `ff92d050` are different
/// tags, and so is a theme color that happens to render the same green.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ColorTag(String);

impl ColorTag {
    pub fn new(tag: impl Into<String>) -> Self {
        ColorTag(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Highlight> for ColorTag {
    fn from(value: Highlight) -> Self {
        ColorTag::new(value.argb())
    }
}

/// Highlight colors used in the fulfillment reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    Green,
    Red,
    Blue,
    White,
}

impl Highlight {
    pub const ALL: [Highlight; 4] = [
        Highlight::Green,
        Highlight::Red,
        Highlight::Blue,
        Highlight::White,
    ];

    pub const fn argb(self) -> &'static str {
        match self {
            Highlight::Green => "FF92D050",
            Highlight::Red => "FFFFC7CE",
            Highlight::Blue => "FF00B0F0",
            Highlight::White => "FFFFFFFF",
        }
    }

    pub fn from_tag(tag: &ColorTag) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.argb() == tag.as_str())
    }

    pub const fn label(self) -> &'static str {
        match self {
            Highlight::Green => "green",
            Highlight::Red => "red",
            Highlight::Blue => "blue",
            Highlight::White => "white",
        }
    }
}

/// What a marker color means for the row carrying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerRole {
    Select,
    Skip,
    Stop,
}

/// Maps marker roles to the color that triggers them.
///
/// Blue is reserved in the reports and has no role by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub select: ColorTag,
    pub skip: ColorTag,
    pub stop: ColorTag,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            select: Highlight::Green.into(),
            skip: Highlight::White.into(),
            stop: Highlight::Red.into(),
        }
    }
}

impl Palette {
    pub fn tag_for(&self, role: MarkerRole) -> &ColorTag {
        match role {
            MarkerRole::Select => &self.select,
            MarkerRole::Skip => &self.skip,
            MarkerRole::Stop => &self.stop,
        }
    }

    /// Roles a tag triggers; one tag may be configured for several roles.
    pub fn roles_of(&self, tag: &ColorTag) -> Vec<MarkerRole> {
        [MarkerRole::Select, MarkerRole::Skip, MarkerRole::Stop]
            .into_iter()
            .filter(|role| self.tag_for(*role) == tag)
            .collect()
    }
}

/// Human label for a tag, falling back to the raw hex.
pub fn describe_tag(tag: &ColorTag) -> String {
    match Highlight::from_tag(tag) {
        Some(highlight) => format!("{tag} ({})", highlight.label()),
        None => tag.to_string(),
    }
}
