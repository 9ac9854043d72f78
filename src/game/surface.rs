// Surface tag convention shared by level geometry, probes and platforms

use std::fmt;

/// Stable identity of a collidable surface.
///
/// Backends pack their own collider handles into this value; the controller
/// only ever compares identities and hands them back to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Semantic tag attached to level geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SurfaceTag {
    /// No usable contact (also the fallback for unknown tags)
    #[default]
    None,
    /// One-way platform that can be dropped through, never clung to
    Half,
    /// Solid geometry: walkable and clingable
    Full,
}

impl SurfaceTag {
    /// Resolve an authored tag string. Matching ignores case and any
    /// unrecognized value resolves to `None`.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("full") {
            Self::Full
        } else if tag.eq_ignore_ascii_case("half") {
            Self::Half
        } else {
            Self::None
        }
    }

    /// Canonical authored spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Half => "Half",
            Self::Full => "Full",
        }
    }

    /// Whether a character can grab this surface as a wall
    pub fn is_clingable(&self) -> bool {
        matches!(self, Self::Full)
    }

    /// Whether a character can drop through this surface
    pub fn is_one_way(&self) -> bool {
        matches!(self, Self::Half)
    }
}

impl From<&str> for SurfaceTag {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

impl fmt::Display for SurfaceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags_parse_case_insensitively() {
        assert_eq!(SurfaceTag::from_tag("Full"), SurfaceTag::Full);
        assert_eq!(SurfaceTag::from_tag("full"), SurfaceTag::Full);
        assert_eq!(SurfaceTag::from_tag("HALF"), SurfaceTag::Half);
        assert_eq!(SurfaceTag::from_tag("None"), SurfaceTag::None);
    }

    #[test]
    fn test_unknown_tags_resolve_to_none() {
        assert_eq!(SurfaceTag::from_tag("Player"), SurfaceTag::None);
        assert_eq!(SurfaceTag::from_tag(""), SurfaceTag::None);
        assert_eq!(SurfaceTag::from("Untagged"), SurfaceTag::None);
    }

    #[test]
    fn test_only_full_is_clingable() {
        assert!(SurfaceTag::Full.is_clingable());
        assert!(!SurfaceTag::Half.is_clingable());
        assert!(!SurfaceTag::None.is_clingable());
        assert!(SurfaceTag::Half.is_one_way());
    }

    #[test]
    fn test_tag_round_trips_through_display() {
        for tag in [SurfaceTag::None, SurfaceTag::Half, SurfaceTag::Full] {
            assert_eq!(SurfaceTag::from_tag(&tag.to_string()), tag);
        }
    }
}
