// Edge insets that decide where on the surface the blur is active.
// Visual: each edge of the blurred region can be pinned by a fixed length or by a
// fraction of the surface, measured from its own edge or from the opposite one.

use serde::{Deserialize, Serialize};

use crate::types::{Rect, Size};

/// Constraint for a single edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inset {
    /// Inset by a fixed length from this edge.
    Fixed(f32),
    /// Inset so that the region ends a fixed length from the opposite edge.
    FixedMirrored(f32),
    /// Inset by a fraction of the surface extent from this edge.
    Relative(f32),
    /// Inset so that the region ends a fraction of the extent from the opposite edge.
    RelativeMirrored(f32),
}

impl Inset {
    pub const FIXED: Self = Self::Fixed(0.0);
    pub const FIXED_MIRRORED: Self = Self::FixedMirrored(0.0);
    pub const RELATIVE: Self = Self::Relative(0.0);
    pub const RELATIVE_MIRRORED: Self = Self::RelativeMirrored(0.0);

    /// The same constraint measured from the opposite edge.
    ///
    /// `Fixed(64.0).mirrored()` on the bottom edge keeps the blur in the top 64 units.
    pub fn mirrored(self) -> Self {
        match self {
            Self::Fixed(length) => Self::FixedMirrored(length),
            Self::FixedMirrored(length) => Self::Fixed(length),
            Self::Relative(factor) => Self::RelativeMirrored(factor),
            Self::RelativeMirrored(factor) => Self::Relative(factor),
        }
    }

    /// Resolve against the extent of the axis this edge lies on.
    pub fn apply(self, total: f32) -> f32 {
        match self {
            Self::Fixed(length) => length,
            Self::FixedMirrored(length) => total - length,
            Self::Relative(factor) => total * factor,
            Self::RelativeMirrored(factor) => total * (1.0 - factor),
        }
    }
}

impl Default for Inset {
    fn default() -> Self {
        Self::FIXED
    }
}

/// One constraint per edge. Edges are independent; nothing stops them from overlapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Insets {
    pub top: Inset,
    pub leading: Inset,
    pub bottom: Inset,
    pub trailing: Inset,
}

impl Insets {
    pub fn new(top: Inset, leading: Inset, bottom: Inset, trailing: Inset) -> Self {
        Self { top, leading, bottom, trailing }
    }

    pub fn with_top(mut self, inset: Inset) -> Self {
        self.top = inset;
        self
    }

    pub fn with_leading(mut self, inset: Inset) -> Self {
        self.leading = inset;
        self
    }

    pub fn with_bottom(mut self, inset: Inset) -> Self {
        self.bottom = inset;
        self
    }

    pub fn with_trailing(mut self, inset: Inset) -> Self {
        self.trailing = inset;
        self
    }

    /// Concrete offsets for a surface: top/bottom against the height,
    /// leading/trailing against the width.
    pub fn resolve(&self, size: Size) -> ResolvedInsets {
        ResolvedInsets {
            top: self.top.apply(size.height),
            leading: self.leading.apply(size.width),
            bottom: self.bottom.apply(size.height),
            trailing: self.trailing.apply(size.width),
        }
    }
}

/// Absolute edge offsets for one layout pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResolvedInsets {
    pub top: f32,
    pub leading: f32,
    pub bottom: f32,
    pub trailing: f32,
}

impl ResolvedInsets {
    /// Where the blur is active on a surface of `size` (clamped, never negative).
    pub fn active_rect(self, size: Size) -> Rect {
        size.inset_by(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [fn(f32) -> Inset; 4] =
        [Inset::Fixed, Inset::FixedMirrored, Inset::Relative, Inset::RelativeMirrored];

    #[test]
    fn test_fixed_apply() {
        for total in [0.0, 1.0, 300.0, 1234.5] {
            for length in [0.0, 12.0, 50.0, 400.0] {
                assert_eq!(Inset::Fixed(length).apply(total), length);
                assert_eq!(Inset::FixedMirrored(length).apply(total), total - length);
            }
        }
    }

    #[test]
    fn test_relative_apply() {
        for total in [0.0, 100.0, 400.0, 777.0] {
            for factor in [0.0, 0.25, 0.5, 1.0] {
                assert_eq!(Inset::Relative(factor).apply(total), total * factor);
                assert_eq!(Inset::RelativeMirrored(factor).apply(total), total * (1.0 - factor));
            }
        }
    }

    #[test]
    fn test_mirrored_round_trip() {
        for make in ALL {
            for payload in [0.0, 0.3, 64.0, -5.0] {
                let inset = make(payload);
                assert_eq!(inset.mirrored().mirrored(), inset);
                assert_ne!(inset.mirrored(), inset);
            }
        }
        assert_eq!(Inset::Fixed(3.0).mirrored(), Inset::FixedMirrored(3.0));
        assert_eq!(Inset::Relative(0.5).mirrored(), Inset::RelativeMirrored(0.5));
    }

    #[test]
    fn test_default_is_zero_everywhere() {
        let resolved = Insets::default().resolve(Size::new(200.0, 200.0));
        assert_eq!(resolved, ResolvedInsets::default());
        assert_eq!(
            resolved.active_rect(Size::new(200.0, 200.0)),
            Rect::new(0.0, 0.0, 200.0, 200.0)
        );
    }

    #[test]
    fn test_relative_top() {
        let insets = Insets::default().with_top(Inset::Relative(0.25));
        assert_eq!(insets.resolve(Size::new(100.0, 400.0)).top, 100.0);
    }

    #[test]
    fn test_mirrored_bottom() {
        let size = Size::new(200.0, 300.0);
        let insets = Insets::default().with_bottom(Inset::Fixed(50.0).mirrored());
        let resolved = insets.resolve(size);
        assert_eq!(resolved.bottom, 250.0);

        let rect = resolved.active_rect(size);
        assert_eq!(rect.height, 50.0);
        assert_eq!(rect.width, 200.0);
        assert_eq!(rect.bottom_up_y(size.height), 250.0);
    }

    #[test]
    fn test_conflicting_insets_clamp() {
        let size = Size::new(300.0, 80.0);
        let insets = Insets::default()
            .with_leading(Inset::Fixed(1000.0))
            .with_trailing(Inset::Fixed(1000.0));
        let rect = insets.resolve(size).active_rect(size);
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.height, 80.0);
    }

    #[test]
    fn test_edges_use_their_own_axis() {
        let insets = Insets::new(
            Inset::Relative(0.5),
            Inset::Relative(0.5),
            Inset::FixedMirrored(10.0),
            Inset::FixedMirrored(10.0),
        );
        let resolved = insets.resolve(Size::new(40.0, 100.0));
        assert_eq!(resolved.top, 50.0);
        assert_eq!(resolved.leading, 20.0);
        assert_eq!(resolved.bottom, 90.0);
        assert_eq!(resolved.trailing, 30.0);
    }

    #[test]
    fn test_toml_shape() {
        let insets: Insets = toml::from_str("bottom = { fixed_mirrored = 64.0 }").unwrap();
        assert_eq!(insets.bottom, Inset::FixedMirrored(64.0));
        assert_eq!(insets.top, Inset::FIXED);
    }
}
