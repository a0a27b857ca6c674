// src/engine/catalog.rs
//
// Ordered style catalog and "pick a different style" selection.

use crate::error::SnapStyleError;
use crate::ops::Style;
use rand::Rng;
use std::borrow::Cow;
use tracing::trace;

/// Draw budget per catalog entry before falling back to a deterministic pick.
const MAX_DRAWS_PER_ENTRY: usize = 16;

/// An ordered, non-empty list of styles.
///
/// Order only matters for selection; every entry is applied the same way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleCatalog {
    styles: Cow<'static, [Style]>,
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StyleCatalog {
    /// The ten built-in styles in display order.
    pub fn builtin() -> Self {
        Self {
            styles: Cow::Borrowed(&Style::ALL),
        }
    }

    pub fn new(styles: Vec<Style>) -> Result<Self, SnapStyleError> {
        if styles.is_empty() {
            return Err(SnapStyleError::invalid_argument(
                "styles",
                "[]",
                "A style catalog needs at least one entry",
            ));
        }
        Ok(Self {
            styles: Cow::Owned(styles),
        })
    }

    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Never true: `new` rejects an empty list and `builtin` has ten entries.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn contains(&self, style: Style) -> bool {
        self.styles.contains(&style)
    }

    /// Look up a catalog entry by name (same matching rules as `Style::from_name`).
    pub fn get(&self, name: &str) -> Option<Style> {
        Style::from_name(name).filter(|style| self.contains(*style))
    }

    /// Pick a style uniformly at random whose name differs from `current`.
    ///
    /// With a single entry that entry is returned. Draws are bounded; once
    /// the budget is spent the first entry after the last draw that differs
    /// from `current` is returned. If every entry matches `current`
    /// (duplicates of one style) the last draw is returned.
    pub fn select_random_with<R: Rng + ?Sized>(&self, current: &str, rng: &mut R) -> Style {
        let n = self.styles.len();
        if n == 1 {
            return self.styles[0];
        }

        let current_style = Style::from_name(current);
        let is_current = |style: Style| style.name() == current || Some(style) == current_style;

        let mut last = 0;
        for attempt in 0..n * MAX_DRAWS_PER_ENTRY {
            let idx = rng.random_range(0..n);
            let candidate = self.styles[idx];
            if !is_current(candidate) {
                return candidate;
            }
            trace!(target: "snapstyle::catalog", attempt, current, "redraw");
            last = idx;
        }

        (1..=n)
            .map(|offset| self.styles[(last + offset) % n])
            .find(|style| !is_current(*style))
            .unwrap_or(self.styles[last])
    }

    /// `select_random_with` using the thread-local RNG.
    pub fn select_random(&self, current: &str) -> Style {
        self.select_random_with(current, &mut rand::rng())
    }
}

/// Pick a random built-in style different from `current_name`.
pub fn select_random_style(current_name: &str) -> Style {
    StyleCatalog::builtin().select_random(current_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    /// Always yields zero, so every draw lands on the first entry.
    struct StuckRng;

    impl RngCore for StuckRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    #[test]
    fn builtin_has_ten_entries_in_order() {
        let catalog = StyleCatalog::builtin();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.styles()[0], Style::Original);
        assert_eq!(catalog.styles()[9], Style::Posterize);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(StyleCatalog::new(Vec::new()).is_err());
    }

    #[test]
    fn never_returns_current_style() {
        let catalog = StyleCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        for style in Style::ALL {
            for _ in 0..200 {
                let picked = catalog.select_random_with(style.name(), &mut rng);
                assert_ne!(picked, style);
            }
        }
    }

    #[test]
    fn loose_current_name_is_still_excluded() {
        let catalog = StyleCatalog::new(vec![Style::BlackAndWhite, Style::Sepia]).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert_eq!(catalog.select_random_with("bw", &mut rng), Style::Sepia);
        }
    }

    #[test]
    fn unknown_current_allows_any_entry() {
        let catalog = StyleCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            seen.insert(catalog.select_random_with("Nonexistent", &mut rng));
        }
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn single_entry_catalog_returns_that_entry() {
        let catalog = StyleCatalog::new(vec![Style::Sepia]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(catalog.select_random_with("Sepia", &mut rng), Style::Sepia);
    }

    #[test]
    fn exhausted_budget_falls_back_to_next_entry() {
        let catalog = StyleCatalog::builtin();
        assert_eq!(
            catalog.select_random_with("Original", &mut StuckRng),
            Style::BlackAndWhite
        );
    }

    #[test]
    fn all_duplicates_terminate() {
        let catalog = StyleCatalog::new(vec![Style::Invert, Style::Invert]).unwrap();
        assert_eq!(
            catalog.select_random_with("Invert", &mut StuckRng),
            Style::Invert
        );
    }

    #[test]
    fn get_respects_catalog_membership() {
        let catalog = StyleCatalog::new(vec![Style::Dither]).unwrap();
        assert_eq!(catalog.get("dither"), Some(Style::Dither));
        assert_eq!(catalog.get("Sepia"), None);
    }

    #[test]
    fn thread_rng_entry_point() {
        for _ in 0..50 {
            assert_ne!(select_random_style("Original"), Style::Original);
        }
    }
}
