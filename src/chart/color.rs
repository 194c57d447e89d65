//! Stable category → color assignment.
//!
//! Colors come from two places, in precedence order:
//!
//! 1. a curated per-dimension table (fixed assignments that must survive
//!    re-renders and sessions)
//! 2. a fixed fallback palette, indexed by the category's position in the
//!    caller-supplied ordered list (assignment order when the name is absent
//!    from that list)
//!
//! Assignments are memoized per distributor instance. That is a contract, not
//! an optimization: the compact and the expanded rendering of the same chart
//! share one distributor, and a category's color must not shift between them.

use std::collections::HashMap;

use crate::domain::Dimension;

/// A backend-agnostic RGB color.
///
/// The front-ends convert this into Plotters/Ratatui color types; keeping the
/// distributor free of backend types lets the core stay renderer-neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Sentinel for unknown/empty category names.
pub const NEUTRAL_GRAY: Rgb = Rgb(0x9e, 0x9e, 0x9e);

/// Fallback palette cycle.
pub const PALETTE: [Rgb; 12] = [
    Rgb(0x1f, 0x77, 0xb4),
    Rgb(0xff, 0x7f, 0x0e),
    Rgb(0x2c, 0xa0, 0x2c),
    Rgb(0xd6, 0x27, 0x28),
    Rgb(0x94, 0x67, 0xbd),
    Rgb(0x8c, 0x56, 0x4b),
    Rgb(0xe3, 0x77, 0xc2),
    Rgb(0x7f, 0x7f, 0x7f),
    Rgb(0xbc, 0xbd, 0x22),
    Rgb(0x17, 0xbe, 0xcf),
    Rgb(0xaa, 0xc7, 0xe8),
    Rgb(0xff, 0xbb, 0x78),
];

/// Curated industry colors (sector palette of the source report).
pub const INDUSTRY_COLORS: &[(&str, Rgb)] = &[
    ("Biotech", Rgb(0x2c, 0xa0, 0x2c)),
    ("ICT", Rgb(0x1f, 0x77, 0xb4)),
    ("ICT (Fintech)", Rgb(0x17, 0xbe, 0xcf)),
    ("Fintech", Rgb(0x17, 0xbe, 0xcf)),
    ("Medtech", Rgb(0xd6, 0x27, 0x28)),
    ("Healthcare IT", Rgb(0xe3, 0x77, 0xc2)),
    ("Cleantech", Rgb(0xbc, 0xbd, 0x22)),
    ("Micro / Nano", Rgb(0x94, 0x67, 0xbd)),
    ("Consumer Products", Rgb(0xff, 0x7f, 0x0e)),
];

/// Curated canton colors for the cantons that dominate the dataset.
pub const CANTON_COLORS: &[(&str, Rgb)] = &[
    ("Zürich", Rgb(0x1f, 0x77, 0xb4)),
    ("Vaud", Rgb(0x2c, 0xa0, 0x2c)),
    ("Geneva", Rgb(0xd6, 0x27, 0x28)),
    ("Zug", Rgb(0xff, 0x7f, 0x0e)),
    ("Basel-Stadt", Rgb(0x94, 0x67, 0xbd)),
    ("Bern", Rgb(0x8c, 0x56, 0x4b)),
];

/// Curated investment-phase colors.
pub const PHASE_COLORS: &[(&str, Rgb)] = &[
    ("Seed", Rgb(0xaa, 0xc7, 0xe8)),
    ("Early Stage", Rgb(0x1f, 0x77, 0xb4)),
    ("Later Stage", Rgb(0x0b, 0x3d, 0x6b)),
];

/// Curated CEO-gender colors.
pub const GENDER_COLORS: &[(&str, Rgb)] = &[
    ("Female", Rgb(0xe3, 0x77, 0xc2)),
    ("Male", Rgb(0x1f, 0x77, 0xb4)),
];

/// Assigns and memoizes one color per category name.
pub struct ColorDistributor {
    curated: &'static [(&'static str, Rgb)],
    assigned: HashMap<String, Rgb>,
    /// Number of palette fallbacks handed out in assignment order.
    fallback_cursor: usize,
}

impl ColorDistributor {
    pub fn new(curated: &'static [(&'static str, Rgb)]) -> Self {
        Self {
            curated,
            assigned: HashMap::new(),
            fallback_cursor: 0,
        }
    }

    /// Distributor preloaded with the curated table for a dimension.
    pub fn for_dimension(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Industry => Self::new(INDUSTRY_COLORS),
            Dimension::Canton => Self::new(CANTON_COLORS),
            Dimension::Phase => Self::new(PHASE_COLORS),
            Dimension::Gender => Self::new(GENDER_COLORS),
        }
    }

    /// Color for `name`, given the ordered category universe.
    ///
    /// The first call for a name decides its color for the lifetime of this
    /// instance; later calls return the memoized value regardless of how
    /// `order` has changed in between.
    pub fn color_of(&mut self, name: &str, order: &[String]) -> Rgb {
        if name.trim().is_empty() {
            return NEUTRAL_GRAY;
        }
        if let Some(color) = self.assigned.get(name) {
            return *color;
        }

        let color = self
            .curated_color(name)
            .unwrap_or_else(|| self.palette_color(name, order));
        self.assigned.insert(name.to_string(), color);
        color
    }

    fn curated_color(&self, name: &str) -> Option<Rgb> {
        self.curated
            .iter()
            .find(|(curated_name, _)| curated_name.eq_ignore_ascii_case(name.trim()))
            .map(|&(_, color)| color)
    }

    fn palette_color(&mut self, name: &str, order: &[String]) -> Rgb {
        let index = match order.iter().position(|candidate| candidate == name) {
            Some(position) => position,
            None => {
                let position = self.fallback_cursor;
                self.fallback_cursor += 1;
                position
            }
        };
        PALETTE[index % PALETTE.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn same_name_always_gets_the_same_color() {
        let mut colors = ColorDistributor::new(&[]);
        let universe = order(&["Alpha", "Beta", "Gamma"]);

        let first = colors.color_of("Beta", &universe);
        colors.color_of("Alpha", &universe);
        colors.color_of("Gamma", &universe);
        assert_eq!(colors.color_of("Beta", &universe), first);

        // Memoization survives a reordered universe.
        let shuffled = order(&["Gamma", "Beta", "Alpha"]);
        assert_eq!(colors.color_of("Beta", &shuffled), first);
    }

    #[test]
    fn curated_colors_beat_the_palette_cycle() {
        let mut colors = ColorDistributor::for_dimension(Dimension::Industry);
        let universe = order(&["Biotech", "Robotics"]);

        assert_eq!(colors.color_of("Biotech", &universe), Rgb(0x2c, 0xa0, 0x2c));
        // Position 1 in the ordered list -> PALETTE[1].
        assert_eq!(colors.color_of("Robotics", &universe), PALETTE[1]);
    }

    #[test]
    fn names_outside_the_order_fall_back_to_assignment_order() {
        let mut colors = ColorDistributor::new(&[]);
        let universe = order(&[]);

        assert_eq!(colors.color_of("First", &universe), PALETTE[0]);
        assert_eq!(colors.color_of("Second", &universe), PALETTE[1]);
        assert_eq!(colors.color_of("First", &universe), PALETTE[0]);
    }

    #[test]
    fn empty_name_maps_to_the_gray_sentinel() {
        let mut colors = ColorDistributor::new(INDUSTRY_COLORS);
        assert_eq!(colors.color_of("", &[]), NEUTRAL_GRAY);
        assert_eq!(colors.color_of("  ", &[]), NEUTRAL_GRAY);
    }

    #[test]
    fn palette_wraps_modulo_its_length() {
        let mut colors = ColorDistributor::new(&[]);
        let names: Vec<String> = (0..PALETTE.len() + 1).map(|i| format!("cat{i}")).collect();
        let last = colors.color_of(&names[PALETTE.len()], &names);
        assert_eq!(last, PALETTE[0]);
    }
}
