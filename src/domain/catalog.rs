/// The icon catalog: every symbol a player may pick from.
///
/// The catalog is constant and ordered. The selection screen lays it out
/// one category per row, so `ROW_LEN` must stay equal to each category's size.

/// A symbol from the catalog. Icons are compared by value.
pub type Icon = &'static str;

/// Icons per category (and per row on the selection grid).
pub const ROW_LEN: usize = 8;

pub const ICONS: [Icon; 32] = [
    "🐶", "🐱", "🐼", "🦊", "🦁", "🐯", "🐮", "🐷", // animals
    "🚗", "🚲", "✈️", "🚀", "🚁", "🚂", "⛵️", "🛸", // vehicles
    "⚽️", "🏀", "🎾", "🎮", "🎨", "🎭", "🎪", "🎯", // activities
    "🌞", "⭐️", "🌈", "🌙", "⛈️", "❄️", "🌺", "🌴", // nature
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Category {
    Animals,
    Vehicles,
    Activities,
    Nature,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Animals,
        Category::Vehicles,
        Category::Activities,
        Category::Nature,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Animals => "Animals",
            Category::Vehicles => "Vehicles",
            Category::Activities => "Activities",
            Category::Nature => "Nature",
        }
    }

    /// The icons of this category, in catalog order.
    pub fn icons(self) -> &'static [Icon] {
        let row = self as usize;
        &ICONS[row * ROW_LEN..(row + 1) * ROW_LEN]
    }
}

/// Number of rows on the selection grid.
pub fn rows() -> usize {
    ICONS.len().div_ceil(ROW_LEN)
}

/// Icon at a grid position, if the position is inside the catalog.
pub fn at(row: usize, col: usize) -> Option<Icon> {
    if col >= ROW_LEN {
        return None;
    }
    ICONS.get(row * ROW_LEN + col).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icons_are_unique() {
        for (i, a) in ICONS.iter().enumerate() {
            for b in &ICONS[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn categories_cover_catalog() {
        let total: usize = Category::ALL.iter().map(|c| c.icons().len()).sum();
        assert_eq!(total, ICONS.len());
        assert_eq!(rows(), Category::ALL.len());
    }

    #[test]
    fn grid_lookup() {
        assert_eq!(at(0, 0), Some("🐶"));
        assert_eq!(at(1, 3), Some("🚀"));
        assert_eq!(at(3, 7), Some("🌴"));
        assert_eq!(at(4, 0), None);
        assert_eq!(at(0, 8), None);
    }

    #[test]
    fn category_slices() {
        assert_eq!(Category::Animals.icons()[2], "🐼");
        assert_eq!(Category::Activities.icons().last(), Some(&"🎯"));
        assert_eq!(Category::Nature.label(), "Nature");
    }
}
