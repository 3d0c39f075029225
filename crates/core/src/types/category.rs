//! The fixed category catalog.
//!
//! Product rows store category and subcategory as free text; this table only
//! drives navigation, the subcategory filter buttons and the admin form.

/// A top-level category and its subcategories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub subcategories: &'static [&'static str],
}

/// Category shown when the catalog is opened without one.
pub const DEFAULT_CATEGORY: &str = "Men";

const APPAREL: &[&str] = &["T-Shirts", "Shorts", "Tracksuits", "Shoes"];

pub const CATALOG: &[Category] = &[
    Category {
        name: "Men",
        subcategories: APPAREL,
    },
    Category {
        name: "Women",
        subcategories: &["Tops", "Leggings", "Sports Bras", "Shoes"],
    },
    Category {
        name: "Kids",
        subcategories: APPAREL,
    },
    Category {
        name: "Equipment",
        subcategories: &["Dumbbells", "Yoga Mats", "Resistance Bands", "Jump Ropes"],
    },
    Category {
        name: "Bags & Accessories",
        subcategories: &["Gym Bags", "Water Bottles", "Caps", "Socks"],
    },
];

impl Category {
    /// Look up a category by exact name.
    #[must_use]
    pub fn find(name: &str) -> Option<&'static Self> {
        CATALOG.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn has_subcategory(&self, subcategory: &str) -> bool {
        self.subcategories.contains(&subcategory)
    }

    /// Whether the pair appears in the catalog.
    #[must_use]
    pub fn is_known_pair(category: &str, subcategory: &str) -> bool {
        Self::find(category).is_some_and(|c| c.has_subcategory(subcategory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_category_exists() {
        assert!(Category::find(DEFAULT_CATEGORY).is_some());
    }

    #[test]
    fn test_find_is_exact() {
        assert!(Category::find("Bags & Accessories").is_some());
        assert!(Category::find("men").is_none());
    }

    #[test]
    fn test_shoes_appear_under_several_categories() {
        assert!(Category::is_known_pair("Men", "Shoes"));
        assert!(Category::is_known_pair("Women", "Shoes"));
        assert!(!Category::is_known_pair("Equipment", "Shoes"));
    }
}
