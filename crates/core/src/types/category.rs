//! Category tabs shown above the product grid.

/// Wildcard category id that matches every product.
pub const ALL_CATEGORIES: &str = "all";

/// A category tab: the id stored on products and its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTab {
    pub id: &'static str,
    pub name: &'static str,
}

/// Tabs in display order. The wildcard tab comes first.
pub const CATEGORY_TABS: &[CategoryTab] = &[
    CategoryTab {
        id: ALL_CATEGORIES,
        name: "Todo",
    },
    CategoryTab {
        id: "sneakers",
        name: "Zapatillas",
    },
    CategoryTab {
        id: "men",
        name: "Ropa Hombre",
    },
    CategoryTab {
        id: "women",
        name: "Ropa Mujer",
    },
    CategoryTab {
        id: "caps",
        name: "Gorras",
    },
];

/// Label for a category id, if it is one of the tabs.
#[must_use]
pub fn tab_label(id: &str) -> Option<&'static str> {
    CATEGORY_TABS
        .iter()
        .find(|tab| tab.id == id)
        .map(|tab| tab.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_tab_is_first() {
        assert_eq!(CATEGORY_TABS.first().map(|t| t.id), Some(ALL_CATEGORIES));
    }

    #[test]
    fn test_tab_label() {
        assert_eq!(tab_label("caps"), Some("Gorras"));
        assert_eq!(tab_label("all"), Some("Todo"));
        assert_eq!(tab_label("boots"), None);
    }
}
