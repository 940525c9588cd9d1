use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Hospital,
    Restaurant,
    Supermarket,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Hospital,
        Category::Restaurant,
        Category::Supermarket,
    ];

    /// Keyword sent to the places text search.
    pub fn query(&self) -> &'static str {
        match self {
            Self::Hospital => "hospital",
            Self::Restaurant => "restaurant",
            Self::Supermarket => "supermarket",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hospital => "Hospitals",
            Self::Restaurant => "Restaurants",
            Self::Supermarket => "Supermarkets",
        }
    }
}

#[test]
fn default_category_test() {
    assert_eq!(Category::default(), Category::Hospital);
}

#[test]
fn category_wire_format_test() {
    let category: Category = serde_json::from_str("\"supermarket\"").unwrap();
    assert_eq!(category, Category::Supermarket);
    assert_eq!(category.query(), "supermarket");

    assert!(serde_json::from_str::<Category>("\"pharmacy\"").is_err());
}
