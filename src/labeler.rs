//! Heuristic category labeling.
//!
//! Assigns a coarse category to every review from fixed keyword families,
//! checking tags first and falling back to the product name. The first
//! matching category in precedence order wins, so a title containing both
//! "shampoo" and "lipstick" is classified by whichever family is checked
//! first. These labels are the training signal for the classifier.

use crate::models::Category;

/// Tag keyword families in precedence order.
const TAG_KEYWORDS: [(Category, &[&str]); 5] = [
    (
        Category::Skincare,
        &["skin", "face", "moistur", "cleans", "serum", "cream", "lotion"],
    ),
    (Category::Haircare, &["hair", "shampoo", "condition", "dye"]),
    (
        Category::Makeup,
        &["makeup", "lip", "foundation", "mascara", "eye", "blush"],
    ),
    (Category::Fragrance, &["fragrance", "perfume", "cologne"]),
    (
        Category::Bodycare,
        &["body", "deodorant", "lotion", "wash", "soap"],
    ),
];

/// Product-name keyword families, larger than the tag lists, same precedence.
const NAME_KEYWORDS: [(Category, &[&str]); 5] = [
    (
        Category::Skincare,
        &[
            "cream",
            "serum",
            "moisturizer",
            "lotion",
            "cleanser",
            "mask",
            "face",
            "toner",
            "exfoliator",
            "sunscreen",
            "eye cream",
            "face oil",
            "facial",
        ],
    ),
    (
        Category::Haircare,
        &[
            "shampoo",
            "conditioner",
            "hair oil",
            "hair serum",
            "hair",
            "dye",
            "styling gel",
            "hair mask",
            "hair color",
            "hair spray",
            "dry shampoo",
        ],
    ),
    (
        Category::Makeup,
        &[
            "lipstick",
            "foundation",
            "mascara",
            "kajal",
            "eyeliner",
            "blush",
            "gloss",
            "powder",
            "concealer",
            "primer",
            "highlighter",
            "bronzer",
            "eyeshadow",
        ],
    ),
    (
        Category::Fragrance,
        &[
            "perfume",
            "fragrance",
            "cologne",
            "body mist",
            "scent",
            "eau de",
            "toilette",
        ],
    ),
    (
        Category::Bodycare,
        &[
            "body wash",
            "body lotion",
            "deodorant",
            "body cream",
            "scrub",
            "soap",
            "body oil",
            "hand cream",
            "foot cream",
        ],
    ),
];

/// Assign a category from keyword rules.
///
/// Tags take priority over the product name when present and non-empty.
/// `brand` is accepted for future extensibility but not currently consulted.
#[must_use]
pub fn heuristic_label(product_name: &str, _brand: Option<&str>, tags: Option<&str>) -> Category {
    if let Some(tags) = tags {
        if !tags.trim().is_empty() {
            let tags_lower = tags.to_lowercase();
            if let Some(category) = first_match(&TAG_KEYWORDS, &tags_lower) {
                return category;
            }
        }
    }

    let name_lower = product_name.to_lowercase();
    first_match(&NAME_KEYWORDS, &name_lower).unwrap_or(Category::Other)
}

fn first_match(families: &[(Category, &[&str])], text: &str) -> Option<Category> {
    families
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(category, _)| *category)
}
