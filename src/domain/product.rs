//! Product domain model.
//!
//! Products arrive in batches from `GET /product` and are never mutated afterwards. A
//! product without a price is shown in the catalog but is not for sale.
//!
//! Prices are whole units of the shop currency. `750` and `750.0` both decode; a
//! fractional amount such as `750.5` is a decode error.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Closed set of catalog categories.
///
/// The server sends localized category names; they are mapped to variants at the
/// deserialization boundary so the rest of the crate never compares strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "софт-скил")]
    SoftSkill,
    #[serde(rename = "хард-скил")]
    HardSkill,
    #[serde(rename = "другое")]
    Other,
    #[serde(rename = "дополнительное")]
    Additional,
    #[serde(rename = "кнопка")]
    Button,
}

impl Category {
    /// Short stable identifier, suitable as a style modifier for the view layer.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::SoftSkill => "soft",
            Self::HardSkill => "hard",
            Self::Other => "other",
            Self::Additional => "additional",
            Self::Button => "button",
        }
    }

    /// Display label as the server names the category.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SoftSkill => "софт-скил",
            Self::HardSkill => "хард-скил",
            Self::Other => "другое",
            Self::Additional => "дополнительное",
            Self::Button => "кнопка",
        }
    }
}

/// A catalog entry.
///
/// `price` is `None` for products that are not for sale; such products can never enter
/// the basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Image path relative to the content CDN.
    pub image: String,
    pub category: Category,
    #[serde(default, deserialize_with = "whole_price")]
    pub price: Option<u64>,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_price<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(price) = number.as_u64() {
        return Ok(Some(price));
    }
    match number.as_f64() {
        Some(price) if price >= 0.0 && price.fract() == 0.0 && price < u64::MAX as f64 => {
            Ok(Some(price as u64))
        }
        _ => Err(D::Error::custom(format!(
            "price must be a non-negative whole number, got {number}"
        ))),
    }
}

impl Product {
    /// Returns whether the product can be bought at all.
    #[must_use]
    pub const fn is_for_sale(&self) -> bool {
        self.price.is_some()
    }
}

/// Envelope returned by list endpoints: `{ items, total }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductList {
    pub items: Vec<Product>,
    #[serde(default)]
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_server_payload_with_null_price() {
        let json = r#"{
            "total": 2,
            "items": [
                {"id": "854cef69", "description": "Если планируете решать задачи в тренажёре.",
                 "image": "/5_Dots.svg", "title": "+1 час в сутках", "category": "софт-скил", "price": 750},
                {"id": "b06cde61", "description": "Не для продажи.",
                 "image": "/Asterisk_2.svg", "title": "Мамка-таймер", "category": "другое", "price": null}
            ]
        }"#;

        let list: ProductList = serde_json::from_str(json).unwrap();

        assert_eq!(list.total, 2);
        assert_eq!(list.items[0].category, Category::SoftSkill);
        assert_eq!(list.items[0].price, Some(750));
        assert!(list.items[0].is_for_sale());
        assert_eq!(list.items[1].price, None);
        assert!(!list.items[1].is_for_sale());
    }

    #[test]
    fn whole_float_prices_decode() {
        let json =
            r#"{"id": "x", "image": "/x.svg", "title": "x", "category": "кнопка", "price": 750.0}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Some(750));
    }

    #[test]
    fn fractional_and_negative_prices_are_rejected() {
        for price in ["750.5", "-1"] {
            let json = format!(
                r#"{{"id": "x", "image": "/x.svg", "title": "x",
                    "category": "кнопка", "price": {price}}}"#
            );
            let err = serde_json::from_str::<Product>(&json).unwrap_err();
            assert!(err.to_string().contains("whole number"), "{price}: {err}");
        }
    }

    #[test]
    fn rejects_categories_outside_the_closed_set() {
        let json =
            r#"{"id": "x", "image": "/x.svg", "title": "x", "category": "misc", "price": 1}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }

    #[test]
    fn category_slugs_are_distinct() {
        let all = [
            Category::SoftSkill,
            Category::HardSkill,
            Category::Other,
            Category::Additional,
            Category::Button,
        ];
        let mut slugs: Vec<_> = all.iter().map(|c| c.slug()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), all.len());
    }
}
