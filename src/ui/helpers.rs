//! Shared formatting utilities for view models.

/// Presentation settings needed to turn domain values into display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySettings {
    /// Base URL that product image paths are relative to.
    pub cdn_url: String,
    /// Currency name appended to prices.
    pub currency: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            cdn_url: String::new(),
            currency: "synapses".to_string(),
        }
    }
}

impl DisplaySettings {
    /// Formats a catalog price; products without a price are "Priceless".
    ///
    /// ```
    /// use storefront::ui::helpers::DisplaySettings;
    ///
    /// let settings = DisplaySettings::default();
    /// assert_eq!(settings.price(Some(750)), "750 synapses");
    /// assert_eq!(settings.price(None), "Priceless");
    /// ```
    #[must_use]
    pub fn price(&self, price: Option<u64>) -> String {
        price.map_or_else(|| "Priceless".to_string(), |p| self.amount(p))
    }

    /// Formats an amount of money.
    #[must_use]
    pub fn amount(&self, amount: u64) -> String {
        format!("{amount} {}", self.currency)
    }

    /// Joins the CDN base and a product image path with exactly one slash.
    #[must_use]
    pub fn image_url(&self, image: &str) -> String {
        if self.cdn_url.is_empty() {
            return image.to_string();
        }
        format!(
            "{}/{}",
            self.cdn_url.trim_end_matches('/'),
            image.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_joins_with_single_slash() {
        let settings = DisplaySettings {
            cdn_url: "https://cdn.example/content/".into(),
            ..DisplaySettings::default()
        };
        assert_eq!(
            settings.image_url("/5_Dots.svg"),
            "https://cdn.example/content/5_Dots.svg"
        );
        assert_eq!(
            settings.image_url("Shell.svg"),
            "https://cdn.example/content/Shell.svg"
        );
    }

    #[test]
    fn image_url_without_cdn_is_unchanged() {
        assert_eq!(DisplaySettings::default().image_url("/a.svg"), "/a.svg");
    }
}
