//! Console color palette and ANSI escape sequence generation.
//!
//! Colors are hex strings converted to 24-bit ANSI sequences. A disabled theme
//! returns text unchanged, for pipes and `NO_COLOR` terminals.
//!
//! # Example
//!
//! ```
//! use storefront::ui::theme::Theme;
//!
//! let theme = Theme::plain();
//! assert_eq!(theme.accent("Basket"), "Basket");
//!
//! let colored = Theme::default();
//! assert!(colored.accent("Basket").starts_with("\u{1b}[38;2;"));
//! ```

/// Color scheme for console output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Emit escape sequences at all.
    pub enabled: bool,
    /// Headings and product titles.
    pub accent_fg: String,
    /// Prices and totals.
    pub price_fg: String,
    /// Successful results.
    pub success_fg: String,
    /// Validation and failure messages.
    pub error_fg: String,
    /// Hints and secondary text.
    pub muted_fg: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            enabled: true,
            accent_fg: "#f5c2e7".to_string(),
            price_fg: "#f9e2af".to_string(),
            success_fg: "#a6e3a1".to_string(),
            error_fg: "#f38ba8".to_string(),
            muted_fg: "#6c7086".to_string(),
        }
    }
}

impl Theme {
    /// Theme that never colors anything.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Converts a hex color to an RGB tuple; white on malformed input.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// ANSI 24-bit foreground escape sequence for `hex`.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }

    fn paint(&self, hex: &str, text: &str) -> String {
        if self.enabled {
            format!("{}{text}{}", Self::fg(hex), Self::reset())
        } else {
            text.to_string()
        }
    }

    #[must_use]
    pub fn accent(&self, text: &str) -> String {
        self.paint(&self.accent_fg, text)
    }

    #[must_use]
    pub fn price(&self, text: &str) -> String {
        self.paint(&self.price_fg, text)
    }

    #[must_use]
    pub fn success(&self, text: &str) -> String {
        self.paint(&self.success_fg, text)
    }

    #[must_use]
    pub fn error(&self, text: &str) -> String {
        self.paint(&self.error_fg, text)
    }

    #[must_use]
    pub fn muted(&self, text: &str) -> String {
        self.paint(&self.muted_fg, text)
    }

    /// Bold heading in the accent color.
    #[must_use]
    pub fn heading(&self, text: &str) -> String {
        if self.enabled {
            format!("{}{}", Self::bold(), self.accent(text))
        } else {
            text.to_string()
        }
    }
}
