//! Category colours used by bars and gradients

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CategoryColor {
    pub hex: &'static str,
    pub dark: &'static str,
    pub light: &'static str,
    /// Readable foreground for pale fills
    pub icon: Option<&'static str>,
}

impl CategoryColor {
    /// Colour to draw the category's name with.
    pub fn text(&self) -> &'static str {
        self.icon.unwrap_or(self.dark)
    }
}

const fn color(hex: &'static str, dark: &'static str, light: &'static str) -> CategoryColor {
    CategoryColor { hex, dark, light, icon: None }
}

/// Known categories, in the order the server lists them.
pub const CATEGORIES: [&str; 7] = [
    "Food & Drink",
    "Shopping",
    "Entertainment",
    "Transportation",
    "Health",
    "Travel",
    "Services",
];

pub const FALLBACK: CategoryColor = color("#ADB5BD", "#98A0A8", "#C1C8CE");

pub fn category_color(category: &str) -> CategoryColor {
    match category {
        "Food & Drink" => color("#98c1d9", "#84adc5", "#aed1e4"),
        "Shopping" => color("#ee6c4d", "#d45e42", "#f28568"),
        "Entertainment" => color("#EDE574", "#d6cf62", "#f3ec95"),
        "Transportation" => color("#3d5a80", "#334d6e", "#5478a0"),
        "Health" => color("#FF4E50", "#e04345", "#ff7173"),
        "Travel" => color("#FC913A", "#e07e30", "#fdaa64"),
        "Services" => CategoryColor {
            icon: Some("#4da8b0"),
            ..color("#e0fbfc", "#c5e8ea", "#edfcfd")
        },
        _ => FALLBACK,
    }
}
