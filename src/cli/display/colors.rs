//! Color theme for CLI output

use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub discriminator: TableColor,
    pub required: TableColor,
    pub optional: TableColor,
    pub pass_through: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            discriminator: TableColor::Cyan,
            required: TableColor::Yellow,
            optional: TableColor::Green,
            pass_through: TableColor::Magenta,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Get color for an attribute row
    pub fn get_attribute_color(&self, required: bool, discriminator: bool) -> TableColor {
        if discriminator {
            self.discriminator
        } else if required {
            self.required
        } else {
            self.optional
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = ColorTheme::default();
        assert_eq!(theme.discriminator, TableColor::Cyan);
        assert_eq!(theme.required, TableColor::Yellow);
        assert_eq!(theme.optional, TableColor::Green);
    }

    #[test]
    fn test_get_attribute_color() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_attribute_color(true, true), TableColor::Cyan);
        assert_eq!(theme.get_attribute_color(true, false), TableColor::Yellow);
        assert_eq!(theme.get_attribute_color(false, false), TableColor::Green);
    }
}
