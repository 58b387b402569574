//! Attribute markers for CLI output

pub struct AttributeIcon;

impl AttributeIcon {
    /// Discriminator attribute
    pub const DISCRIMINATOR: &'static str = "◆";

    pub const REQUIRED: &'static str = "●";

    pub const OPTIONAL: &'static str = "○";

    /// Wire key kept without a schema row
    pub const PASS_THROUGH: &'static str = "…";

    pub fn get_attribute_icon(required: bool, discriminator: bool) -> &'static str {
        if discriminator {
            Self::DISCRIMINATOR
        } else if required {
            Self::REQUIRED
        } else {
            Self::OPTIONAL
        }
    }

    pub fn get_presence_text(required: bool, discriminator: bool) -> &'static str {
        if discriminator {
            "discriminator"
        } else if required {
            "required"
        } else {
            "optional"
        }
    }
}
