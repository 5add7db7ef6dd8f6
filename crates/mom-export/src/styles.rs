use serde::{Deserialize, Serialize};

/// The one font convention applied to a generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStyles {
    /// Document default font, also set on every run the engine writes.
    pub font_family: String,

    /// Font size in points.
    pub font_size: usize,

    /// Weight of the text kept in front of a placeholder and of the time-range line.
    pub default_bold: bool,
}

impl DocumentStyles {
    /// OOXML sizes are in half-points.
    pub fn half_points(&self) -> usize {
        self.font_size * 2
    }
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            font_family: "Calibri".to_string(),
            font_size: 14,
            default_bold: true,
        }
    }
}
