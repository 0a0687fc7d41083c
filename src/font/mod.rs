//! # Font Management
//!
//! Reports are set in the standard PDF Helvetica faces, which viewers
//! supply themselves, so nothing is embedded. Layout still needs real
//! advance widths to right-align currency and centre totals; those come
//! from the Adobe font metrics in [`metrics`].

pub mod metrics;

pub use metrics::StandardFontMetrics;
use serde::Serialize;

/// The standard PDF fonts the report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }

    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica => &metrics::HELVETICA,
            Self::HelveticaBold => &metrics::HELVETICA_BOLD,
        }
    }

    /// Measure the width of a string in points.
    pub fn measure(&self, text: &str, font_size: f64) -> f64 {
        self.metrics().measure_string(text, font_size, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_space_width() {
        let w = StandardFont::Helvetica.measure(" ", 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn bold_is_wider() {
        let regular = StandardFont::Helvetica.measure("Total", 10.0);
        let bold = StandardFont::HelveticaBold.measure("Total", 10.0);
        assert!(bold > regular, "Bold text should be wider than regular");
    }

    #[test]
    fn digits_are_tabular() {
        let a = StandardFont::Helvetica.measure("1111", 10.0);
        let b = StandardFont::Helvetica.measure("8888", 10.0);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn pdf_names() {
        assert_eq!(StandardFont::Helvetica.pdf_name(), "Helvetica");
        assert_eq!(StandardFont::HelveticaBold.pdf_name(), "Helvetica-Bold");
    }
}
