//! # Report Styling
//!
//! Colors, column alignment, and the typographic scale shared by every
//! report variant. Sizes are in points.

use serde::{Deserialize, Serialize};

/// Horizontal anchoring of a column's text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    /// Text starts at the column's x offset.
    #[default]
    Left,
    /// Text ends at the column's x offset plus its width.
    Right,
}

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn gray(level: f64) -> Self {
        Self::rgb(level, level, level)
    }

    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let (r, g, b) = match hex.len() {
            _ if !hex.is_ascii() => (0, 0, 0),
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).unwrap_or(0);
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                (r, g, b)
            }
            _ => (0, 0, 0),
        };
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Font sizes and vertical rhythm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Typography {
    pub title_size: f64,
    pub subtitle_size: f64,
    pub stamp_size: f64,
    pub company_size: f64,
    pub tax_id_size: f64,
    pub table_header_size: f64,
    pub row_size: f64,
    pub company_total_size: f64,
    pub grand_total_size: f64,
    pub footer_size: f64,
    pub caption_size: f64,
    /// Line advance as a multiple of the font size.
    pub line_spacing: f64,
    /// Gap below the report header block.
    pub header_gap: f64,
    /// Gap below a company header, before its table.
    pub company_gap: f64,
    /// Vertical room taken by a separator line, split evenly around it.
    pub separator_gap: f64,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            title_size: 16.0,
            subtitle_size: 10.0,
            stamp_size: 8.0,
            company_size: 11.0,
            tax_id_size: 9.0,
            table_header_size: 9.0,
            row_size: 8.0,
            company_total_size: 10.0,
            grand_total_size: 13.0,
            footer_size: 8.0,
            caption_size: 7.0,
            line_spacing: 1.4,
            header_gap: 12.0,
            company_gap: 4.0,
            separator_gap: 16.0,
        }
    }
}

impl Typography {
    /// Vertical space one line of text at `size` consumes.
    pub fn line_height(&self, size: f64) -> f64 {
        size * self.line_spacing
    }

    /// Height of the report header block: title, period and stamp lines
    /// plus the gap below them.
    pub fn header_height(&self) -> f64 {
        self.line_height(self.title_size)
            + self.line_height(self.subtitle_size)
            + self.line_height(self.stamp_size)
            + self.header_gap
    }

    /// Height of the footer slot reserved at the bottom of every page.
    pub fn footer_height(&self) -> f64 {
        self.company_gap + self.line_height(self.footer_size) + self.line_height(self.caption_size)
    }
}

/// Fill and ink colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub table_header_fill: Color,
    pub stripe_fill: Color,
    pub separator: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            text: Color::BLACK,
            muted: Color::gray(0.4),
            table_header_fill: Color::hex("#d9dee7"),
            stripe_fill: Color::hex("#f3f5f8"),
            separator: Color::gray(0.6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_parsing() {
        let c = Color::hex("#ff0000");
        assert_eq!(c, Color::rgb(1.0, 0.0, 0.0));
        let short = Color::hex("fff");
        assert_eq!(short, Color::WHITE);
        assert_eq!(Color::hex("nope"), Color::BLACK);
    }

    #[test]
    fn line_height_scales_with_size() {
        let t = Typography::default();
        assert!((t.line_height(10.0) - 14.0).abs() < 1e-9);
    }

    #[test]
    fn header_and_footer_heights_follow_sizes() {
        let t = Typography::default();
        let header = (t.title_size + t.subtitle_size + t.stamp_size) * 1.4 + t.header_gap;
        assert!((t.header_height() - header).abs() < 1e-9);
        let footer = t.company_gap + (t.footer_size + t.caption_size) * 1.4;
        assert!((t.footer_height() - footer).abs() < 1e-9);
    }
}
