//! # Report Model
//!
//! The input representation for the layout engine. A report request is a
//! shallow tree: a reporting period, an ordered list of company groups, and
//! under each group an ordered list of fiscal documents. Callers aggregate
//! and total the data before it gets here; the engine only places it.
//!
//! Page geometry lives here too. The two report variants share one
//! algorithm and differ only in their [`PageGeometry`].

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::style::Alignment;

/// A complete report ready for layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    /// Start of the reporting period. Display-only, formatted as a date
    /// when it parses and printed verbatim otherwise.
    #[serde(default)]
    pub period_start: String,

    /// End of the reporting period.
    #[serde(default)]
    pub period_end: String,

    /// Company groups in display order.
    #[serde(default)]
    pub companies: Vec<CompanyGroup>,

    /// Caller-computed grand total. When absent the grand total is the sum
    /// of the company totals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_general: Option<Decimal>,
}

impl ReportRequest {
    /// The grand total printed at the end of the report.
    ///
    /// Only trusted totals are used: either the caller's own grand total or
    /// the sum of `CompanyGroup::total`. Line amounts are never summed.
    pub fn grand_total(&self) -> Decimal {
        self.total_general
            .unwrap_or_else(|| self.companies.iter().map(|c| c.total).sum())
    }
}

/// One reporting unit whose documents are listed together with a subtotal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyGroup {
    pub name: String,

    /// Raw digits or an already formatted tax id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,

    #[serde(default)]
    pub documents: Vec<DocumentLine>,

    /// Precomputed by the caller and printed as-is.
    #[serde(default)]
    pub total: Decimal,
}

impl CompanyGroup {
    /// The tax id, if present and not blank.
    pub fn tax_id(&self) -> Option<&str> {
        self.tax_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// One fiscal document record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLine {
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub issue_date: String,
    #[serde(default)]
    pub supplier_name: String,
    #[serde(default)]
    pub supplier_tax_id: String,
    #[serde(default)]
    pub amount: Decimal,
}

/// The externally supplied generation time, stamped once per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStamp {
    pub generated_at: NaiveDateTime,
}

impl ReportStamp {
    pub fn new(generated_at: NaiveDateTime) -> Self {
        Self { generated_at }
    }

    /// Stamp with the current local time.
    pub fn now() -> Self {
        Self::new(chrono::Local::now().naive_local())
    }
}

/// Document metadata embedded in the PDF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
}

/// Page dimensions, margin, row height and column layout for one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    #[serde(default)]
    pub size: PageSize,

    #[serde(default)]
    pub orientation: Orientation,

    /// Uniform page margin in points.
    pub margin: f64,

    /// Fixed height of every table row, header row included.
    pub row_height: f64,

    /// Inset of cell text from its column edges.
    #[serde(default)]
    pub cell_padding: f64,

    pub columns: Vec<ColumnSpec>,
}

impl PageGeometry {
    /// Returns (width, height) in points, after applying the orientation.
    pub fn dimensions(&self) -> (f64, f64) {
        let (w, h) = self.size.dimensions();
        match self.orientation {
            Orientation::Portrait => (w.min(h), w.max(h)),
            Orientation::Landscape => (w.max(h), w.min(h)),
        }
    }

    /// Left edge of the table: the leftmost column start.
    pub fn table_left(&self) -> f64 {
        let left = self
            .columns
            .iter()
            .map(|c| c.x_offset)
            .fold(f64::INFINITY, f64::min);
        if left.is_finite() {
            left
        } else {
            self.margin
        }
    }

    /// Right edge of the table: the rightmost column end.
    pub fn table_right(&self) -> f64 {
        let right = self
            .columns
            .iter()
            .map(|c| c.x_offset + c.width)
            .fold(f64::NEG_INFINITY, f64::max);
        if right.is_finite() {
            right
        } else {
            self.dimensions().0 - self.margin
        }
    }

    pub fn table_width(&self) -> f64 {
        (self.table_right() - self.table_left()).max(0.0)
    }

    /// Horizontal span of the content area (between the side margins).
    pub fn content_span(&self) -> (f64, f64) {
        let (w, _) = self.dimensions();
        (self.margin, w - self.margin)
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points, portrait.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// One table column: where it sits, what it shows, and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub title: String,
    pub x_offset: f64,
    pub width: f64,
    #[serde(default)]
    pub align: Alignment,
    pub field: ColumnField,
    /// Longer string values are cut to this many characters, ellipsis
    /// included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<usize>,
}

/// Which document field a column displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnField {
    Number,
    IssueDate,
    SupplierName,
    SupplierTaxId,
    Amount,
}
