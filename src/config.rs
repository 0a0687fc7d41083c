//! # Report Configuration
//!
//! A [`ReportVariant`] names one of the known report kinds and expands to a
//! full [`ReportLayout`]: page geometry, columns, captions and typography.
//! A TOML file can pick a variant and override any part of its layout.
//!
//! ```toml
//! variant = "nfse"
//! product_name = "SimpleFlow"
//! repeat_header_on_break = true
//!
//! [labels]
//! page_footer = "Página {page} de {total}"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::format::CurrencyFormat;
use crate::model::{ColumnField, ColumnSpec, Metadata, Orientation, PageGeometry, PageSize};
use crate::style::{Alignment, Palette, Typography};

/// The report kinds this crate knows how to lay out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportVariant {
    /// Goods invoices (NF-e): A4 portrait.
    #[default]
    Nfe,
    /// Service invoices (NFS-e): A4 landscape, wider supplier columns.
    Nfse,
}

impl ReportVariant {
    pub const ALL: [ReportVariant; 2] = [ReportVariant::Nfe, ReportVariant::Nfse];

    /// Default layout for this variant.
    pub fn layout(self) -> ReportLayout {
        ReportLayout {
            title: self.title().to_string(),
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            geometry: self.geometry(),
            typography: Typography::default(),
            palette: Palette::default(),
            labels: Labels::default(),
            currency: CurrencyFormat::default(),
            repeat_header_on_break: false,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportVariant::Nfe => "Relatório de Notas Fiscais Eletrônicas (NF-e)",
            ReportVariant::Nfse => "Relatório de Notas Fiscais de Serviço (NFS-e)",
        }
    }

    /// Supplier-name truncation threshold, matched to the column width.
    pub fn supplier_max_chars(self) -> usize {
        match self {
            ReportVariant::Nfe => 35,
            ReportVariant::Nfse => 45,
        }
    }

    pub fn geometry(self) -> PageGeometry {
        let max = Some(self.supplier_max_chars());
        match self {
            ReportVariant::Nfe => PageGeometry {
                size: PageSize::A4,
                orientation: Orientation::Portrait,
                margin: 40.0,
                row_height: 16.0,
                cell_padding: 4.0,
                columns: vec![
                    column("Número", 40.0, 55.0, Alignment::Left, ColumnField::Number, None),
                    column("Emissão", 95.0, 58.0, Alignment::Left, ColumnField::IssueDate, None),
                    column(
                        "Fornecedor",
                        153.0,
                        200.0,
                        Alignment::Left,
                        ColumnField::SupplierName,
                        max,
                    ),
                    column("CNPJ", 353.0, 92.0, Alignment::Left, ColumnField::SupplierTaxId, None),
                    column("Valor", 445.0, 110.28, Alignment::Right, ColumnField::Amount, None),
                ],
            },
            ReportVariant::Nfse => PageGeometry {
                size: PageSize::A4,
                orientation: Orientation::Landscape,
                margin: 40.0,
                row_height: 16.0,
                cell_padding: 4.0,
                columns: vec![
                    column("Número", 40.0, 80.0, Alignment::Left, ColumnField::Number, None),
                    column("Emissão", 120.0, 70.0, Alignment::Left, ColumnField::IssueDate, None),
                    column(
                        "Prestador",
                        190.0,
                        300.0,
                        Alignment::Left,
                        ColumnField::SupplierName,
                        max,
                    ),
                    column(
                        "CNPJ Prestador",
                        490.0,
                        150.0,
                        Alignment::Left,
                        ColumnField::SupplierTaxId,
                        None,
                    ),
                    column("Valor", 640.0, 161.89, Alignment::Right, ColumnField::Amount, None),
                ],
            },
        }
    }
}

fn column(
    title: &str,
    x_offset: f64,
    width: f64,
    align: Alignment,
    field: ColumnField,
    max_chars: Option<usize>,
) -> ColumnSpec {
    ColumnSpec {
        title: title.to_string(),
        x_offset,
        width,
        align,
        field,
        max_chars,
    }
}

impl fmt::Display for ReportVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportVariant::Nfe => write!(f, "nfe"),
            ReportVariant::Nfse => write!(f, "nfse"),
        }
    }
}

impl FromStr for ReportVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "nfe" => Ok(ReportVariant::Nfe),
            "nfse" => Ok(ReportVariant::Nfse),
            other => Err(format!("unknown report variant '{other}' (expected nfe or nfse)")),
        }
    }
}

pub const DEFAULT_PRODUCT_NAME: &str = "SimpleDFe";

/// User-visible captions. `{name}` placeholders are filled in at layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    /// Placeholders: `{start}`, `{end}`.
    pub period: String,
    /// Placeholder: `{at}`.
    pub generated_at: String,
    /// Placeholder: `{tax_id}`.
    pub tax_id: String,
    /// Placeholder: `{amount}`.
    pub company_total: String,
    /// Placeholder: `{amount}`.
    pub grand_total: String,
    /// Placeholders: `{page}`, `{total}`.
    pub page_footer: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            period: "Período: {start} a {end}".to_string(),
            generated_at: "Gerado em: {at}".to_string(),
            tax_id: "CNPJ: {tax_id}".to_string(),
            company_total: "Total: {amount}".to_string(),
            grand_total: "TOTAL GERAL: {amount}".to_string(),
            page_footer: "Page {page} of {total}".to_string(),
        }
    }
}

/// Substitute `{key}` placeholders in a caption template.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

/// Everything the layout engine needs besides the data itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLayout {
    pub title: String,
    /// Caption printed under the page number in every footer.
    pub product_name: String,
    pub geometry: PageGeometry,
    pub typography: Typography,
    pub palette: Palette,
    pub labels: Labels,
    pub currency: CurrencyFormat,
    /// Re-emit the table header when a company's rows continue on a new
    /// page. Off by default: continued tables resume with bare rows.
    pub repeat_header_on_break: bool,
}

impl Default for ReportLayout {
    fn default() -> Self {
        ReportVariant::default().layout()
    }
}

impl ReportLayout {
    /// PDF document info for this layout.
    pub fn metadata(&self) -> Metadata {
        Metadata {
            title: Some(self.title.clone()),
            author: Some(self.product_name.clone()),
            subject: None,
            creator: Some(self.product_name.clone()),
        }
    }

    /// Reject geometries the engine cannot place anything on.
    pub fn validate(&self) -> Result<()> {
        let g = &self.geometry;
        let (w, h) = g.dimensions();
        if !(w > 0.0 && h > 0.0) {
            return Err(ReportError::Config(format!(
                "page size {w}x{h} must be positive"
            )));
        }
        if !(g.row_height > 0.0) {
            return Err(ReportError::Config("row height must be positive".to_string()));
        }
        if g.margin < 0.0 || g.margin * 2.0 >= w.min(h) {
            return Err(ReportError::Config(format!(
                "margin {} leaves no room on a {w}x{h} page",
                g.margin
            )));
        }
        // The body between the report header and the footer slot must hold
        // a table header and at least one row.
        let t = &self.typography;
        let body = h - g.margin * 2.0 - t.header_height() - t.footer_height();
        if body < g.row_height * 2.0 {
            return Err(ReportError::Config(format!(
                "page body of {body:.1}pt cannot hold a table header and one {}pt row",
                g.row_height
            )));
        }
        if g.columns.is_empty() {
            return Err(ReportError::Config("at least one column is required".to_string()));
        }
        for col in &g.columns {
            if col.width <= 0.0 || col.x_offset < 0.0 || col.x_offset + col.width > w + 0.01 {
                return Err(ReportError::Config(format!(
                    "column '{}' lies outside the page",
                    col.title
                )));
            }
        }
        Ok(())
    }
}

/// On-disk configuration: a variant plus optional overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub variant: ReportVariant,
    pub title: Option<String>,
    pub product_name: Option<String>,
    pub repeat_header_on_break: Option<bool>,
    pub geometry: Option<PageGeometry>,
    pub typography: Option<Typography>,
    pub palette: Option<Palette>,
    pub labels: Option<Labels>,
    pub currency: Option<CurrencyFormat>,
}

impl ReportConfig {
    /// Load a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        Self::from_toml(&content, path)
    }

    /// Parse TOML text; `origin` is only used in error messages.
    pub fn from_toml(content: &str, origin: impl Into<PathBuf>) -> Result<Self> {
        toml::from_str(content).map_err(|source| ReportError::ConfigParse {
            path: origin.into(),
            source,
        })
    }

    /// Apply the overrides to the variant's defaults and validate.
    pub fn into_layout(self) -> Result<ReportLayout> {
        let mut layout = self.variant.layout();
        if let Some(title) = self.title {
            layout.title = title;
        }
        if let Some(product_name) = self.product_name {
            layout.product_name = product_name;
        }
        if let Some(repeat) = self.repeat_header_on_break {
            layout.repeat_header_on_break = repeat;
        }
        if let Some(geometry) = self.geometry {
            layout.geometry = geometry;
        }
        if let Some(typography) = self.typography {
            layout.typography = typography;
        }
        if let Some(palette) = self.palette {
            layout.palette = palette;
        }
        if let Some(labels) = self.labels {
            layout.labels = labels;
        }
        if let Some(currency) = self.currency {
            layout.currency = currency;
        }
        layout.validate()?;
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_variants_validate() {
        for variant in ReportVariant::ALL {
            variant.layout().validate().unwrap();
        }
    }

    #[test]
    fn variants_differ_in_orientation_and_truncation() {
        let nfe = ReportVariant::Nfe.geometry();
        let nfse = ReportVariant::Nfse.geometry();
        assert_eq!(nfe.orientation, Orientation::Portrait);
        assert_eq!(nfse.orientation, Orientation::Landscape);
        assert_eq!(nfe.columns.len(), 5);
        assert_eq!(nfse.columns.len(), 5);

        let supplier = |g: &PageGeometry| {
            g.columns
                .iter()
                .find(|c| c.field == ColumnField::SupplierName)
                .and_then(|c| c.max_chars)
        };
        assert_eq!(supplier(&nfe), Some(35));
        assert_eq!(supplier(&nfse), Some(45));
    }

    #[test]
    fn columns_end_at_right_margin() {
        for variant in ReportVariant::ALL {
            let g = variant.geometry();
            let (w, _) = g.dimensions();
            assert!((g.table_right() - (w - g.margin)).abs() < 0.01, "{variant}");
            assert!((g.table_left() - g.margin).abs() < 0.01, "{variant}");
        }
    }

    #[test]
    fn variant_from_str() {
        assert_eq!("NFS-e".parse::<ReportVariant>(), Ok(ReportVariant::Nfse));
        assert_eq!("nfe".parse::<ReportVariant>(), Ok(ReportVariant::Nfe));
        assert!("cte".parse::<ReportVariant>().is_err());
    }

    #[test]
    fn fill_replaces_placeholders() {
        let out = fill("Page {page} of {total}", &[("page", "2"), ("total", "7")]);
        assert_eq!(out, "Page 2 of 7");
    }

    #[test]
    fn toml_overrides() {
        let config = ReportConfig::from_toml(
            r#"
            variant = "nfse"
            product_name = "SimpleFlow"
            repeat_header_on_break = true

            [labels]
            page_footer = "Página {page} de {total}"
            "#,
            "report.toml",
        )
        .unwrap();
        let layout = config.into_layout().unwrap();
        assert_eq!(layout.geometry.orientation, Orientation::Landscape);
        assert_eq!(layout.product_name, "SimpleFlow");
        assert!(layout.repeat_header_on_break);
        assert_eq!(layout.labels.page_footer, "Página {page} de {total}");
        // Unlisted labels keep their defaults.
        assert_eq!(layout.labels.grand_total, "TOTAL GERAL: {amount}");
    }

    #[test]
    fn toml_geometry_override() {
        let config = ReportConfig::from_toml(
            r#"
            [geometry]
            size = "Letter"
            margin = 36.0
            row_height = 14.0

            [[geometry.columns]]
            title = "Doc"
            x_offset = 36.0
            width = 200.0
            field = "Number"

            [[geometry.columns]]
            title = "Amount"
            x_offset = 236.0
            width = 100.0
            align = "Right"
            field = "Amount"
            "#,
            "report.toml",
        )
        .unwrap();
        let layout = config.into_layout().unwrap();
        assert_eq!(layout.geometry.size, PageSize::Letter);
        assert_eq!(layout.geometry.columns.len(), 2);
        assert_eq!(layout.geometry.columns[1].align, Alignment::Right);
    }

    #[test]
    fn bad_toml_reports_path() {
        let err = ReportConfig::from_toml("variant = ", "bad.toml").unwrap_err();
        assert!(matches!(err, ReportError::ConfigParse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn invalid_geometry_rejected() {
        let mut layout = ReportVariant::Nfe.layout();
        layout.geometry.row_height = 0.0;
        assert!(matches!(layout.validate(), Err(ReportError::Config(_))));

        let mut layout = ReportVariant::Nfe.layout();
        layout.geometry.columns[4].width = 400.0;
        assert!(layout.validate().is_err());

        let mut layout = ReportVariant::Nfe.layout();
        layout.geometry.columns.clear();
        assert!(layout.validate().is_err());

        let mut layout = ReportVariant::Nfe.layout();
        layout.geometry.margin = 400.0;
        assert!(layout.validate().is_err());
    }

    #[test]
    fn header_and_footer_count_against_the_body() {
        // Fits with the default typography.
        let mut layout = ReportVariant::Nfse.layout();
        layout.geometry.row_height = 150.0;
        assert!(layout.validate().is_ok());

        // Oversized header lines leave no room for two rows.
        layout.typography.title_size = 200.0;
        let err = layout.validate().unwrap_err();
        assert!(err.to_string().contains("cannot hold a table header"));

        // Same for an oversized footer.
        let mut layout = ReportVariant::Nfse.layout();
        layout.geometry.row_height = 150.0;
        layout.typography.footer_size = 200.0;
        assert!(matches!(layout.validate(), Err(ReportError::Config(_))));
    }
}
