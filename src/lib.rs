//! # fiscal-report
//!
//! A paginated report engine for fiscal document listings. Takes a period,
//! a list of companies and their documents, and produces a multi-page PDF
//! with repeated page headers, striped tables, per-company totals, a grand
//! total and "Page i of N" footers.
//!
//! ## Architecture
//!
//! ```text
//! JSON / ReportRequest
//!       |
//!   [model]   - ReportRequest, CompanyGroup, DocumentLine, PageGeometry
//!       |
//!   [config]  - ReportVariant presets, TOML overrides -> ReportLayout
//!       |
//!   [layout]  - cursor-driven page layout -> Vec<LayoutPage>
//!       |        (uses [format] for values, [font] for text widths)
//!       |
//!   [pdf]     - Renderer trait, PdfWriter -> Vec<u8>
//! ```
//!
//! Layout decides every position; the renderer only draws. Each call owns
//! its own cursor and page buffer, so reports can be rendered from many
//! threads at once.

pub mod config;
pub mod error;
pub mod font;
pub mod format;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod style;

use std::path::{Path, PathBuf};

pub use config::{ReportConfig, ReportLayout, ReportVariant};
pub use error::{ReportError, Result};
pub use layout::{LayoutEngine, LayoutInfo, LayoutPage};
pub use model::{CompanyGroup, DocumentLine, ReportRequest, ReportStamp};
pub use pdf::{PdfWriter, Renderer};

/// Lay out a report and render it to PDF bytes.
pub fn render(
    request: &ReportRequest,
    layout: &ReportLayout,
    stamp: &ReportStamp,
) -> Result<Vec<u8>> {
    render_with(&PdfWriter::new(), request, layout, stamp)
}

/// Lay out a report and draw it with the given backend.
pub fn render_with(
    renderer: &impl Renderer,
    request: &ReportRequest,
    layout: &ReportLayout,
    stamp: &ReportStamp,
) -> Result<Vec<u8>> {
    let pages = layout_pages(request, layout, stamp);
    renderer.render(&pages, &layout.metadata())
}

/// Parse a JSON report request and render it to PDF bytes.
pub fn render_json(json: &str, layout: &ReportLayout, stamp: &ReportStamp) -> Result<Vec<u8>> {
    let request = parse_request(json)?;
    render(&request, layout, stamp)
}

/// Parse a JSON report request.
pub fn parse_request(json: &str) -> Result<ReportRequest> {
    Ok(serde_json::from_str(json)?)
}

/// Lay out a report without rendering it.
pub fn layout_pages(
    request: &ReportRequest,
    layout: &ReportLayout,
    stamp: &ReportStamp,
) -> Vec<LayoutPage> {
    LayoutEngine::new(layout).layout(request, stamp)
}

/// Lay out a report and return serializable layout metadata.
pub fn layout_info(
    request: &ReportRequest,
    layout: &ReportLayout,
    stamp: &ReportStamp,
) -> LayoutInfo {
    LayoutInfo::from_pages(&layout_pages(request, layout, stamp))
}

/// Render a report and write it to `path`.
///
/// An I/O failure aborts the run; whatever the filesystem left behind is
/// not cleaned up.
pub fn render_to_file(
    request: &ReportRequest,
    layout: &ReportLayout,
    stamp: &ReportStamp,
    path: impl AsRef<Path>,
) -> Result<PathBuf> {
    let bytes = render(request, layout, stamp)?;
    write_report(path.as_ref(), &bytes)
}

/// Write finished document bytes to `path`.
pub fn write_report(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::write(path, bytes).map_err(|e| ReportError::io(path, e))?;
    log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path.to_path_buf())
}
