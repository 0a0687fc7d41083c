//! # Page-Aware Report Layout
//!
//! Turns a [`ReportRequest`] into a sequence of fixed-size pages of
//! positioned drawing instructions. Nothing here knows about PDF; the
//! backend in [`crate::pdf`] only has to draw what this module decided.
//!
//! ## How layout works
//!
//! There is no infinite canvas that gets sliced afterwards. A cursor walks
//! down the current page and every block asks "does this fit?" first:
//!
//! 1. Open a page: place the report header (title, period, stamp). The same
//!    header opens every page, in the same place.
//! 2. For each company: make sure its header block fits, then place the
//!    name, the tax id and the table header row.
//! 3. For each document: make sure one row fits, otherwise open a new page.
//!    The table header is *not* repeated on continuation pages unless
//!    [`ReportLayout::repeat_header_on_break`] is set.
//! 4. Company total, then a separator before the next company.
//! 5. Separator and grand total.
//! 6. Footer pass. Only now is the page count known, so every page gets its
//!    "Page i of N" footer in a second sweep over the collected pages.
//!
//! Layout is deterministic: the same request, layout and stamp produce the
//! same pages, element for element.

pub mod page_break;
mod table;

use serde::Serialize;

use crate::config::{fill, ReportLayout};
use crate::font::StandardFont;
use crate::format::{format_date, format_tax_id, format_timestamp};
use crate::model::{CompanyGroup, ReportRequest, ReportStamp};
use crate::style::Color;
use page_break::{decide_break, BreakDecision};

/// Stroke width of separator lines.
const RULE_WIDTH: f64 = 0.5;

/// A fully laid-out page ready for a drawing backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPage {
    pub width: f64,
    pub height: f64,
    /// Content placed by the forward pass, in drawing order.
    pub elements: Vec<LayoutElement>,
    /// Footer slot. Empty until the footer pass has run, because page
    /// numbers depend on the final page count.
    pub footer: Vec<LayoutElement>,
}

impl LayoutPage {
    /// Top-level elements in drawing order, footer last.
    pub fn iter_elements(&self) -> impl Iterator<Item = &LayoutElement> {
        self.elements.iter().chain(self.footer.iter())
    }

    /// Top-level elements whose role satisfies `matches`.
    pub fn by_role<'a>(
        &'a self,
        matches: impl Fn(&ElementRole) -> bool + 'a,
    ) -> impl Iterator<Item = &'a LayoutElement> + 'a {
        self.iter_elements().filter(move |el| matches(&el.role))
    }

    /// Table body rows on this page.
    pub fn rows(&self) -> impl Iterator<Item = &LayoutElement> {
        self.by_role(|role| matches!(role, ElementRole::Row { .. }))
    }
}

/// A positioned element on a page.
///
/// Coordinates are in points with the origin at the top-left corner of the
/// page. Children are positioned relative to the page, not the parent.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutElement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// The visual to draw for this element itself.
    pub draw: DrawCommand,
    /// What part of the report this element is.
    pub role: ElementRole,
    pub children: Vec<LayoutElement>,
}

impl LayoutElement {
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// This element's own text, if it draws text.
    pub fn text(&self) -> Option<&str> {
        match &self.draw {
            DrawCommand::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    /// All text drawn by this element and its descendants, in order.
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_texts(&mut out);
        out
    }

    fn collect_texts<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(t) = self.text() {
            out.push(t);
        }
        for child in &self.children {
            child.collect_texts(out);
        }
    }
}

/// What to actually draw for an element.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Nothing to draw (a grouping container).
    None,
    /// Fill the element's box.
    Rect { fill: Color },
    /// A single line of text in the element's box, vertically centred.
    Text {
        content: String,
        font: StandardFont,
        font_size: f64,
        color: Color,
    },
    /// A straight line from (x, y) to (x + width, y + height).
    Line { stroke_width: f64, color: Color },
}

/// The part of the report an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ElementRole {
    /// Title, period and generation stamp, repeated on every page.
    ReportHeader,
    CompanyHeader { company: usize },
    TableHeader { company: usize },
    /// One document row; `index` is zero-based within its company.
    Row { company: usize, index: usize },
    Cell { column: usize },
    CompanyTotal { company: usize },
    Separator,
    GrandTotal,
    Footer,
    /// A plain text line inside one of the blocks above.
    Text,
}

/// Where a line of text is anchored horizontally.
#[derive(Debug, Clone, Copy)]
enum Anchor {
    /// Text starts at x.
    Start(f64),
    /// Text ends at x.
    End(f64),
    /// Text is centred between two edges.
    Center { left: f64, right: f64 },
}

impl Anchor {
    fn x_for(self, text_width: f64) -> f64 {
        match self {
            Anchor::Start(x) => x,
            Anchor::End(x) => x - text_width,
            Anchor::Center { left, right } => left + (right - left - text_width) / 2.0,
        }
    }
}

/// The report header as laid out once per run and cloned onto every page.
struct HeaderBlock {
    elements: Vec<LayoutElement>,
    height: f64,
}

/// Tracks where we are on the current page during layout.
///
/// Owned by a single `layout` call and threaded through it by `&mut`.
#[derive(Debug, Clone)]
struct LayoutCursor {
    width: f64,
    height: f64,
    y: f64,
    page_index: usize,
    /// First y below the report header.
    body_top: f64,
    /// Last usable y above the footer slot.
    body_bottom: f64,
    elements: Vec<LayoutElement>,
}

impl LayoutCursor {
    fn open(
        layout: &ReportLayout,
        header: &HeaderBlock,
        footer_height: f64,
        page_index: usize,
    ) -> Self {
        let (width, height) = layout.geometry.dimensions();
        let margin = layout.geometry.margin;
        let body_top = margin + header.height;

        Self {
            width,
            height,
            y: body_top,
            page_index,
            body_top,
            body_bottom: height - margin - footer_height,
            elements: header.elements.clone(),
        }
    }

    fn remaining_height(&self) -> f64 {
        (self.body_bottom - self.y).max(0.0)
    }

    /// Nothing but the report header has been placed yet.
    fn is_empty(&self) -> bool {
        self.y <= self.body_top + 1e-9
    }

    fn finalize(&mut self) -> LayoutPage {
        LayoutPage {
            width: self.width,
            height: self.height,
            elements: std::mem::take(&mut self.elements),
            footer: Vec::new(),
        }
    }

    fn next_page(&self, header: &HeaderBlock) -> Self {
        Self {
            width: self.width,
            height: self.height,
            y: self.body_top,
            page_index: self.page_index + 1,
            body_top: self.body_top,
            body_bottom: self.body_bottom,
            elements: header.elements.clone(),
        }
    }
}

/// The report layout engine.
///
/// Holds only borrowed configuration; every call to [`LayoutEngine::layout`]
/// owns its own cursor and page list, so one engine can serve concurrent
/// callers.
pub struct LayoutEngine<'a> {
    layout: &'a ReportLayout,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(layout: &'a ReportLayout) -> Self {
        Self { layout }
    }

    /// Main entry point: lay out a report into pages.
    pub fn layout(&self, request: &ReportRequest, stamp: &ReportStamp) -> Vec<LayoutPage> {
        let header = self.build_report_header(request, stamp);
        let mut pages: Vec<LayoutPage> = Vec::new();
        let mut cursor = LayoutCursor::open(self.layout, &header, self.footer_height(), 0);

        let count = request.companies.len();
        for (index, company) in request.companies.iter().enumerate() {
            self.layout_company(index, company, &mut cursor, &mut pages, &header);
            if index + 1 < count {
                self.layout_separator(&mut cursor, &mut pages, &header);
            }
        }

        self.layout_grand_total(request, &mut cursor, &mut pages, &header);
        pages.push(cursor.finalize());

        self.stamp_footers(&mut pages);

        log::info!(
            "laid out {} companies, {} documents on {} page(s)",
            count,
            request.companies.iter().map(|c| c.documents.len()).sum::<usize>(),
            pages.len()
        );
        pages
    }

    /// Make sure `needed` points fit on the current page, opening a new page
    /// if not. Returns true when a page break happened.
    fn ensure_space(
        &self,
        needed: f64,
        cursor: &mut LayoutCursor,
        pages: &mut Vec<LayoutPage>,
        header: &HeaderBlock,
    ) -> bool {
        match decide_break(cursor.remaining_height(), needed, cursor.is_empty()) {
            BreakDecision::Place => {
                if needed > cursor.remaining_height() + 1e-6 {
                    log::warn!(
                        "block of {needed:.1}pt does not fit an empty page {}; placing it anyway",
                        cursor.page_index + 1
                    );
                }
                false
            }
            BreakDecision::MoveToNextPage => {
                log::debug!(
                    "page {} full at y={:.1}, breaking before a {needed:.1}pt block",
                    cursor.page_index + 1,
                    cursor.y
                );
                pages.push(cursor.finalize());
                *cursor = cursor.next_page(header);
                true
            }
        }
    }

    /// A single line of text with the given anchor and box height.
    #[allow(clippy::too_many_arguments)]
    fn text(
        &self,
        content: String,
        anchor: Anchor,
        y: f64,
        height: f64,
        font: StandardFont,
        font_size: f64,
        color: Color,
        role: ElementRole,
    ) -> LayoutElement {
        let width = font.measure(&content, font_size);
        LayoutElement {
            x: anchor.x_for(width),
            y,
            width,
            height,
            draw: DrawCommand::Text {
                content,
                font,
                font_size,
                color,
            },
            role,
            children: vec![],
        }
    }

    /// A full-width horizontal rule at `y`.
    fn rule(&self, y: f64) -> LayoutElement {
        let (left, right) = self.layout.geometry.content_span();
        LayoutElement {
            x: left,
            y,
            width: right - left,
            height: 0.0,
            draw: DrawCommand::Line {
                stroke_width: RULE_WIDTH,
                color: self.layout.palette.separator,
            },
            role: ElementRole::Separator,
            children: vec![],
        }
    }

    fn center_anchor(&self) -> Anchor {
        let (left, right) = self.layout.geometry.content_span();
        Anchor::Center { left, right }
    }

    fn build_report_header(&self, request: &ReportRequest, stamp: &ReportStamp) -> HeaderBlock {
        let t = &self.layout.typography;
        let p = &self.layout.palette;
        let labels = &self.layout.labels;
        let (left, right) = self.layout.geometry.content_span();
        let top = self.layout.geometry.margin;

        let period = fill(
            &labels.period,
            &[
                ("start", format_date(&request.period_start).as_str()),
                ("end", format_date(&request.period_end).as_str()),
            ],
        );
        let generated = fill(
            &labels.generated_at,
            &[("at", format_timestamp(&stamp.generated_at).as_str())],
        );
        let lines = [
            (self.layout.title.clone(), StandardFont::HelveticaBold, t.title_size, p.text),
            (period, StandardFont::Helvetica, t.subtitle_size, p.text),
            (generated, StandardFont::Helvetica, t.stamp_size, p.muted),
        ];

        let mut y = top;
        let mut children = Vec::with_capacity(lines.len());
        for (content, font, size, color) in lines {
            let h = t.line_height(size);
            children.push(self.text(
                content,
                self.center_anchor(),
                y,
                h,
                font,
                size,
                color,
                ElementRole::Text,
            ));
            y += h;
        }
        y += t.header_gap;

        let height = y - top;
        HeaderBlock {
            elements: vec![LayoutElement {
                x: left,
                y: top,
                width: right - left,
                height,
                draw: DrawCommand::None,
                role: ElementRole::ReportHeader,
                children,
            }],
            height,
        }
    }

    fn layout_company(
        &self,
        index: usize,
        company: &CompanyGroup,
        cursor: &mut LayoutCursor,
        pages: &mut Vec<LayoutPage>,
        header: &HeaderBlock,
    ) {
        let t = &self.layout.typography;
        let p = &self.layout.palette;
        let g = &self.layout.geometry;

        let tax_id = company.tax_id().map(format_tax_id);
        let name_h = t.line_height(t.company_size);
        let tax_h = if tax_id.is_some() {
            t.line_height(t.tax_id_size)
        } else {
            0.0
        };

        // The company header never ends a page on its own: it needs room
        // for its table header row and the first document row.
        let first_row = if company.documents.is_empty() {
            0.0
        } else {
            g.row_height
        };
        let needed = name_h + tax_h + t.company_gap + g.row_height + first_row;
        self.ensure_space(needed, cursor, pages, header);

        let left = g.table_left();
        let top = cursor.y;
        let mut children = vec![self.text(
            company.name.clone(),
            Anchor::Start(left),
            top,
            name_h,
            StandardFont::HelveticaBold,
            t.company_size,
            p.text,
            ElementRole::Text,
        )];
        if let Some(id) = tax_id {
            children.push(self.text(
                fill(&self.layout.labels.tax_id, &[("tax_id", id.as_str())]),
                Anchor::Start(left),
                top + name_h,
                tax_h,
                StandardFont::Helvetica,
                t.tax_id_size,
                p.muted,
                ElementRole::Text,
            ));
        }
        cursor.elements.push(LayoutElement {
            x: left,
            y: top,
            width: g.table_width(),
            height: name_h + tax_h,
            draw: DrawCommand::None,
            role: ElementRole::CompanyHeader { company: index },
            children,
        });
        cursor.y += name_h + tax_h + t.company_gap;

        self.layout_table_header(index, cursor);

        for (row_index, document) in company.documents.iter().enumerate() {
            let broke = self.ensure_space(g.row_height, cursor, pages, header);
            if broke && self.layout.repeat_header_on_break {
                log::debug!(
                    "repeating table header for company {index} on page {}",
                    cursor.page_index + 1
                );
                self.layout_table_header(index, cursor);
            }
            self.layout_table_row(index, row_index, document, cursor);
        }

        let total_h = t.line_height(t.company_total_size);
        self.ensure_space(t.company_gap + total_h, cursor, pages, header);
        let amount = self.layout.currency.format(company.total);
        let total = self.text(
            fill(&self.layout.labels.company_total, &[("amount", amount.as_str())]),
            Anchor::End(g.table_right() - g.cell_padding),
            cursor.y + t.company_gap,
            total_h,
            StandardFont::HelveticaBold,
            t.company_total_size,
            p.text,
            ElementRole::CompanyTotal { company: index },
        );
        cursor.elements.push(total);
        cursor.y += t.company_gap + total_h;
    }

    fn layout_separator(
        &self,
        cursor: &mut LayoutCursor,
        pages: &mut Vec<LayoutPage>,
        header: &HeaderBlock,
    ) {
        let gap = self.layout.typography.separator_gap;
        self.ensure_space(gap, cursor, pages, header);
        let rule = self.rule(cursor.y + gap / 2.0);
        cursor.elements.push(rule);
        cursor.y += gap;
    }

    fn layout_grand_total(
        &self,
        request: &ReportRequest,
        cursor: &mut LayoutCursor,
        pages: &mut Vec<LayoutPage>,
        header: &HeaderBlock,
    ) {
        let t = &self.layout.typography;
        let gap = t.separator_gap;
        let h = t.line_height(t.grand_total_size);
        self.ensure_space(gap + h, cursor, pages, header);

        let rule = self.rule(cursor.y + gap / 2.0);
        cursor.elements.push(rule);
        cursor.y += gap;

        let amount = self.layout.currency.format(request.grand_total());
        let total = self.text(
            fill(&self.layout.labels.grand_total, &[("amount", amount.as_str())]),
            self.center_anchor(),
            cursor.y,
            h,
            StandardFont::HelveticaBold,
            t.grand_total_size,
            self.layout.palette.text,
            ElementRole::GrandTotal,
        );
        cursor.elements.push(total);
        cursor.y += h;
    }

    /// Height reserved at the bottom of every page for the footer.
    fn footer_height(&self) -> f64 {
        self.layout.typography.footer_height()
    }

    /// Second pass: stamp "Page i of N" now that N is known.
    fn stamp_footers(&self, pages: &mut [LayoutPage]) {
        let total = pages.len().to_string();
        for (i, page) in pages.iter_mut().enumerate() {
            page.footer = vec![self.footer_block(page.height, i + 1, &total)];
        }
    }

    fn footer_block(&self, page_height: f64, page_number: usize, total: &str) -> LayoutElement {
        let t = &self.layout.typography;
        let p = &self.layout.palette;
        let (left, right) = self.layout.geometry.content_span();
        let height = self.footer_height();
        let top = page_height - self.layout.geometry.margin - height;

        let label_h = t.line_height(t.footer_size);
        let mut children = vec![self.text(
            fill(
                &self.layout.labels.page_footer,
                &[("page", page_number.to_string().as_str()), ("total", total)],
            ),
            self.center_anchor(),
            top + t.company_gap,
            label_h,
            StandardFont::Helvetica,
            t.footer_size,
            p.muted,
            ElementRole::Text,
        )];
        if !self.layout.product_name.is_empty() {
            children.push(self.text(
                self.layout.product_name.clone(),
                self.center_anchor(),
                top + t.company_gap + label_h,
                t.line_height(t.caption_size),
                StandardFont::Helvetica,
                t.caption_size,
                p.muted,
                ElementRole::Text,
            ));
        }

        LayoutElement {
            x: left,
            y: top,
            width: right - left,
            height,
            draw: DrawCommand::None,
            role: ElementRole::Footer,
            children,
        }
    }
}

// ── Serializable layout metadata (for debugging and tooling) ───

/// Complete layout metadata for all pages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInfo {
    pub pages: Vec<PageInfo>,
}

/// Layout metadata for a single page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<ElementInfo>,
}

/// Serializable snapshot of one positioned element.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementInfo {
    pub role: ElementRole,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementInfo>,
}

impl LayoutInfo {
    /// Build serializable layout metadata from laid-out pages.
    pub fn from_pages(pages: &[LayoutPage]) -> Self {
        LayoutInfo {
            pages: pages
                .iter()
                .map(|page| PageInfo {
                    width: page.width,
                    height: page.height,
                    elements: Self::build_element_tree(page.iter_elements()),
                })
                .collect(),
        }
    }

    fn build_element_tree<'a>(elems: impl Iterator<Item = &'a LayoutElement>) -> Vec<ElementInfo> {
        elems
            .map(|el| ElementInfo {
                role: el.role,
                x: el.x,
                y: el.y,
                width: el.width,
                height: el.height,
                text: el.text().map(str::to_string),
                children: Self::build_element_tree(el.children.iter()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportVariant;
    use crate::model::DocumentLine;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn stamp() -> ReportStamp {
        ReportStamp::new(
            NaiveDate::from_ymd_opt(2024, 2, 1)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap(),
        )
    }

    fn document(n: usize) -> DocumentLine {
        DocumentLine {
            number: format!("{n}"),
            issue_date: "2024-01-10".to_string(),
            supplier_name: format!("Fornecedor {n}"),
            supplier_tax_id: "11222333000144".to_string(),
            amount: Decimal::new(1000, 2),
        }
    }

    fn company(name: &str, docs: usize) -> CompanyGroup {
        CompanyGroup {
            name: name.to_string(),
            tax_id: Some("12345678000190".to_string()),
            documents: (0..docs).map(document).collect(),
            total: Decimal::new(1000 * docs as i64, 2),
        }
    }

    fn request(companies: Vec<CompanyGroup>) -> ReportRequest {
        ReportRequest {
            period_start: "2024-01-01".to_string(),
            period_end: "2024-01-31".to_string(),
            companies,
            total_general: None,
        }
    }

    #[test]
    fn cursor_break_opens_page_below_header() {
        let layout = ReportVariant::Nfe.layout();
        let engine = LayoutEngine::new(&layout);
        let header = engine.build_report_header(&request(vec![]), &stamp());
        let mut cursor = LayoutCursor::open(&layout, &header, engine.footer_height(), 0);
        let mut pages = Vec::new();

        assert!(cursor.is_empty());
        cursor.y = cursor.body_bottom - 1.0;
        assert!(engine.ensure_space(16.0, &mut cursor, &mut pages, &header));
        assert_eq!(pages.len(), 1);
        assert_eq!(cursor.page_index, 1);
        assert_eq!(cursor.y, cursor.body_top);
        assert_eq!(cursor.elements.len(), 1);
        assert_eq!(cursor.elements[0].role, ElementRole::ReportHeader);
    }

    #[test]
    fn no_break_when_block_fits() {
        let layout = ReportVariant::Nfe.layout();
        let engine = LayoutEngine::new(&layout);
        let header = engine.build_report_header(&request(vec![]), &stamp());
        let mut cursor = LayoutCursor::open(&layout, &header, engine.footer_height(), 0);
        let mut pages = Vec::new();

        assert!(!engine.ensure_space(16.0, &mut cursor, &mut pages, &header));
        assert!(pages.is_empty());
    }

    #[test]
    fn anchors_position_text() {
        assert_eq!(Anchor::Start(10.0).x_for(30.0), 10.0);
        assert_eq!(Anchor::End(100.0).x_for(30.0), 70.0);
        assert_eq!(
            Anchor::Center {
                left: 0.0,
                right: 100.0
            }
            .x_for(30.0),
            35.0
        );
    }

    #[test]
    fn empty_request_still_has_grand_total() {
        let layout = ReportVariant::Nfe.layout();
        let pages = LayoutEngine::new(&layout).layout(&request(vec![]), &stamp());
        assert_eq!(pages.len(), 1);
        let grand: Vec<_> = pages[0]
            .by_role(|r| *r == ElementRole::GrandTotal)
            .collect();
        assert_eq!(grand.len(), 1);
        assert_eq!(grand[0].text(), Some("TOTAL GERAL: R$ 0,00"));
    }

    #[test]
    fn company_without_documents_gets_header_and_total() {
        let layout = ReportVariant::Nfe.layout();
        let request = request(vec![company("Vazia", 0)]);
        let pages = LayoutEngine::new(&layout).layout(&request, &stamp());
        let page = &pages[0];
        assert_eq!(page.rows().count(), 0);
        assert_eq!(
            page.by_role(|r| matches!(r, ElementRole::TableHeader { .. }))
                .count(),
            1
        );
        let total = page
            .by_role(|r| matches!(r, ElementRole::CompanyTotal { .. }))
            .next()
            .unwrap();
        assert_eq!(total.text(), Some("Total: R$ 0,00"));
    }

    #[test]
    fn missing_tax_id_drops_the_line() {
        let layout = ReportVariant::Nfe.layout();
        let mut c = company("Sem CNPJ", 1);
        c.tax_id = None;
        let pages = LayoutEngine::new(&layout).layout(&request(vec![c]), &stamp());
        let header = pages[0]
            .by_role(|r| matches!(r, ElementRole::CompanyHeader { .. }))
            .next()
            .unwrap();
        assert_eq!(header.texts(), vec!["Sem CNPJ"]);
    }

    #[test]
    fn company_header_shows_formatted_tax_id() {
        let layout = ReportVariant::Nfe.layout();
        let pages = LayoutEngine::new(&layout).layout(&request(vec![company("ACME", 1)]), &stamp());
        let header = pages[0]
            .by_role(|r| matches!(r, ElementRole::CompanyHeader { .. }))
            .next()
            .unwrap();
        assert_eq!(header.texts(), vec!["ACME", "CNPJ: 12.345.678/0001-90"]);
    }

    #[test]
    fn separators_only_between_companies() {
        let layout = ReportVariant::Nfe.layout();
        let pages = LayoutEngine::new(&layout).layout(
            &request(vec![company("A", 1), company("B", 1), company("C", 1)]),
            &stamp(),
        );
        // Two between companies, one before the grand total.
        let rules = pages
            .iter()
            .flat_map(|p| p.by_role(|r| *r == ElementRole::Separator))
            .count();
        assert_eq!(rules, 3);
    }

    #[test]
    fn footer_slot_filled_by_second_pass() {
        let layout = ReportVariant::Nfe.layout();
        let pages = LayoutEngine::new(&layout).layout(&request(vec![company("A", 100)]), &stamp());
        assert!(pages.len() > 1);
        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.footer.len(), 1);
            let texts = page.footer[0].texts();
            assert_eq!(texts[0], format!("Page {} of {}", i + 1, pages.len()));
            assert_eq!(texts[1], "SimpleDFe");
        }
    }

    #[test]
    fn layout_info_serializes_roles() {
        let layout = ReportVariant::Nfe.layout();
        let pages = LayoutEngine::new(&layout).layout(&request(vec![company("A", 2)]), &stamp());
        let info = LayoutInfo::from_pages(&pages);
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains(r#""kind":"reportHeader""#));
        assert!(json.contains(r#""kind":"row","company":0,"index":1"#));
        assert!(json.contains("TOTAL GERAL: R$ 20,00"));
    }
}
