//! Table header and body rows for one company's document listing.

use super::{Anchor, DrawCommand, ElementRole, LayoutCursor, LayoutElement, LayoutEngine};
use crate::font::StandardFont;
use crate::format::{format_date, format_tax_id, truncate};
use crate::model::{ColumnField, ColumnSpec, DocumentLine};
use crate::style::{Alignment, Color};

impl LayoutEngine<'_> {
    /// Place the shaded column-title row at the cursor.
    pub(super) fn layout_table_header(&self, company: usize, cursor: &mut LayoutCursor) {
        let t = &self.layout.typography;
        let g = &self.layout.geometry;

        let children = g
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.cell(
                    col.title.clone(),
                    col,
                    i,
                    cursor.y,
                    StandardFont::HelveticaBold,
                    t.table_header_size,
                    self.layout.palette.text,
                )
            })
            .collect();

        cursor.elements.push(self.band(
            cursor.y,
            Some(self.layout.palette.table_header_fill),
            ElementRole::TableHeader { company },
            children,
        ));
        cursor.y += g.row_height;
    }

    /// Place one document row at the cursor. Even rows are striped.
    pub(super) fn layout_table_row(
        &self,
        company: usize,
        index: usize,
        document: &DocumentLine,
        cursor: &mut LayoutCursor,
    ) {
        let t = &self.layout.typography;
        let g = &self.layout.geometry;

        let children = g
            .columns
            .iter()
            .enumerate()
            .filter_map(|(i, col)| {
                let value = self.cell_value(col, document);
                if value.is_empty() {
                    return None;
                }
                Some(self.cell(
                    value,
                    col,
                    i,
                    cursor.y,
                    StandardFont::Helvetica,
                    t.row_size,
                    self.layout.palette.text,
                ))
            })
            .collect();

        let fill = (index % 2 == 0).then_some(self.layout.palette.stripe_fill);
        cursor.elements.push(self.band(
            cursor.y,
            fill,
            ElementRole::Row { company, index },
            children,
        ));
        cursor.y += g.row_height;
    }

    /// The display string for one column of a document.
    fn cell_value(&self, column: &ColumnSpec, document: &DocumentLine) -> String {
        let value = match column.field {
            ColumnField::Number => document.number.clone(),
            ColumnField::IssueDate => format_date(&document.issue_date),
            ColumnField::SupplierName => document.supplier_name.clone(),
            ColumnField::SupplierTaxId => format_tax_id(&document.supplier_tax_id),
            ColumnField::Amount => self.layout.currency.format(document.amount),
        };
        match column.max_chars {
            Some(max) => truncate(&value, max).into_owned(),
            None => value,
        }
    }

    /// A full-table-width row box, optionally filled.
    fn band(
        &self,
        y: f64,
        fill: Option<Color>,
        role: ElementRole,
        children: Vec<LayoutElement>,
    ) -> LayoutElement {
        let g = &self.layout.geometry;
        LayoutElement {
            x: g.table_left(),
            y,
            width: g.table_width(),
            height: g.row_height,
            draw: fill.map_or(DrawCommand::None, |fill| DrawCommand::Rect { fill }),
            role,
            children,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn cell(
        &self,
        content: String,
        column: &ColumnSpec,
        index: usize,
        y: f64,
        font: StandardFont,
        font_size: f64,
        color: Color,
    ) -> LayoutElement {
        let pad = self.layout.geometry.cell_padding;
        let anchor = match column.align {
            Alignment::Left => Anchor::Start(column.x_offset + pad),
            Alignment::Right => Anchor::End(column.x_offset + column.width - pad),
        };
        self.text(
            content,
            anchor,
            y,
            self.layout.geometry.row_height,
            font,
            font_size,
            color,
            ElementRole::Cell { column: index },
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ReportVariant;
    use crate::layout::{DrawCommand, ElementRole, LayoutEngine};
    use crate::model::{CompanyGroup, DocumentLine, ReportRequest, ReportStamp};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn single_row(variant: ReportVariant, document: DocumentLine) -> Vec<String> {
        let layout = variant.layout();
        let request = ReportRequest {
            companies: vec![CompanyGroup {
                name: "ACME".to_string(),
                documents: vec![document],
                ..Default::default()
            }],
            ..Default::default()
        };
        let stamp = ReportStamp::new(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        let pages = LayoutEngine::new(&layout).layout(&request, &stamp);
        let row = pages[0].rows().next().unwrap();
        row.texts().into_iter().map(str::to_string).collect()
    }

    #[test]
    fn row_cells_are_formatted() {
        let cells = single_row(
            ReportVariant::Nfe,
            DocumentLine {
                number: "000123".to_string(),
                issue_date: "2024-01-15".to_string(),
                supplier_name: "Distribuidora Sul".to_string(),
                supplier_tax_id: "11222333000144".to_string(),
                amount: Decimal::new(123456, 2),
            },
        );
        assert_eq!(
            cells,
            vec![
                "000123",
                "15/01/2024",
                "Distribuidora Sul",
                "11.222.333/0001-44",
                "R$ 1.234,56"
            ]
        );
    }

    #[test]
    fn supplier_truncated_per_variant() {
        let long = "Comercial Importadora e Exportadora de Alimentos Finos do Brasil".to_string();
        for variant in ReportVariant::ALL {
            let cells = single_row(
                variant,
                DocumentLine {
                    number: "1".to_string(),
                    supplier_name: long.clone(),
                    ..Default::default()
                },
            );
            let supplier = cells.iter().find(|c| c.starts_with("Comercial")).unwrap();
            assert_eq!(supplier.chars().count(), variant.supplier_max_chars());
            assert!(supplier.ends_with("..."));
        }
    }

    #[test]
    fn amount_is_right_aligned_in_its_column() {
        let layout = ReportVariant::Nfe.layout();
        let request = ReportRequest {
            companies: vec![CompanyGroup {
                name: "ACME".to_string(),
                documents: vec![DocumentLine {
                    amount: Decimal::new(5, 0),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        let pages = LayoutEngine::new(&layout).layout(&request, &ReportStamp::now());
        let row = pages[0].rows().next().unwrap();
        let amount = row
            .children
            .iter()
            .find(|c| c.role == ElementRole::Cell { column: 4 })
            .unwrap();
        let col = &layout.geometry.columns[4];
        let right_edge = col.x_offset + col.width - layout.geometry.cell_padding;
        assert!((amount.x + amount.width - right_edge).abs() < 1e-9);
    }

    #[test]
    fn header_row_is_filled() {
        let layout = ReportVariant::Nfse.layout();
        let request = ReportRequest {
            companies: vec![CompanyGroup {
                name: "ACME".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let pages = LayoutEngine::new(&layout).layout(&request, &ReportStamp::now());
        let header = pages[0]
            .by_role(|r| matches!(r, ElementRole::TableHeader { .. }))
            .next()
            .unwrap();
        assert_eq!(
            header.draw,
            DrawCommand::Rect {
                fill: layout.palette.table_header_fill
            }
        );
        assert_eq!(
            header.texts(),
            vec!["Número", "Emissão", "Prestador", "CNPJ Prestador", "Valor"]
        );
    }
}
