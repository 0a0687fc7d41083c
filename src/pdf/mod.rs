//! # PDF Serializer
//!
//! Takes the laid-out pages from the layout engine and writes a valid PDF file.
//!
//! This is a from-scratch PDF 1.7 writer. A tabular report needs very little
//! of PDF: filled rectangles, straight lines and single-line text in the two
//! standard Helvetica faces. Writing the bytes ourselves keeps the output
//! byte-for-byte deterministic.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (fonts, pages, content streams, etc.)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::{ReportError, Result};
use crate::font::StandardFont;
use crate::layout::{DrawCommand, LayoutElement, LayoutPage};
use crate::model::Metadata;

/// Cap height of Helvetica as a fraction of the font size. Used to centre a
/// line of text vertically in its box.
const CAP_HEIGHT: f64 = 0.718;

/// A drawing backend: turns laid-out pages into document bytes.
///
/// Layout never depends on a backend, so another output format only needs
/// another implementation of this trait.
pub trait Renderer {
    fn render(&self, pages: &[LayoutPage], metadata: &Metadata) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfWriter;

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    /// Fonts in resource order: `/F0`, `/F1`, ...
    font_objects: Vec<(StandardFont, usize)>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl Renderer for PdfWriter {
    fn render(&self, pages: &[LayoutPage], metadata: &Metadata) -> Result<Vec<u8>> {
        self.write(pages, metadata)
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write laid-out pages to a PDF byte vector.
    pub fn write(&self, pages: &[LayoutPage], metadata: &Metadata) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(ReportError::Render("no pages to write".to_string()));
        }

        let mut builder = PdfBuilder {
            objects: Vec::new(),
            font_objects: Vec::new(),
        };

        // Reserve object IDs:
        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        // 3+ = fonts, then content streams and page objects
        for _ in 0..3 {
            builder.objects.push(PdfObject { data: vec![] });
        }

        self.register_fonts(&mut builder, pages);
        let font_resources = self.build_font_resource_dict(&builder.font_objects);

        let mut page_obj_ids: Vec<usize> = Vec::with_capacity(pages.len());

        for page in pages {
            let content = self.build_content_stream(page, &builder.font_objects);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);

            let content_obj_id = builder.objects.len();
            let mut content_data: Vec<u8> = Vec::new();
            let _ = write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            builder.objects.push(PdfObject { data: content_data });

            let page_obj_id = builder.objects.len();
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << /Font << {} >> >> >>",
                page.width, page.height, content_obj_id, font_resources
            );
            builder.objects.push(PdfObject {
                data: page_dict.into_bytes(),
            });
            page_obj_ids.push(page_obj_id);
        }

        builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = self.write_info(&mut builder, metadata);

        let bytes = self.serialize(&builder, info_obj_id);
        log::debug!(
            "wrote {} page(s), {} objects, {} bytes",
            pages.len(),
            builder.objects.len() - 1,
            bytes.len()
        );
        Ok(bytes)
    }

    /// Info dictionary. No creation date, so identical input gives identical
    /// bytes.
    fn write_info(&self, builder: &mut PdfBuilder, metadata: &Metadata) -> Option<usize> {
        if metadata.title.is_none() && metadata.author.is_none() && metadata.subject.is_none() {
            return None;
        }

        let id = builder.objects.len();
        let mut info = String::from("<< ");
        if let Some(ref title) = metadata.title {
            let _ = write!(info, "/Title ({}) ", encode_pdf_text(title));
        }
        if let Some(ref author) = metadata.author {
            let _ = write!(info, "/Author ({}) ", encode_pdf_text(author));
        }
        if let Some(ref subject) = metadata.subject {
            let _ = write!(info, "/Subject ({}) ", encode_pdf_text(subject));
        }
        if let Some(ref creator) = metadata.creator {
            let _ = write!(info, "/Creator ({}) ", encode_pdf_text(creator));
        }
        let _ = write!(
            info,
            "/Producer (fiscal-report {}) >>",
            env!("CARGO_PKG_VERSION")
        );
        builder.objects.push(PdfObject {
            data: info.into_bytes(),
        });
        Some(id)
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(
        &self,
        page: &LayoutPage,
        font_objects: &[(StandardFont, usize)],
    ) -> String {
        let mut stream = String::new();
        for element in page.iter_elements() {
            self.write_element(&mut stream, element, page.height, font_objects);
        }
        stream
    }

    /// Write a single layout element, then its children, as PDF operators.
    fn write_element(
        &self,
        stream: &mut String,
        element: &LayoutElement,
        page_height: f64,
        font_objects: &[(StandardFont, usize)],
    ) {
        match &element.draw {
            DrawCommand::None => {}

            DrawCommand::Rect { fill } => {
                if fill.a > 0.0 {
                    let y = page_height - element.y - element.height;
                    let _ = write!(
                        stream,
                        "q\n{:.3} {:.3} {:.3} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
                        fill.r, fill.g, fill.b, element.x, y, element.width, element.height
                    );
                }
            }

            DrawCommand::Line {
                stroke_width,
                color,
            } => {
                let y1 = page_height - element.y;
                let y2 = page_height - element.y - element.height;
                let _ = write!(
                    stream,
                    "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
                    color.r,
                    color.g,
                    color.b,
                    stroke_width,
                    element.x,
                    y1,
                    element.x + element.width,
                    y2
                );
            }

            DrawCommand::Text {
                content,
                font,
                font_size,
                color,
            } => {
                if !content.is_empty() {
                    let baseline = element.y + (element.height + CAP_HEIGHT * font_size) / 2.0;
                    let _ = write!(
                        stream,
                        "BT\n{:.3} {:.3} {:.3} rg\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
                        color.r,
                        color.g,
                        color.b,
                        self.font_index(*font, font_objects),
                        font_size,
                        element.x,
                        page_height - baseline,
                        encode_pdf_text(content)
                    );
                }
            }
        }

        for child in &element.children {
            self.write_element(stream, child, page_height, font_objects);
        }
    }

    /// Register the fonts used across all pages, in a stable order.
    fn register_fonts(&self, builder: &mut PdfBuilder, pages: &[LayoutPage]) {
        let mut fonts: Vec<StandardFont> = Vec::new();
        for page in pages {
            for element in page.iter_elements() {
                collect_fonts(element, &mut fonts);
            }
        }

        fonts.sort();
        fonts.dedup();

        // Always have at least Helvetica
        if fonts.is_empty() {
            fonts.push(StandardFont::Helvetica);
        }

        for font in fonts {
            let obj_id = builder.objects.len();
            let font_dict = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                 /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            );
            builder.objects.push(PdfObject {
                data: font_dict.into_bytes(),
            });
            builder.font_objects.push((font, obj_id));
        }
    }

    fn build_font_resource_dict(&self, font_objects: &[(StandardFont, usize)]) -> String {
        font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Resource index (`/F0`, `/F1`, ...) of a registered font.
    fn font_index(&self, font: StandardFont, font_objects: &[(StandardFont, usize)]) -> usize {
        font_objects
            .iter()
            .position(|(f, _)| *f == font)
            .unwrap_or(0)
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: Option<usize>) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let header = format!("{} 0 obj\n", i);
            output.extend_from_slice(header.as_bytes());
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(output, "trailer\n<< /Size {} /Root 1 0 R", builder.objects.len());
        if let Some(info_id) = info_obj_id {
            let _ = write!(output, " /Info {} 0 R", info_id);
        }
        let _ = write!(output, " >>\nstartxref\n{}\n%%EOF\n", xref_offset);

        output
    }
}

fn collect_fonts(element: &LayoutElement, fonts: &mut Vec<StandardFont>) {
    if let DrawCommand::Text { font, content, .. } = &element.draw {
        if !content.is_empty() {
            fonts.push(*font);
        }
    }
    for child in &element.children {
        collect_fonts(child, fonts);
    }
}

/// Encode text as the body of a PDF literal string in WinAnsiEncoding.
///
/// Delimiters are escaped and bytes outside printable ASCII are written as
/// octal escapes. Characters WinAnsi cannot represent become `?`.
fn encode_pdf_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        let b = unicode_to_winansi(ch).unwrap_or(b'?');
        match b {
            b'\\' => out.push_str("\\\\"),
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            0x20..=0x7E => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out
}

/// Map a Unicode scalar to its Windows-1252 byte.
fn unicode_to_winansi(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }
    match cp {
        0x20AC => Some(0x80), // Euro sign
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85), // Horizontal ellipsis
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91),
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95), // Bullet
        0x2013 => Some(0x96), // En dash
        0x2014 => Some(0x97),
        0x02DC => Some(0x98),
        0x2122 => Some(0x99),
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),
        _ => None,
    }
}
