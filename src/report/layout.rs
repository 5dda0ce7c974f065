//! Page layout on top of printpdf
//!
//! Keeps a cursor that moves down the page and starts a new A4 page when the
//! next block would cross the bottom margin. All text passed in is expected to
//! be sanitized already.

use std::fs::File;
use std::io::{BufWriter, Write};

use printpdf::image_crate::{DynamicImage, GenericImageView};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};

use crate::chart::{RadarChart, Vertex};
use crate::error::ReportError;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 15.0;
pub const USABLE_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size
const CHAR_WIDTH: f32 = 0.6;
const LINE_SPACING: f32 = 1.45;
/// Indent for continuation lines of a wrapped `line`
const HANGING_INDENT: f32 = 4.0;

/// Split `text` into lines of at most `max_chars`, breaking on spaces where possible
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word;
            while word.chars().count() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let split = word.char_indices().nth(max_chars).map(|(i, _)| i).unwrap_or(word.len());
                lines.push(word[..split].to_string());
                word = &word[split..];
            }
            if word.is_empty() {
                continue;
            }
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}

fn chars_per_line(font_size: f32, width: f32) -> usize {
    (width / (font_size * CHAR_WIDTH * PT_TO_MM)).floor() as usize
}

fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * CHAR_WIDTH * PT_TO_MM
}

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn pdf_err(e: impl std::fmt::Debug) -> ReportError {
    ReportError::Pdf(format!("{:?}", e))
}

pub struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    y: f32,
    pages: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Regular,
    Bold,
    Italic,
}

impl PageWriter {
    pub fn new(title: &str) -> Result<Self, ReportError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Page 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;
        let italic = doc.add_builtin_font(BuiltinFont::HelveticaOblique).map_err(pdf_err)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            italic,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        })
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    fn font(&self, style: Style) -> &IndirectFontRef {
        match style {
            Style::Regular => &self.regular,
            Style::Bold => &self.bold,
            Style::Italic => &self.italic,
        }
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Page {}", self.pages));
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Start a new page unless `height` mm still fit above the bottom margin
    pub fn ensure(&mut self, height: f32) {
        if self.y - height < MARGIN {
            self.new_page();
        }
    }

    pub fn gap(&mut self, mm: f32) {
        self.y -= mm;
        if self.y < MARGIN {
            self.new_page();
        }
    }

    fn line_height(font_size: f32) -> f32 {
        font_size * PT_TO_MM * LINE_SPACING
    }

    fn put(&mut self, text: &str, font_size: f32, x: f32, style: Style) {
        let height = Self::line_height(font_size);
        self.ensure(height);
        self.y -= height;
        self.layer.set_fill_color(rgb(0.0, 0.0, 0.0));
        let font = self.font(style).clone();
        self.layer.use_text(text, font_size, Mm(x), Mm(self.y), &font);
    }

    /// A label line; anything past the page width continues on indented lines
    pub fn line(&mut self, text: &str, font_size: f32, style: Style) {
        let mut lines = wrap(text, chars_per_line(font_size, USABLE_WIDTH)).into_iter();
        let Some(first) = lines.next() else {
            return;
        };
        self.put(&first, font_size, MARGIN, style);

        let rest: Vec<String> = lines.collect();
        if rest.is_empty() {
            return;
        }
        let indented = chars_per_line(font_size, USABLE_WIDTH - HANGING_INDENT);
        for part in wrap(&rest.join(" "), indented) {
            self.put(&part, font_size, MARGIN + HANGING_INDENT, style);
        }
    }

    /// Centred text; wraps and centres each line when wider than the page
    pub fn centered(&mut self, text: &str, font_size: f32, style: Style) {
        for part in wrap(text, chars_per_line(font_size, USABLE_WIDTH)) {
            let width = text_width(&part, font_size).min(USABLE_WIDTH);
            let x = MARGIN + (USABLE_WIDTH - width) / 2.0;
            self.put(&part, font_size, x, style);
        }
    }

    /// Word-wrapped text; may span pages
    pub fn paragraph(&mut self, text: &str, font_size: f32, style: Style) {
        for line in wrap(text, chars_per_line(font_size, USABLE_WIDTH)) {
            self.put(&line, font_size, MARGIN, style);
        }
    }

    /// Draw the radar chart as vector paths, `size` mm square, centred
    pub fn radar(&mut self, chart: &RadarChart, size: f32) {
        self.ensure(size);
        let cx = PAGE_WIDTH / 2.0;
        let cy = self.y - size / 2.0;
        let radius = size * 0.36;
        let to_point = |v: &Vertex| {
            (
                Point::new(Mm(cx + v.x as f32 * radius), Mm(cy - v.y as f32 * radius)),
                false,
            )
        };

        self.layer.set_outline_thickness(0.4);
        self.layer.set_outline_color(rgb(0.8, 0.8, 0.8));
        for fraction in RadarChart::grid_fractions() {
            let ring = chart.ring(fraction);
            self.layer.add_line(Line {
                points: ring[..ring.len() - 1].iter().map(to_point).collect(),
                is_closed: true,
            });
        }
        for axis in &chart.axes {
            self.layer.add_line(Line {
                points: vec![to_point(&Vertex { x: 0.0, y: 0.0 }), to_point(&axis.direction)],
                is_closed: false,
            });
        }

        let polygon = chart.polygon();
        self.layer.set_fill_color(rgb(0.55, 0.68, 1.0));
        self.layer.set_outline_color(rgb(0.16, 0.31, 0.84));
        self.layer.set_outline_thickness(1.2);
        self.layer.add_polygon(Polygon {
            rings: vec![polygon[..polygon.len() - 1].iter().map(to_point).collect()],
            mode: PaintMode::FillStroke,
            winding_order: WindingOrder::NonZero,
        });

        self.layer.set_fill_color(rgb(0.0, 0.0, 0.0));
        let label_size = 8.0;
        for axis in &chart.axes {
            let label = format!("{} ({:.0})", axis.label, axis.value);
            let width = text_width(&label, label_size);
            let lx = cx + axis.direction.x as f32 * radius * 1.12;
            let ly = cy - axis.direction.y as f32 * radius * 1.12;
            let x = if axis.direction.x > 0.2 {
                lx
            } else if axis.direction.x < -0.2 {
                lx - width
            } else {
                lx - width / 2.0
            };
            let y = if axis.direction.y < -0.2 { ly + 1.0 } else { ly - 3.0 };
            self.layer.use_text(label, label_size, Mm(x), Mm(y), &self.regular);
        }

        self.y -= size;
    }

    /// Embed a raster image `width` mm wide, centred
    pub fn image(&mut self, image: &DynamicImage, width: f32) {
        let (px_w, px_h) = image.dimensions();
        if px_w == 0 || px_h == 0 {
            return;
        }
        let height = width * px_h as f32 / px_w as f32;
        self.ensure(height);
        self.y -= height;

        // printpdf sizes images by dpi: mm = px / dpi * 25.4
        let dpi = px_w as f32 * 25.4 / width;
        Image::from_dynamic_image(image).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN + (USABLE_WIDTH - width) / 2.0)),
                translate_y: Some(Mm(self.y)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }

    /// Serialize the document into `file`
    pub fn finish(self, file: File) -> Result<(), ReportError> {
        let mut writer = BufWriter::new(file);
        self.doc.save(&mut writer).map_err(pdf_err)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let text = "I love working with teams and leading projects across the whole company.";
        let lines = wrap(text, 20);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap("abcdefghijkl xy", 5);
        assert_eq!(lines, vec!["abcde", "fghij", "kl xy"]);
    }

    #[test]
    fn test_wrap_keeps_paragraph_breaks() {
        let lines = wrap("Input Summary:\nfirst line", 80);
        assert_eq!(lines, vec!["Input Summary:", "first line"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn test_chars_per_line() {
        // 12pt Helvetica on 180mm fits roughly 70 characters
        let n = chars_per_line(12.0, USABLE_WIDTH);
        assert!((65..=75).contains(&n), "{}", n);
    }

    #[test]
    fn test_wrap_counts_chars_not_bytes() {
        let lines = wrap("Zoë Zoë Zoë", 7);
        assert_eq!(lines, vec!["Zoë Zoë", "Zoë"]);
    }

    #[test]
    fn test_long_line_wraps_instead_of_clipping() {
        let mut page = PageWriter::new("test").unwrap();
        let top = page.y;
        page.line("short", 12.0, Style::Regular);
        let one_line = top - page.y;

        let long = format!("Name: {}", "Wolfeschlegelsteinhausen ".repeat(8));
        let before = page.y;
        page.line(&long, 12.0, Style::Regular);
        assert!(before - page.y >= 3.0 * one_line - 0.001, "advanced {}", before - page.y);
    }

    #[test]
    fn test_long_centered_text_wraps() {
        let mut page = PageWriter::new("test").unwrap();
        let top = page.y;
        page.centered("Personality Mix Analyzer Report", 18.0, Style::Bold);
        let one_line = top - page.y;

        let before = page.y;
        page.centered(&"Personality Mix Analyzer Report ".repeat(4), 18.0, Style::Bold);
        assert!(before - page.y >= 2.0 * one_line - 0.001);
    }

    #[test]
    fn test_long_content_adds_pages() {
        let mut page = PageWriter::new("test").unwrap();
        for _ in 0..120 {
            page.line("filler", 12.0, Style::Regular);
        }
        assert!(page.pages() >= 3);
    }
}
