//! PDF export
//!
//! [`layout_report`] turns a [`ReportView`] into a display list of filled
//! rectangles and text runs measured in millimetres from the top-left
//! corner of each page. [`render_pdf`] draws that list with printpdf's
//! built-in Helvetica faces.

use printpdf::path::PaintMode;
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb};
use std::path::Path;
use tracing::debug;

use crate::error::{GraderError, Result};
use crate::findings::PDF_RECOMMENDATIONS;
use crate::report::{GLOSSARY, ReportView, ScoreBand};

/// US letter
pub const PAGE_WIDTH_MM: f32 = 215.9;
pub const PAGE_HEIGHT_MM: f32 = 279.4;
pub const MARGIN_MM: f32 = 19.0;

const PRIMARY: [u8; 3] = [35, 206, 217];
const ACCENT: [u8; 3] = [252, 164, 124];
const TEXT: [u8; 3] = [44, 62, 80];
const GREEN: [u8; 3] = [161, 204, 166];
const YELLOW: [u8; 3] = [249, 215, 121];
const WHITE: [u8; 3] = [255, 255, 255];
const BAR_BACKGROUND: [u8; 3] = [240, 240, 240];
const FOOTER_GRAY: [u8; 3] = [150, 150, 150];

const PT_TO_MM: f32 = 0.3528;
const BAR_WIDTH_MM: f32 = 100.0;
const BAR_HEIGHT_MM: f32 = 6.0;
const SCORE_BOX_WIDTH_MM: f32 = 80.0;
const SCORE_BOX_HEIGHT_MM: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: [u8; 3],
    },
    /// `x` is the left edge and `y` the baseline.
    Text {
        x: f32,
        y: f32,
        size: f32,
        weight: FontWeight,
        color: [u8; 3],
        text: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfPage {
    pub ops: Vec<DrawOp>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfLayout {
    pub pages: Vec<PdfPage>,
}

impl PdfLayout {
    /// All text runs in drawing order, page by page.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|page| {
            page.ops.iter().filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                DrawOp::FillRect { .. } => None,
            })
        })
    }
}

struct Canvas {
    pages: Vec<PdfPage>,
}

impl Canvas {
    fn new() -> Self {
        Self {
            pages: vec![PdfPage::default()],
        }
    }

    fn new_page(&mut self) {
        self.pages.push(PdfPage::default());
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: [u8; 3]) {
        self.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn text(&mut self, x: f32, y: f32, size: f32, weight: FontWeight, color: [u8; 3], text: &str) {
        self.push(DrawOp::Text {
            x,
            y,
            size,
            weight,
            color,
            text: text.to_string(),
        });
    }

    fn centered(&mut self, y: f32, size: f32, weight: FontWeight, color: [u8; 3], text: &str) {
        let x = (PAGE_WIDTH_MM - text_width(text, size, weight)) / 2.0;
        self.text(x.max(0.0), y, size, weight, color, text);
    }
}

/// Approximate Helvetica advance width in millimetres.
fn text_width(text: &str, size: f32, weight: FontWeight) -> f32 {
    let em = match weight {
        FontWeight::Regular => 0.52,
        FontWeight::Bold => 0.56,
    };
    text.chars().count() as f32 * size * em * PT_TO_MM
}

/// Greedy word wrap to `max_width` millimetres.
fn wrap_text(text: &str, max_width: f32, size: f32, weight: FontWeight) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if !current.is_empty() && text_width(&candidate, size, weight) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn score_color(score: u32) -> [u8; 3] {
    match ScoreBand::from_score(score) {
        ScoreBand::Excellent => GREEN,
        ScoreBand::Good => YELLOW,
        _ => ACCENT,
    }
}

/// Lay out the exported report: summary page(s) followed by the glossary.
pub fn layout_report(view: &ReportView) -> PdfLayout {
    let mut canvas = Canvas::new();
    let content_width = PAGE_WIDTH_MM - MARGIN_MM * 2.0;
    let page_bottom = PAGE_HEIGHT_MM - MARGIN_MM - 20.0;

    // Header band
    canvas.rect(0.0, 0.0, PAGE_WIDTH_MM, 30.0, PRIMARY);
    canvas.centered(18.0, 24.0, FontWeight::Bold, WHITE, "Precision AEO");
    canvas.centered(
        26.0,
        12.0,
        FontWeight::Regular,
        WHITE,
        &format!("Report Generated for {}", view.domain),
    );

    // Score box
    let box_x = (PAGE_WIDTH_MM - SCORE_BOX_WIDTH_MM) / 2.0;
    let box_y = MARGIN_MM + 12.0;
    canvas.rect(
        box_x,
        box_y,
        SCORE_BOX_WIDTH_MM,
        SCORE_BOX_HEIGHT_MM,
        score_color(view.overall),
    );
    canvas.centered(
        box_y + SCORE_BOX_HEIGHT_MM / 2.0 + 4.0,
        22.0,
        FontWeight::Bold,
        WHITE,
        &format!("{}/100", view.overall),
    );

    let mut y = box_y + SCORE_BOX_HEIGHT_MM + 12.0;
    canvas.centered(y, 14.0, FontWeight::Bold, TEXT, "Overall AEO Analysis");
    y += 6.0;
    for line in wrap_text(view.band_description, content_width, 10.0, FontWeight::Regular) {
        canvas.centered(y, 10.0, FontWeight::Regular, TEXT, &line);
        y += 5.0;
    }
    canvas.centered(
        y + 1.0,
        9.0,
        FontWeight::Regular,
        TEXT,
        &format!("Analysis Date: {}", view.analysis_date),
    );

    // Category bars
    y += 14.0;
    canvas.text(MARGIN_MM, y, 14.0, FontWeight::Bold, TEXT, "Category Performance");
    y += 8.0;
    for category in &view.categories {
        let bar_x = MARGIN_MM + 5.0;
        canvas.text(bar_x, y, 11.0, FontWeight::Bold, TEXT, category.name);
        canvas.rect(bar_x, y + 2.0, BAR_WIDTH_MM, BAR_HEIGHT_MM, BAR_BACKGROUND);
        canvas.rect(
            bar_x,
            y + 2.0,
            category.score.min(100) as f32 / 100.0 * BAR_WIDTH_MM,
            BAR_HEIGHT_MM,
            score_color(category.score),
        );
        canvas.text(
            MARGIN_MM + BAR_WIDTH_MM + 20.0,
            y + 6.0,
            11.0,
            FontWeight::Regular,
            TEXT,
            &format!("{}/100", category.score),
        );
        canvas.text(
            MARGIN_MM + BAR_WIDTH_MM + 45.0,
            y + 6.0,
            9.0,
            FontWeight::Regular,
            TEXT,
            &format!("({}% weight)", category.weight),
        );
        y += 15.0;
    }

    // Recommendations
    y += 5.0;
    canvas.text(MARGIN_MM, y, 14.0, FontWeight::Bold, TEXT, "Priority Recommendations");
    y += 8.0;
    for (i, rec) in view.recommendations.iter().take(PDF_RECOMMENDATIONS).enumerate() {
        canvas.rect(MARGIN_MM + 0.5, y - 3.0, 3.0, 3.0, PRIMARY);
        let lines = wrap_text(
            &format!("{}. {rec}", i + 1),
            content_width - 10.0,
            10.0,
            FontWeight::Regular,
        );
        for (k, line) in lines.iter().enumerate() {
            canvas.text(MARGIN_MM + 7.0, y + k as f32 * 4.5, 10.0, FontWeight::Regular, TEXT, line);
        }
        y += lines.len() as f32 * 4.5 + 3.0;
        if y > page_bottom {
            canvas.new_page();
            y = MARGIN_MM;
        }
    }

    // Glossary
    canvas.new_page();
    let mut y = MARGIN_MM;
    canvas.centered(y, 16.0, FontWeight::Bold, TEXT, "Key Terms");
    y += 10.0;
    for (term, definition) in GLOSSARY {
        canvas.text(MARGIN_MM, y, 11.0, FontWeight::Bold, TEXT, term);
        y += 5.0;
        let lines = wrap_text(definition, content_width, 11.0, FontWeight::Regular);
        for (k, line) in lines.iter().enumerate() {
            canvas.text(MARGIN_MM, y + k as f32 * 5.0, 11.0, FontWeight::Regular, TEXT, line);
        }
        y += lines.len() as f32 * 5.0 + 3.0;
        if y > page_bottom {
            canvas.new_page();
            y = MARGIN_MM;
        }
    }

    // Footer on every page
    let total = canvas.pages.len();
    for (i, page) in canvas.pages.iter_mut().enumerate() {
        let footer_y = PAGE_HEIGHT_MM - 10.0;
        let page_label = format!("Page {} of {total}", i + 1);
        let label_x = PAGE_WIDTH_MM - MARGIN_MM - text_width(&page_label, 8.0, FontWeight::Regular);
        page.ops.push(DrawOp::Text {
            x: MARGIN_MM,
            y: footer_y,
            size: 8.0,
            weight: FontWeight::Regular,
            color: FOOTER_GRAY,
            text: "Generated by Precision AEO".to_string(),
        });
        page.ops.push(DrawOp::Text {
            x: label_x,
            y: footer_y,
            size: 8.0,
            weight: FontWeight::Regular,
            color: FOOTER_GRAY,
            text: page_label,
        });
    }

    PdfLayout {
        pages: canvas.pages,
    }
}

fn rgb(color: [u8; 3]) -> Color {
    Color::Rgb(Rgb::new(
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
        None,
    ))
}

fn draw_page(layer: &PdfLayerReference, page: &PdfPage, regular: &IndirectFontRef, bold: &IndirectFontRef) {
    for op in &page.ops {
        match op {
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                layer.set_fill_color(rgb(*color));
                let rect = Rect::new(
                    Mm(*x),
                    Mm(PAGE_HEIGHT_MM - y - height),
                    Mm(x + width),
                    Mm(PAGE_HEIGHT_MM - y),
                )
                .with_mode(PaintMode::Fill);
                layer.add_rect(rect);
            }
            DrawOp::Text {
                x,
                y,
                size,
                weight,
                color,
                text,
            } => {
                let font = match weight {
                    FontWeight::Regular => regular,
                    FontWeight::Bold => bold,
                };
                layer.set_fill_color(rgb(*color));
                layer.use_text(text.as_str(), *size, Mm(*x), Mm(PAGE_HEIGHT_MM - y), font);
            }
        }
    }
}

/// Draw a laid-out report into PDF bytes.
pub fn render_pdf(layout: &PdfLayout, title: &str) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| GraderError::Pdf(format!("{e:?}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| GraderError::Pdf(format!("{e:?}")))?;

    for (index, page) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(page_index).get_layer(layer_index)
        };
        draw_page(&layer, page, &regular, &bold);
    }

    debug!(pages = layout.pages.len(), "rendered PDF report");
    doc.save_to_bytes()
        .map_err(|e| GraderError::Pdf(format!("{e:?}")))
}

/// Render `view` and write the PDF to `path`.
pub fn write_pdf(view: &ReportView, path: &Path) -> Result<()> {
    let layout = layout_report(view);
    let bytes = render_pdf(&layout, &format!("AEO Report for {}", view.domain))?;
    std::fs::write(path, bytes)?;
    Ok(())
}
