//! Single-page PDF report: title, timestamp, chart image, metric table.

use image::{ImageDecoder, png::PngDecoder};
use printpdf::{
    BuiltinFont, Image, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point,
};
use std::{
    fs::File,
    io::BufReader,
    io::BufWriter,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::{
    error::{ReportError, ReportResult},
    model::{ChartArtifact, CovidSnapshot},
    render::text::{Face, MM_PER_PT, text_width_mm, to_latin1},
};

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN: f64 = 10.0;
const CELL_PADDING: f64 = 1.0;

const IMAGE_X: f64 = 15.0;
const IMAGE_WIDTH: f64 = 180.0;
const IMAGE_DPI: f64 = 150.0;

const METRIC_COLUMN: f64 = 70.0;
const VALUE_COLUMN: f64 = 60.0;
const ROW_HEIGHT: f64 = 8.0;

/// What ended up in a written report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub path: PathBuf,
    pub embedded_chart: bool,
    pub rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

/// Title and subtitle lines, already reduced to Latin-1.
pub fn heading_lines(snapshot: &CovidSnapshot) -> [String; 2] {
    [
        to_latin1(&format!("COVID-19 Report - {}", snapshot.country)),
        to_latin1(&format!("Generated on: {}", snapshot.last_updated_display())),
    ]
}

/// `[metric, value]` cells of the table body, already reduced to Latin-1.
pub fn table_cells(snapshot: &CovidSnapshot) -> Vec<[String; 2]> {
    snapshot
        .table_rows()
        .iter()
        .map(|row| [to_latin1(row.metric), to_latin1(&row.value.to_string())])
        .collect()
}

/// Cursor-based writer over one page; `y` grows downward from the top edge.
struct PageWriter {
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    face: Face,
    size_pt: f64,
    x: f64,
    y: f64,
}

impl PageWriter {
    fn set_font(&mut self, face: Face, size_pt: f64) {
        self.face = face;
        self.size_pt = size_pt;
    }

    /// Text cell of width `w` (0 = up to the right margin) at the cursor; moves the cursor right.
    fn cell(&mut self, w: f64, h: f64, text: &str, border: bool, align: Align) {
        let w = if w > 0.0 { w } else { PAGE_WIDTH - MARGIN - self.x };
        let text = to_latin1(text);

        if border {
            self.rect(self.x, self.y, w, h);
        }

        if !text.is_empty() {
            let text_x = match align {
                Align::Left => self.x + CELL_PADDING,
                Align::Center => self.x + (w - text_width_mm(&text, self.face, self.size_pt)) / 2.0,
            };
            let baseline = self.y + h / 2.0 + 0.3 * self.size_pt * MM_PER_PT;
            let font = match self.face {
                Face::Regular => &self.regular,
                Face::Bold => &self.bold,
            };
            self.layer
                .use_text(text, self.size_pt, Mm(text_x), Mm(PAGE_HEIGHT - baseline), font);
        }

        self.x += w;
    }

    /// Line break: back to the left margin, `h` millimetres down.
    fn ln(&mut self, h: f64) {
        self.x = MARGIN;
        self.y += h;
    }

    fn rect(&self, x: f64, top: f64, w: f64, h: f64) {
        let corner = |x: f64, y: f64| (Point::new(Mm(x), Mm(PAGE_HEIGHT - y)), false);
        self.layer.add_shape(Line {
            points: vec![
                corner(x, top),
                corner(x + w, top),
                corner(x + w, top + h),
                corner(x, top + h),
            ],
            is_closed: true,
            has_fill: false,
            has_stroke: true,
            is_clipping_path: false,
        });
    }

    /// Place the chart at `IMAGE_X`, scaled to `IMAGE_WIDTH`. `None` when it cannot be read.
    fn chart_image(&mut self, path: &Path) -> Option<f64> {
        let file = File::open(path).ok()?;
        let decoder = match PngDecoder::new(BufReader::new(file)) {
            Ok(decoder) => decoder,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "chart image unreadable, skipping it");
                return None;
            }
        };

        let (px_width, px_height) = decoder.dimensions();
        if px_width == 0 {
            return None;
        }
        let image = match Image::try_from(decoder) {
            Ok(image) => image,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "chart image unreadable, skipping it");
                return None;
            }
        };

        let natural_width = f64::from(px_width) / IMAGE_DPI * 25.4;
        let scale = IMAGE_WIDTH / natural_width;
        let height = IMAGE_WIDTH * f64::from(px_height) / f64::from(px_width);

        image.add_to_layer(
            self.layer.clone(),
            Some(Mm(IMAGE_X)),
            Some(Mm(PAGE_HEIGHT - self.y - height)),
            None,
            Some(scale),
            Some(scale),
            Some(IMAGE_DPI),
        );
        self.y += height;
        Some(height)
    }
}

/// Write the report to `path`, overwriting it.
///
/// A chart file that is gone (or unreadable) by now is left out of the page
/// without failing the report.
pub fn write_report(
    snapshot: &CovidSnapshot,
    chart: ChartArtifact,
    path: &Path,
) -> ReportResult<ReportSummary> {
    let fail = |err: &dyn std::fmt::Debug| ReportError::render(path, format!("{err:?}"));
    let [title, subtitle] = heading_lines(snapshot);

    let (doc, page, layer) =
        PdfDocument::new(title.as_str(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| fail(&e))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| fail(&e))?;

    let mut writer = PageWriter {
        layer: doc.get_page(page).get_layer(layer),
        regular,
        bold,
        face: Face::Regular,
        size_pt: 12.0,
        x: MARGIN,
        y: MARGIN,
    };

    writer.set_font(Face::Bold, 18.0);
    writer.cell(0.0, 10.0, &title, false, Align::Center);
    writer.ln(10.0);
    writer.ln(5.0);

    writer.set_font(Face::Regular, 12.0);
    writer.cell(0.0, 8.0, &subtitle, false, Align::Center);
    writer.ln(8.0);
    writer.ln(10.0);

    let embedded_chart = if chart.path().exists() {
        writer.chart_image(chart.path()).is_some()
    } else {
        warn!(path = %chart.path().display(), "chart image missing, report will have no chart");
        false
    };
    if embedded_chart {
        writer.ln(10.0);
    }

    writer.set_font(Face::Bold, 12.0);
    writer.cell(METRIC_COLUMN, ROW_HEIGHT, "Metric", true, Align::Center);
    writer.cell(VALUE_COLUMN, ROW_HEIGHT, "Value", true, Align::Center);
    writer.ln(ROW_HEIGHT);

    writer.set_font(Face::Regular, 12.0);
    let cells = table_cells(snapshot);
    for [metric, value] in &cells {
        writer.cell(METRIC_COLUMN, ROW_HEIGHT, metric, true, Align::Left);
        writer.cell(VALUE_COLUMN, ROW_HEIGHT, value, true, Align::Center);
        writer.ln(ROW_HEIGHT);
    }

    let file = File::create(path).map_err(|e| ReportError::render(path, e))?;
    doc.save(&mut BufWriter::new(file)).map_err(|e| fail(&e))?;
    debug!(path = %path.display(), embedded_chart, rows = cells.len(), "report written");

    Ok(ReportSummary {
        path: path.to_path_buf(),
        embedded_chart,
        rows: cells.len(),
    })
}
