//! The export pipeline: a [`StoryDocument`] in, a paginated PDF out.
//!
//! Output shape: a title page (page 1), then one page per segment in input
//! order, each numbered from 2 with its image scaled to fit above the
//! wrapped text, and a decorative framing pass applied uniformly at the end.
//!
//! Image fetches run concurrently, but their results are awaited and written
//! strictly in document order so page numbering and layout stay
//! deterministic. A failed image only degrades its own page. The pipeline
//! keeps no state between invocations; driving code is responsible for not
//! issuing overlapping exports against the same destination.

mod decor;
pub mod layout;

use crate::assets::ImageFetcher;
use crate::error::{AssetError, ExportError};
use crate::story::{Segment, StoryDocument};
use printpdf::image::RawImage;
use printpdf::ops::Op;
use printpdf::xobject::{XObject, XObjectTransform};
use printpdf::{
    BuiltinFont, Mm, PdfDocument, PdfPage, PdfSaveOptions, Pt, Rgb, TextItem, TextMatrix,
    XObjectId,
};
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;

// Page geometry: A4 with the source's 20 mm margin.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;

const TITLE_FONT_SIZE: f32 = 24.0;
const BODY_FONT_SIZE: f32 = 12.0;
const LINE_HEIGHT_FACTOR: f32 = 1.2;

// Vertical layout constants, from the top edge.
const TITLE_TOP_MM: f32 = 40.0;
const COVER_IMAGE_TOP_MM: f32 = 60.0;
/// Vertical space the cover image must leave free (title above, caption room below).
const COVER_IMAGE_RESERVE_MM: f32 = 100.0;
const SEGMENT_IMAGE_TOP_MM: f32 = 40.0;
/// Gap between a segment's image and its text.
const TEXT_GAP_MM: f32 = 20.0;

/// Characters of the title carried into the download filename.
const FILE_NAME_MAX_CHARS: usize = 30;

/// A finished export: the PDF bytes plus the filename derived from the story
/// title.
#[derive(Debug, Clone)]
pub struct ExportedStory {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

#[derive(Debug, Clone, Copy)]
struct PageGeometry {
    width: f32,
    height: f32,
    margin: f32,
}

impl PageGeometry {
    fn a4() -> Self {
        Self {
            width: Mm(PAGE_WIDTH_MM).into_pt().0,
            height: Mm(PAGE_HEIGHT_MM).into_pt().0,
            margin: Mm(MARGIN_MM).into_pt().0,
        }
    }

    fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }
}

enum Align {
    Left,
    Center,
    Right,
}

/// Builds the paginated PDF for a story document.
pub struct Exporter {
    body_font: BuiltinFont,
    title_font: BuiltinFont,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter {
    pub fn new() -> Self {
        Self {
            body_font: BuiltinFont::Helvetica,
            title_font: BuiltinFont::HelveticaBold,
        }
    }

    /// Exports `doc` as a PDF. The document is validated up front and is not
    /// mutated; exporting the same document twice yields the same page
    /// count, order, and text content.
    pub async fn export(
        &self,
        doc: &StoryDocument,
        fetcher: &ImageFetcher,
    ) -> Result<ExportedStory, ExportError> {
        doc.validate()?;

        // Kick off every fetch now; results are consumed in page order below.
        let cover_fetch = doc
            .cover_image
            .as_deref()
            .map(|reference| spawn_fetch(fetcher, reference));
        let segment_fetches: Vec<_> = doc
            .segments
            .iter()
            .map(|segment| spawn_fetch(fetcher, &segment.image_url))
            .collect();

        let mut pdf = PdfDocument::new(&doc.title);
        let mut pages: Vec<Vec<Op>> = Vec::with_capacity(doc.total_pages());

        let cover_bytes = match cover_fetch {
            Some(handle) => degrade(handle.await?, "cover image"),
            None => None,
        };
        pages.push(self.cover_page(&mut pdf, doc, cover_bytes));

        for (index, (segment, handle)) in doc.segments.iter().zip(segment_fetches).enumerate() {
            let image = degrade(handle.await?, &format!("segment {} image", index + 1));
            pages.push(self.segment_page(&mut pdf, index, segment, image));
        }

        let geo = PageGeometry::a4();
        for ops in &mut pages {
            decor::apply(ops, geo.width, geo.height, geo.margin);
        }
        for ops in pages {
            pdf.pages
                .push(PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), ops));
        }

        let mut warnings = Vec::new();
        let bytes = pdf.save(&PdfSaveOptions::default(), &mut warnings);
        Ok(ExportedStory {
            bytes,
            file_name: derive_file_name(&doc.title),
        })
    }

    /// Exports and writes the result into `dir` under the derived filename.
    pub async fn export_to_file(
        &self,
        doc: &StoryDocument,
        fetcher: &ImageFetcher,
        dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        let exported = self.export(doc, fetcher).await?;
        let path = dir.join(&exported.file_name);
        std::fs::write(&path, &exported.bytes)?;
        Ok(path)
    }

    /// Page 1: the wrapped, centered title, with the cover image (when it
    /// loaded) scaled to fit beneath it.
    fn cover_page(
        &self,
        pdf: &mut PdfDocument,
        doc: &StoryDocument,
        cover: Option<Vec<u8>>,
    ) -> Vec<Op> {
        let geo = PageGeometry::a4();
        let mut ops = Vec::new();

        let lines = layout::wrap_text(&doc.title, TITLE_FONT_SIZE, geo.content_width());
        self.write_lines(
            &mut ops,
            &lines,
            self.title_font,
            TITLE_FONT_SIZE,
            Mm(TITLE_TOP_MM).into_pt().0,
            &geo,
            Align::Center,
        );

        if let Some(bytes) = cover {
            match register_image(pdf, &bytes) {
                Ok((id, natural)) => {
                    let max_height = geo.height - Mm(COVER_IMAGE_RESERVE_MM).into_pt().0;
                    let (width, height) = layout::fit_within(
                        natural.0 as f32,
                        natural.1 as f32,
                        geo.content_width(),
                        max_height,
                    );
                    let x = (geo.width - width) / 2.0;
                    let top = Mm(COVER_IMAGE_TOP_MM).into_pt().0;
                    push_image(&mut ops, id, natural, x, top, width, height, geo.height);
                }
                Err(err) => {
                    log::warn!("cover image could not be decoded, rendering title only: {err}");
                }
            }
        }
        ops
    }

    /// One content page: visible page number top-right, the image (when it
    /// loaded) capped to half the page height, and the wrapped segment text.
    fn segment_page(
        &self,
        pdf: &mut PdfDocument,
        index: usize,
        segment: &Segment,
        image: Option<Vec<u8>>,
    ) -> Vec<Op> {
        let geo = PageGeometry::a4();
        let mut ops = Vec::new();

        // The cover is page 1, so segment i lands on page i + 2.
        let number = (index + 2).to_string();
        self.write_lines(
            &mut ops,
            std::slice::from_ref(&number),
            self.body_font,
            BODY_FONT_SIZE,
            geo.margin,
            &geo,
            Align::Right,
        );

        let image_top = Mm(SEGMENT_IMAGE_TOP_MM).into_pt().0;
        let mut text_top = image_top;
        if let Some(bytes) = image {
            match register_image(pdf, &bytes) {
                Ok((id, natural)) => {
                    let (width, height) = layout::fit_within(
                        natural.0 as f32,
                        natural.1 as f32,
                        geo.content_width(),
                        geo.height / 2.0,
                    );
                    let x = (geo.width - width) / 2.0;
                    push_image(&mut ops, id, natural, x, image_top, width, height, geo.height);
                    text_top = image_top + height + Mm(TEXT_GAP_MM).into_pt().0;
                }
                Err(err) => {
                    log::warn!(
                        "segment {} image could not be decoded, rendering text only: {err}",
                        index + 1
                    );
                }
            }
        }

        let lines = layout::wrap_text(&segment.text, BODY_FONT_SIZE, geo.content_width());
        self.write_lines(
            &mut ops,
            &lines,
            self.body_font,
            BODY_FONT_SIZE,
            text_top,
            &geo,
            Align::Left,
        );
        ops
    }

    /// Emits one text section writing `lines` stacked downward from `top`
    /// (top-edge offset in points; converted to PDF's bottom-left origin
    /// here).
    fn write_lines(
        &self,
        ops: &mut Vec<Op>,
        lines: &[String],
        font: BuiltinFont,
        size: f32,
        top: f32,
        geo: &PageGeometry,
        align: Align,
    ) {
        if lines.is_empty() {
            return;
        }
        ops.push(Op::StartTextSection);
        ops.push(Op::SetFillColor { col: black() });
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(size),
            font,
        });
        for (i, line) in lines.iter().enumerate() {
            let baseline = top + size * 0.8 + i as f32 * size * LINE_HEIGHT_FACTOR;
            let x = match align {
                Align::Left => geo.margin,
                Align::Center => ((geo.width - layout::measure_line(line, size)) / 2.0).max(0.0),
                Align::Right => geo.width - geo.margin - layout::measure_line(line, size),
            };
            ops.push(Op::SetTextMatrix {
                matrix: TextMatrix::Translate(Pt(x), Pt(geo.height - baseline)),
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(line.clone())],
                font,
            });
        }
        ops.push(Op::EndTextSection);
    }
}

fn black() -> printpdf::color::Color {
    printpdf::color::Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn spawn_fetch(fetcher: &ImageFetcher, reference: &str) -> JoinHandle<Result<Vec<u8>, AssetError>> {
    let fetcher = fetcher.clone();
    let reference = reference.to_string();
    tokio::spawn(async move { fetcher.fetch(&reference).await })
}

/// Collapses a per-image failure into a missing image. The affected page is
/// rendered without it; the export carries on.
fn degrade(result: Result<Vec<u8>, AssetError>, what: &str) -> Option<Vec<u8>> {
    match result {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            log::warn!("{what} failed to load, rendering page without it: {err}");
            None
        }
    }
}

/// Decodes image bytes and registers them as an XObject on the document.
/// Returns the id plus the natural pixel dimensions.
fn register_image(
    pdf: &mut PdfDocument,
    bytes: &[u8],
) -> Result<(XObjectId, (usize, usize)), AssetError> {
    let mut warnings = Vec::new();
    let raw = RawImage::decode_from_bytes(bytes, &mut warnings)
        .map_err(|e| AssetError::Decode(e.to_string()))?;
    let natural = (raw.width, raw.height);
    let id = XObjectId::new();
    pdf.resources.xobjects.map.insert(id.clone(), XObject::Image(raw));
    Ok((id, natural))
}

#[allow(clippy::too_many_arguments)]
fn push_image(
    ops: &mut Vec<Op>,
    id: XObjectId,
    natural: (usize, usize),
    x: f32,
    top: f32,
    width: f32,
    height: f32,
    page_height: f32,
) {
    // At 72 dpi one pixel is one point, so the scale factors map natural
    // pixels onto the fitted box.
    ops.push(Op::UseXobject {
        id,
        transform: XObjectTransform {
            translate_x: Some(Pt(x)),
            translate_y: Some(Pt(page_height - (top + height))),
            scale_x: Some(width / natural.0 as f32),
            scale_y: Some(height / natural.1 as f32),
            rotate: None,
            dpi: Some(72.0),
        },
    });
}

/// Download filename: the title truncated to a bounded length, with
/// path-hostile characters replaced, plus the extension.
fn derive_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .take(FILE_NAME_MAX_CHARS)
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                '-'
            } else {
                c
            }
        })
        .collect();
    let stem = stem.trim();
    if stem.is_empty() {
        "story.pdf".to_string()
    } else {
        format!("{stem}.pdf")
    }
}
