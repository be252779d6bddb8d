mod images;

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use chrono::{Datelike, Local, Timelike};
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::canvas::{Canvas, Circle, Frame, Rgb};
use crate::fonts::{self, FontFace, FontRegistry, FontStyle};
use crate::raster::RasterImage;

/// Bezier control distance for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

const STYLES: [FontStyle; 2] = [FontStyle::Regular, FontStyle::Bold];

fn font_resource(style: FontStyle) -> &'static [u8] {
    match style {
        FontStyle::Regular => b"F1",
        FontStyle::Bold => b"F2",
    }
}

struct FontUse {
    font_ref: Ref,
    remapper: subsetter::GlyphRemapper,
    used: BTreeMap<u16, char>,
}

struct PageRefs {
    page: Ref,
    content: Ref,
}

/// Streaming PDF writer. Each page's content is compressed and written when
/// the next page begins; images are written the first time they are drawn;
/// fonts and the page tree are written by [`PdfCanvas::finish`].
pub struct PdfCanvas<'a> {
    pdf: Pdf,
    fonts: &'a FontRegistry,
    next_id: i32,
    catalog_id: Ref,
    pages_id: Ref,
    page_width: f32,
    page_height: f32,
    compression_level: u8,
    title: Option<String>,
    pages: Vec<PageRefs>,
    current: Option<Content>,
    font_uses: HashMap<FontStyle, FontUse>,
    /// Image key → (resource name, XObject ref).
    xobjects: HashMap<u64, (String, Ref)>,
    image_order: Vec<u64>,
    started: Instant,
    image_time: Duration,
}

impl<'a> PdfCanvas<'a> {
    pub fn new(fonts: &'a FontRegistry, page_width: f32, page_height: f32, compression_level: u8) -> Self {
        let mut canvas = Self {
            pdf: Pdf::new(),
            fonts,
            next_id: 1,
            catalog_id: Ref::new(1),
            pages_id: Ref::new(1),
            page_width,
            page_height,
            compression_level,
            title: None,
            pages: Vec::new(),
            current: None,
            font_uses: HashMap::new(),
            xobjects: HashMap::new(),
            image_order: Vec::new(),
            started: Instant::now(),
            image_time: Duration::ZERO,
        };
        canvas.catalog_id = canvas.alloc();
        canvas.pages_id = canvas.alloc();
        for style in STYLES {
            let font_ref = canvas.alloc();
            canvas.font_uses.insert(
                style,
                FontUse {
                    font_ref,
                    remapper: subsetter::GlyphRemapper::new(),
                    used: BTreeMap::new(),
                },
            );
        }
        canvas
    }

    /// Title recorded in the document information dictionary.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    fn alloc(&mut self) -> Ref {
        let r = Ref::new(self.next_id);
        self.next_id += 1;
        r
    }

    fn content(&mut self) -> &mut Content {
        if self.current.is_none() {
            self.begin_page();
        }
        self.current.get_or_insert_with(Content::new)
    }

    fn flush_page(&mut self) {
        let Some(content) = self.current.take() else {
            return;
        };
        let Some(refs) = self.pages.last() else {
            return;
        };
        let content_id = refs.content;
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), self.compression_level);
        self.pdf
            .stream(content_id, &compressed)
            .filter(Filter::FlateDecode);
    }

    fn encode_text(&mut self, style: FontStyle, text: &str) -> Vec<u8> {
        let registry = self.fonts;
        match registry.face(style) {
            FontFace::Builtin { .. } => fonts::to_winansi_bytes(text),
            FontFace::TrueType(face) => match self.font_uses.get_mut(&style) {
                Some(font_use) => face.encode(text, &mut font_use.remapper, &mut font_use.used),
                None => Vec::new(),
            },
        }
    }

    fn xobject_name(&mut self, image: &RasterImage) -> String {
        if let Some((name, _)) = self.xobjects.get(&image.key) {
            return name.clone();
        }
        let t0 = Instant::now();
        let next_id = &mut self.next_id;
        let mut alloc = || {
            let r = Ref::new(*next_id);
            *next_id += 1;
            r
        };
        let xobj_ref = images::write_image(&mut self.pdf, image, &mut alloc);
        let name = format!("Im{}", self.xobjects.len() + 1);
        self.xobjects.insert(image.key, (name.clone(), xobj_ref));
        self.image_order.push(image.key);
        self.image_time += t0.elapsed();
        name
    }

    /// Write fonts, the page tree and the trailer, and return the file bytes.
    pub fn finish(mut self) -> Vec<u8> {
        if self.pages.is_empty() {
            self.begin_page();
        }
        self.flush_page();
        let t_pages = self.started.elapsed();

        let next_id = &mut self.next_id;
        let mut alloc = || {
            let r = Ref::new(*next_id);
            *next_id += 1;
            r
        };
        let registry = self.fonts;
        let mut font_pairs = Vec::new();
        for style in STYLES {
            let Some(font_use) = self.font_uses.get(&style) else {
                continue;
            };
            match registry.face(style) {
                FontFace::Builtin { base_font, .. } => {
                    fonts::embed_builtin(&mut self.pdf, font_use.font_ref, base_font);
                }
                FontFace::TrueType(face) => {
                    let embedded = fonts::embed_truetype(
                        &mut self.pdf,
                        font_use.font_ref,
                        face,
                        &font_use.remapper,
                        &font_use.used,
                        &mut alloc,
                    );
                    if embedded.is_none() {
                        log::warn!("Failed to embed font {}", face.family);
                    }
                }
            }
            font_pairs.push((font_resource(style), font_use.font_ref));
        }
        let info_id = alloc();
        let t_fonts = self.started.elapsed();

        let image_pairs: Vec<(String, Ref)> = self
            .image_order
            .iter()
            .filter_map(|key| self.xobjects.get(key).cloned())
            .collect();

        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.pdf
            .pages(self.pages_id)
            .kids(self.pages.iter().map(|p| p.page))
            .count(self.pages.len() as i32);

        for refs in &self.pages {
            let mut page = self.pdf.page(refs.page);
            page.media_box(Rect::new(0.0, 0.0, self.page_width, self.page_height))
                .parent(self.pages_id)
                .contents(refs.content);
            let mut resources = page.resources();
            {
                let mut fonts = resources.fonts();
                for (name, font_ref) in &font_pairs {
                    fonts.pair(Name(name), *font_ref);
                }
            }
            if !image_pairs.is_empty() {
                let mut xobjects = resources.x_objects();
                for (name, xobj_ref) in &image_pairs {
                    xobjects.pair(Name(name.as_bytes()), *xobj_ref);
                }
            }
        }

        let now = Local::now();
        let created = Date::new(now.year().clamp(0, 9999) as u16)
            .month(now.month() as u8)
            .day(now.day() as u8)
            .hour(now.hour() as u8)
            .minute(now.minute() as u8)
            .second(now.second() as u8);
        {
            let mut info = self.pdf.document_info(info_id);
            if let Some(title) = &self.title {
                info.title(TextStr(title));
            }
            info.creator(TextStr(concat!("curriculum-pdf ", env!("CARGO_PKG_VERSION"))));
            info.creation_date(created);
        }

        log::info!(
            "PDF phases: pages={:.1}ms (images {:.1}ms), fonts={:.1}ms, assembly={:.1}ms; {} pages, {} images",
            t_pages.as_secs_f64() * 1000.0,
            self.image_time.as_secs_f64() * 1000.0,
            (t_fonts - t_pages).as_secs_f64() * 1000.0,
            (self.started.elapsed() - t_fonts).as_secs_f64() * 1000.0,
            self.pages.len(),
            self.image_order.len(),
        );

        self.pdf.finish()
    }
}

impl Canvas for PdfCanvas<'_> {
    fn begin_page(&mut self) {
        self.flush_page();
        let page = self.alloc();
        let content = self.alloc();
        self.pages.push(PageRefs { page, content });
        self.current = Some(Content::new());
    }

    fn fill_rect(&mut self, frame: Frame, color: Rgb) {
        let (r, g, b) = color.unit();
        let content = self.content();
        content.save_state();
        content.set_fill_rgb(r, g, b);
        content.rect(frame.x, frame.y, frame.w, frame.h);
        content.fill_nonzero();
        content.restore_state();
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb) {
        let (r, g, b) = color.unit();
        let content = self.content();
        content.save_state();
        content.set_stroke_rgb(r, g, b);
        content.set_line_width(width);
        content.move_to(from.0, from.1);
        content.line_to(to.0, to.1);
        content.stroke();
        content.restore_state();
    }

    fn text(&mut self, x: f32, y: f32, text: &str, style: FontStyle, size: f32, color: Rgb) {
        if text.is_empty() {
            return;
        }
        let bytes = self.encode_text(style, text);
        let (r, g, b) = color.unit();
        let content = self.content();
        content.set_fill_rgb(r, g, b);
        content.begin_text();
        content.set_font(Name(font_resource(style)), size);
        content.next_line(x, y);
        content.show(Str(&bytes));
        content.end_text();
    }

    fn image(&mut self, image: &RasterImage, frame: Frame, clip: Option<Circle>) {
        if frame.w <= 0.0 || frame.h <= 0.0 {
            return;
        }
        let name = self.xobject_name(image);
        let content = self.content();
        content.save_state();
        if let Some(c) = clip {
            let k = c.r * KAPPA;
            content.move_to(c.cx + c.r, c.cy);
            content.cubic_to(c.cx + c.r, c.cy + k, c.cx + k, c.cy + c.r, c.cx, c.cy + c.r);
            content.cubic_to(c.cx - k, c.cy + c.r, c.cx - c.r, c.cy + k, c.cx - c.r, c.cy);
            content.cubic_to(c.cx - c.r, c.cy - k, c.cx - k, c.cy - c.r, c.cx, c.cy - c.r);
            content.cubic_to(c.cx + k, c.cy - c.r, c.cx + c.r, c.cy - k, c.cx + c.r, c.cy);
            content.close_path();
            content.clip_nonzero();
            content.end_path();
        }
        content.transform([frame.w, 0.0, 0.0, frame.h, frame.x, frame.y]);
        content.x_object(Name(name.as_bytes()));
        content.restore_state();
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }
}
