use crate::fonts::FontStyle;
use crate::raster::RasterImage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn hex(value: u32) -> Self {
        Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    pub(crate) fn unit(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

/// Axis-aligned box in points, origin bottom-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Frame {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn top(&self) -> f32 {
        self.y + self.h
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
}

/// Drawing surface the layout engine writes to. Pages are appended in
/// order; every draw goes to the most recently begun page.
pub trait Canvas {
    fn begin_page(&mut self);

    fn fill_rect(&mut self, frame: Frame, color: Rgb);

    fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb);

    /// Single line of text with its baseline starting at (`x`, `y`).
    fn text(&mut self, x: f32, y: f32, text: &str, style: FontStyle, size: f32, color: Rgb);

    /// Place `image` stretched over `frame`, optionally clipped to `clip`.
    fn image(&mut self, image: &RasterImage, frame: Frame, clip: Option<Circle>);

    fn page_count(&self) -> usize;
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Rect {
        frame: Frame,
        color: Rgb,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgb,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        style: FontStyle,
        size: f32,
        color: Rgb,
    },
    Image {
        key: u64,
        frame: Frame,
        clipped: bool,
    },
}

/// Canvas that keeps every operation in memory, one list per page.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pages: Vec<Vec<DrawOp>>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[Vec<DrawOp>] {
        &self.pages
    }

    /// Every text run as (page index, text), in drawing order.
    pub fn texts(&self) -> Vec<(usize, &str)> {
        self.pages
            .iter()
            .enumerate()
            .flat_map(|(page, ops)| {
                ops.iter().filter_map(move |op| match op {
                    DrawOp::Text { text, .. } => Some((page, text.as_str())),
                    _ => None,
                })
            })
            .collect()
    }

    pub fn page_texts(&self, page: usize) -> Vec<&str> {
        self.texts()
            .into_iter()
            .filter(|(p, _)| *p == page)
            .map(|(_, t)| t)
            .collect()
    }

    /// First page on which `needle` appears as a whole text run.
    pub fn page_of(&self, needle: &str) -> Option<usize> {
        self.texts()
            .into_iter()
            .find(|(_, t)| *t == needle)
            .map(|(p, _)| p)
    }

    pub fn images(&self) -> Vec<(usize, Frame, bool)> {
        self.pages
            .iter()
            .enumerate()
            .flat_map(|(page, ops)| {
                ops.iter().filter_map(move |op| match op {
                    DrawOp::Image { frame, clipped, .. } => Some((page, *frame, *clipped)),
                    _ => None,
                })
            })
            .collect()
    }

    fn push(&mut self, op: DrawOp) {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        if let Some(page) = self.pages.last_mut() {
            page.push(op);
        }
    }
}

impl Canvas for RecordingCanvas {
    fn begin_page(&mut self) {
        self.pages.push(Vec::new());
    }

    fn fill_rect(&mut self, frame: Frame, color: Rgb) {
        self.push(DrawOp::Rect { frame, color });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb) {
        self.push(DrawOp::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn text(&mut self, x: f32, y: f32, text: &str, style: FontStyle, size: f32, color: Rgb) {
        self.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            style,
            size,
            color,
        });
    }

    fn image(&mut self, image: &RasterImage, frame: Frame, clip: Option<Circle>) {
        self.push(DrawOp::Image {
            key: image.key,
            frame,
            clipped: clip.is_some(),
        });
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }
}
