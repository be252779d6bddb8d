use super::{CM, MUTED, NAVY_DARK, PageFlow, WHITE, wrap_clamped};
use crate::assets::ImageEntry;
use crate::canvas::{Canvas, Frame};
use crate::fonts::FontStyle;
use crate::raster::{RasterImage, fit_centered};

pub const GALLERY_COLUMNS: usize = 2;
pub const GALLERY_ROWS: usize = 3;
const CAPTION_SIZE: f32 = 9.0;
const CAPTION_LEAD: f32 = 11.0;
const CAPTION_LINES: usize = 2;

impl<C: Canvas + ?Sized> PageFlow<'_, C> {
    fn bar_height(&self) -> f32 {
        2.0 * CM
    }

    /// New page without sidebar, topped by a full-width header bar. The
    /// title is kept to one line within the page margins.
    fn header_page(&mut self, title: &str, size: f32) {
        let g = self.geometry;
        self.canvas.begin_page();
        let bar = self.bar_height();
        self.canvas
            .fill_rect(Frame::new(0.0, g.height - bar, g.width, bar), NAVY_DARK);
        let title = wrap_clamped(self.fonts, FontStyle::Bold, size, g.width - 2.0 * g.margin, title, 1);
        if let Some(line) = title.first() {
            self.canvas
                .text(g.margin, g.height - 1.3 * CM, line, FontStyle::Bold, size, WHITE);
        }
    }

    /// Area below the header bar, inside the page margins.
    fn plate_body(&self) -> Frame {
        let g = self.geometry;
        let top = g.height - self.bar_height() - g.margin;
        Frame::new(g.margin, g.margin, g.width - 2.0 * g.margin, top - g.margin)
    }

    /// One certificate on its own page. Without an image only the header
    /// bar is drawn.
    pub fn draw_plate(&mut self, entry: &ImageEntry, image: Option<&RasterImage>) {
        self.header_page(&format!("{} | {}", entry.section, entry.label), 13.5);
        if let Some(image) = image {
            let body = self.plate_body();
            let (dx, dy, w, h) = fit_centered(image.aspect(), body.w, body.h);
            self.canvas
                .image(image, Frame::new(body.x + dx, body.y + dy, w, h), None);
        }
    }

    /// Certificate plates in list order. `load` is called for each entry
    /// right before its page is drawn.
    pub fn draw_plates(
        &mut self,
        entries: &[ImageEntry],
        mut load: impl FnMut(&ImageEntry) -> Option<RasterImage>,
    ) {
        for entry in entries {
            let image = load(entry);
            self.draw_plate(entry, image.as_ref());
        }
    }

    /// Paginated grid of the gallery images. The first page carries the
    /// "Imágenes" divider header, later ones a continuation header. Nothing
    /// is drawn for an empty list.
    pub fn draw_gallery(
        &mut self,
        entries: &[ImageEntry],
        mut load: impl FnMut(&ImageEntry) -> Option<RasterImage>,
    ) {
        if entries.is_empty() {
            return;
        }
        let body = self.plate_body();
        let gap = 0.6 * CM;
        let cell_w = (body.w - gap * (GALLERY_COLUMNS - 1) as f32) / GALLERY_COLUMNS as f32;
        let cell_h = (body.h - gap * (GALLERY_ROWS - 1) as f32) / GALLERY_ROWS as f32;
        let caption_h = CAPTION_LEAD * CAPTION_LINES as f32 + 4.0;
        let per_page = GALLERY_COLUMNS * GALLERY_ROWS;

        for (page, chunk) in entries.chunks(per_page).enumerate() {
            if page == 0 {
                self.header_page("Imágenes", 16.0);
            } else {
                self.header_page("Imágenes (continuación)", 13.5);
            }
            log::debug!("Gallery page {} with {} image(s)", page + 1, chunk.len());
            for (slot, entry) in chunk.iter().enumerate() {
                let (col, row) = (slot % GALLERY_COLUMNS, slot / GALLERY_COLUMNS);
                let cell = Frame::new(
                    body.x + col as f32 * (cell_w + gap),
                    body.top() - (row + 1) as f32 * cell_h - row as f32 * gap,
                    cell_w,
                    cell_h,
                );
                self.draw_gallery_cell(cell, caption_h, entry, load(entry).as_ref());
            }
        }
    }

    fn draw_gallery_cell(
        &mut self,
        cell: Frame,
        caption_h: f32,
        entry: &ImageEntry,
        image: Option<&RasterImage>,
    ) {
        if let Some(image) = image {
            let (dx, dy, w, h) = fit_centered(image.aspect(), cell.w, cell.h - caption_h);
            self.canvas.image(
                image,
                Frame::new(cell.x + dx, cell.y + caption_h + dy, w, h),
                None,
            );
        }
        let lines = wrap_clamped(
            self.fonts,
            FontStyle::Regular,
            CAPTION_SIZE,
            cell.w,
            &entry.label,
            CAPTION_LINES,
        );
        let mut y = cell.y + caption_h - CAPTION_SIZE - 2.0;
        for line in lines.iter().filter(|l| !l.is_empty()) {
            self.canvas
                .text(cell.x, y, line, FontStyle::Regular, CAPTION_SIZE, MUTED);
            y -= CAPTION_LEAD;
        }
    }
}
