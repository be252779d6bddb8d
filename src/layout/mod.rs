mod plates;
mod sidebar;
mod wrap;

use crate::canvas::{Canvas, Rgb};
use crate::fonts::{FontRegistry, FontStyle};
use crate::model::Card;

pub use plates::{GALLERY_COLUMNS, GALLERY_ROWS};
pub use sidebar::Sidebar;
pub use wrap::{wrap_clamped, wrap_text};

/// Points per centimetre.
pub const CM: f32 = 28.346_457;

pub const NAVY: Rgb = Rgb::hex(0x0b2a57);
pub const NAVY_DARK: Rgb = Rgb::hex(0x0a2347);
pub const TEXT: Rgb = Rgb::hex(0x0f172a);
pub const MUTED: Rgb = Rgb::hex(0x475569);
pub const BORDER: Rgb = Rgb::hex(0xdbe4f5);
pub const SIDEBAR_RULE: Rgb = Rgb::hex(0x2a4a7d);
pub const SIDEBAR_LABEL: Rgb = Rgb::hex(0xd7e6ff);
pub const WHITE: Rgb = Rgb::hex(0xffffff);

/// Leading of wrapped card values and notes.
pub const LEAD: f32 = 12.5;
/// A card starting below this height begins on a new page.
pub const CARD_BREAK: f32 = 4.0 * CM;
/// A section moves its next card to a new page (repeating its title) below
/// this height.
pub const ITEM_BREAK: f32 = 3.2 * CM;
/// No card line is drawn below this height.
pub const LINE_FLOOR: f32 = 2.2 * CM;

const TITLE_SIZE: f32 = 11.6;
const TITLE_LEAD: f32 = 14.0;
/// Card titles wrap onto at most this many lines, then end in an ellipsis.
const TITLE_LINES: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub sidebar_w: f32,
    pub gap: f32,
}

impl Geometry {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            margin: 1.2 * CM,
            sidebar_w: 5.7 * CM,
            gap: 0.8 * CM,
        }
    }

    /// Width of the navy sidebar band, from the left page edge.
    pub fn sidebar_total(&self) -> f32 {
        self.margin + self.sidebar_w + self.gap / 2.0
    }

    pub fn content_x(&self) -> f32 {
        self.margin + self.sidebar_w + self.gap
    }

    pub fn content_w(&self) -> f32 {
        self.width - self.content_x() - self.margin
    }

    /// Cursor height at the top of a fresh content column.
    pub fn content_top(&self) -> f32 {
        self.height - self.margin - 0.6 * CM
    }
}

/// Vertical position in the content column and the page it refers to.
/// Every draw operation takes one and returns the next.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cursor {
    pub y: f32,
    pub page: usize,
    /// The page carries the identity sidebar.
    pub sidebar: bool,
}

impl Cursor {
    pub fn down(self, by: f32) -> Self {
        Cursor { y: self.y - by, ..self }
    }
}

/// Sidebar pages with a content column, followed by sidebar-less image
/// pages. Holds no position of its own; callers thread a [`Cursor`].
pub struct PageFlow<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
    fonts: &'a FontRegistry,
    geometry: Geometry,
    sidebar: Sidebar,
}

impl<'a, C: Canvas + ?Sized> PageFlow<'a, C> {
    pub fn new(canvas: &'a mut C, fonts: &'a FontRegistry, geometry: Geometry, sidebar: Sidebar) -> Self {
        Self {
            canvas,
            fonts,
            geometry,
            sidebar,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// First page: sidebar drawn, cursor at the top of the content column.
    pub fn begin_document(&mut self) -> Cursor {
        self.sidebar_page()
    }

    /// Start a new page that repeats the full sidebar.
    pub fn page_break(&mut self) -> Cursor {
        let cursor = self.sidebar_page();
        log::debug!("Page break, now on page {}", cursor.page + 1);
        cursor
    }

    fn sidebar_page(&mut self) -> Cursor {
        self.canvas.begin_page();
        sidebar::draw(&mut *self.canvas, self.fonts, &self.geometry, &self.sidebar);
        Cursor {
            y: self.geometry.content_top(),
            page: self.canvas.page_count().saturating_sub(1),
            sidebar: true,
        }
    }

    /// Heading plus a full-width rule. Breaks first when the cursor is too
    /// low for a heading and a card.
    pub fn draw_section_title(&mut self, cursor: Cursor, title: &str) -> Cursor {
        let cursor = if cursor.y < CARD_BREAK {
            self.page_break()
        } else {
            cursor
        };
        let g = self.geometry;
        self.canvas
            .text(g.content_x(), cursor.y, title, FontStyle::Bold, 13.8, TEXT);
        let rule_y = cursor.y - 0.25 * CM;
        self.canvas.line(
            (g.content_x(), rule_y),
            (g.content_x() + g.content_w(), rule_y),
            1.0,
            BORDER,
        );
        cursor.down(0.85 * CM)
    }

    /// Move `yy` to a fresh page when a line drawn there would fall below
    /// [`LINE_FLOOR`].
    fn ensure_line(&mut self, cursor: &mut Cursor, yy: f32) -> f32 {
        if yy >= LINE_FLOOR {
            return yy;
        }
        *cursor = self.page_break();
        cursor.y - 0.9 * CM
    }

    fn draw_lines(&mut self, cursor: &mut Cursor, mut yy: f32, x: f32, lines: &[String]) -> f32 {
        for line in lines {
            yy = self.ensure_line(cursor, yy);
            if !line.is_empty() {
                self.canvas
                    .text(x, yy, line, FontStyle::Regular, 9.8, MUTED);
            }
            yy -= LEAD;
        }
        yy
    }

    /// Title, label/value rows and optional notes, closed by a divider.
    /// An empty card draws nothing and returns `cursor` as is.
    pub fn draw_card(&mut self, cursor: Cursor, card: &Card) -> Cursor {
        if card.is_empty() {
            return cursor;
        }
        let mut cursor = if cursor.y < CARD_BREAK {
            self.page_break()
        } else {
            cursor
        };
        let g = self.geometry;
        let x = g.content_x();
        let label_w = 3.25 * CM;

        let title = wrap_clamped(
            self.fonts,
            FontStyle::Bold,
            TITLE_SIZE,
            g.content_w(),
            &card.title,
            TITLE_LINES,
        );
        let mut title_y = cursor.y - 0.2 * CM;
        for line in &title {
            self.canvas
                .text(x, title_y, line, FontStyle::Bold, TITLE_SIZE, NAVY_DARK);
            title_y -= TITLE_LEAD;
        }

        let extra_title_lines = title.len().saturating_sub(1) as f32;
        let mut yy = cursor.y - 0.75 * CM - extra_title_lines * TITLE_LEAD;
        for (label, value) in &card.pairs {
            let lines = wrap_text(self.fonts, FontStyle::Regular, 9.8, g.content_w() - label_w, value);
            yy = self.ensure_line(&mut cursor, yy);
            self.canvas
                .text(x, yy, &format!("{label}:"), FontStyle::Bold, 9.8, TEXT);
            yy = self.draw_lines(&mut cursor, yy, x + label_w, &lines);
            yy -= 2.0;
        }

        if let Some(notes) = &card.notes {
            yy -= 6.0;
            yy = self.ensure_line(&mut cursor, yy);
            self.canvas
                .text(x, yy, "Descripción:", FontStyle::Bold, 9.8, TEXT);
            yy -= LEAD;
            let lines = wrap_text(self.fonts, FontStyle::Regular, 9.8, g.content_w(), notes);
            yy = self.draw_lines(&mut cursor, yy, x, &lines);
        }

        yy -= 0.25 * CM;
        self.canvas
            .line((x, yy), (x + g.content_w(), yy), 0.7, BORDER);
        Cursor {
            y: yy - 0.45 * CM,
            ..cursor
        }
    }

    /// Titled run of cards. Nothing is drawn for an empty section.
    pub fn draw_section(&mut self, cursor: Cursor, title: &str, cards: &[Card]) -> Cursor {
        if cards.is_empty() {
            return cursor;
        }
        let mut cursor = self.draw_section_title(cursor, title);
        for card in cards {
            if cursor.y < ITEM_BREAK {
                cursor = self.page_break();
                cursor = self.draw_section_title(cursor, title);
            }
            cursor = self.draw_card(cursor, card).down(0.10 * CM);
        }
        cursor.down(0.25 * CM)
    }

    /// "Perfil profesional" block carrying the profile summary.
    pub fn draw_summary(&mut self, cursor: Cursor, summary: &str) -> Cursor {
        let card = Card::new("Resumen", Vec::new(), Some(summary));
        if card.is_empty() {
            return cursor;
        }
        let cursor = self.draw_section_title(cursor, "Perfil profesional");
        self.draw_card(cursor, &card).down(0.2 * CM)
    }

    pub fn page_count(&self) -> usize {
        self.canvas.page_count()
    }
}
