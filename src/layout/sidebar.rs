use super::{CM, Geometry, NAVY, SIDEBAR_LABEL, SIDEBAR_RULE, WHITE, wrap_clamped, wrap_text};
use crate::canvas::{Canvas, Circle, Frame};
use crate::fonts::{FontRegistry, FontStyle};
use crate::model::Profile;
use crate::raster::{RasterImage, cover_centered};

/// Sidebar text stops once the column gets this low.
const DETAILS_FLOOR: f32 = 1.6 * CM;

/// Identity block repeated on every content page.
#[derive(Clone, Debug, Default)]
pub struct Sidebar {
    pub name: String,
    pub summary: Option<String>,
    /// Personal details with empty values already removed.
    pub details: Vec<(&'static str, String)>,
    pub photo: Option<RasterImage>,
}

impl Sidebar {
    pub fn from_profile(profile: &Profile, photo: Option<RasterImage>) -> Self {
        let details = profile
            .detail_pairs()
            .into_iter()
            .filter_map(|(label, value)| {
                let value = value?;
                let value = value.trim();
                (!value.is_empty()).then(|| (label, value.to_string()))
            })
            .collect();
        Self {
            name: profile.display_name(),
            summary: profile
                .summary
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            details,
            photo,
        }
    }
}

pub(super) fn draw<C: Canvas + ?Sized>(
    canvas: &mut C,
    fonts: &FontRegistry,
    g: &Geometry,
    sidebar: &Sidebar,
) {
    canvas.fill_rect(Frame::new(0.0, 0.0, g.sidebar_total(), g.height), NAVY);

    let x = g.margin;
    let column_w = g.sidebar_w - 0.2 * CM;
    let top_y = g.height - g.margin - 0.4 * CM;

    if let Some(photo) = &sidebar.photo {
        let clip = Circle {
            cx: g.margin + 2.0 * CM,
            cy: top_y - 1.85 * CM,
            r: 1.55 * CM,
        };
        let side = clip.r * 2.0;
        let (dx, dy, w, h) = cover_centered(photo.aspect(), side, side);
        let frame = Frame::new(clip.cx - clip.r + dx, clip.cy - clip.r + dy, w, h);
        canvas.image(photo, frame, Some(clip));
    }

    let name = wrap_clamped(fonts, FontStyle::Bold, 14.2, column_w, &sidebar.name, 1);
    if let Some(name) = name.first() {
        canvas.text(x, top_y - 4.05 * CM, name, FontStyle::Bold, 14.2, WHITE);
    }

    let mut y_details = top_y - 5.9 * CM;
    if let Some(summary) = &sidebar.summary {
        let mut y = top_y - 4.65 * CM;
        for line in wrap_text(fonts, FontStyle::Regular, 9.6, column_w, summary) {
            if y < DETAILS_FLOOR {
                break;
            }
            if !line.is_empty() {
                canvas.text(x, y, &line, FontStyle::Regular, 9.6, SIDEBAR_LABEL);
            }
            y -= 12.0;
        }
        // A long summary pushes the details block down rather than under it.
        y_details = y_details.min(y - 0.45 * CM);
    }

    if y_details < DETAILS_FLOOR {
        log::debug!("Sidebar summary fills the column, no room for details");
        return;
    }

    let rule_y = y_details + 0.45 * CM;
    canvas.line((x, rule_y), (x + column_w, rule_y), 1.0, SIDEBAR_RULE);
    canvas.text(x, y_details, "DATOS PERSONALES", FontStyle::Bold, 10.0, SIDEBAR_LABEL);
    let mut y = y_details - 0.65 * CM;

    for (label, value) in &sidebar.details {
        // A label is only drawn when its first value line fits too.
        if y - 0.35 * CM < DETAILS_FLOOR {
            log::debug!("Sidebar full, dropping details from {label}");
            return;
        }
        canvas.text(x, y, &format!("{label}:"), FontStyle::Bold, 9.1, SIDEBAR_LABEL);
        y -= 0.35 * CM;
        for line in wrap_text(fonts, FontStyle::Regular, 9.5, column_w, value) {
            if y < DETAILS_FLOOR {
                log::debug!("Sidebar full, cutting {label}");
                return;
            }
            if !line.is_empty() {
                canvas.text(x, y, &line, FontStyle::Regular, 9.5, WHITE);
            }
            y -= 11.5;
        }
        y -= 0.2 * CM;
    }
}
