use std::hash::{DefaultHasher, Hash, Hasher};

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RasterFilter {
    /// JPEG bytes embedded untouched.
    Dct,
    Flate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RasterColor {
    Gray,
    Rgb,
}

/// An image decoded and re-encoded into a form a PDF image XObject takes
/// directly.
#[derive(Clone)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Hash of the source bytes; identical sources share one XObject.
    pub key: u64,
    pub(crate) filter: RasterFilter,
    pub(crate) color: RasterColor,
    pub(crate) data: Vec<u8>,
    /// Flate-compressed 8-bit soft mask, when any pixel is translucent.
    pub(crate) alpha: Option<Vec<u8>>,
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("filter", &self.filter)
            .field("color", &self.color)
            .field("bytes", &self.data.len())
            .field("alpha", &self.alpha.is_some())
            .finish()
    }
}

impl RasterImage {
    /// Decode `bytes`. `content_type` is only a hint; the sniffed format wins.
    pub fn decode(name: &str, bytes: &[u8], content_type: &str, level: u8) -> Result<Self, Error> {
        let unreadable = |reason: String| Error::AssetUnreadable {
            name: name.to_string(),
            reason,
        };
        let format = image::guess_format(bytes)
            .map_err(|e| unreadable(format!("{e} (declared {content_type})")))?;
        let decoded = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| unreadable(e.to_string()))?;
        let (width, height) = (decoded.width(), decoded.height());
        if width == 0 || height == 0 {
            return Err(unreadable("empty image".to_string()));
        }

        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        let key = hasher.finish();

        if format == image::ImageFormat::Jpeg {
            let color = match jpeg_components(bytes) {
                Some(1) => Some(RasterColor::Gray),
                Some(3) => Some(RasterColor::Rgb),
                _ => None,
            };
            if let Some(color) = color {
                return Ok(Self {
                    width,
                    height,
                    key,
                    filter: RasterFilter::Dct,
                    color,
                    data: bytes.to_vec(),
                    alpha: None,
                });
            }
        }

        let rgba = decoded.to_rgba8();
        let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);
        let rgb_data: Vec<u8> = rgba
            .pixels()
            .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
            .collect();
        let alpha = has_alpha.then(|| {
            let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
            miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, level)
        });

        Ok(Self {
            width,
            height,
            key,
            filter: RasterFilter::Flate,
            color: RasterColor::Rgb,
            data: miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, level),
            alpha,
        })
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Component count from the first start-of-frame marker. CMYK and other
/// layouts are re-encoded instead of passed through.
fn jpeg_components(bytes: &[u8]) -> Option<u8> {
    if bytes.get(0..2)? != [0xFF, 0xD8] {
        return None;
    }
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        let len = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            // length(2) precision(1) height(2) width(2) components(1)
            return bytes.get(pos + 9).copied();
        }
        if marker == 0xDA {
            return None;
        }
        pos += 2 + len;
    }
    None
}

/// Fit a `w`×`h` box of the image's aspect ratio inside `frame_w`×`frame_h`,
/// centred. Returns (x offset, y offset, width, height).
pub fn fit_centered(aspect: f32, frame_w: f32, frame_h: f32) -> (f32, f32, f32, f32) {
    if frame_w <= 0.0 || frame_h <= 0.0 || !aspect.is_finite() || aspect <= 0.0 {
        return (0.0, 0.0, 0.0, 0.0);
    }
    let (w, h) = if frame_w / frame_h > aspect {
        (frame_h * aspect, frame_h)
    } else {
        (frame_w, frame_w / aspect)
    };
    ((frame_w - w) / 2.0, (frame_h - h) / 2.0, w, h)
}

/// Smallest box of the image's aspect ratio that covers `frame_w`×`frame_h`,
/// centred (overflows the frame on one axis).
pub fn cover_centered(aspect: f32, frame_w: f32, frame_h: f32) -> (f32, f32, f32, f32) {
    if frame_w <= 0.0 || frame_h <= 0.0 || !aspect.is_finite() || aspect <= 0.0 {
        return (0.0, 0.0, 0.0, 0.0);
    }
    let (w, h) = if frame_w / frame_h > aspect {
        (frame_w, frame_w / aspect)
    } else {
        (frame_h * aspect, frame_h)
    };
    ((frame_w - w) / 2.0, (frame_h - h) / 2.0, w, h)
}
