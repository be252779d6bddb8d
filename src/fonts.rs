use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use memmap2::Mmap;
use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::config::FontConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// A face from a TrueType/OpenType file, measured with its own advances.
pub struct TrueTypeFace {
    pub(crate) family: String,
    pub(crate) data: Arc<Vec<u8>>,
    pub(crate) index: u32,
    widths_1000: HashMap<char, f32>,
    units_per_em: f32,
}

impl TrueTypeFace {
    fn load(family: &str, path: &Path, index: u32) -> Option<Self> {
        let data = std::fs::read(path).ok()?;
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em() as f32;

        // Latin ranges plus the WinAnsi extras cover everything a Spanish CV
        // prints; anything else is measured on demand.
        let mut widths_1000 = HashMap::new();
        let common = (0x20u32..=0x24F)
            .filter_map(char::from_u32)
            .chain((0x80u8..=0x9F).map(winansi_to_char));
        for ch in common {
            if let Some(w) = advance_1000(&face, ch, units_per_em) {
                widths_1000.insert(ch, w);
            }
        }

        Some(Self {
            family: family.to_string(),
            data: Arc::new(data),
            index,
            widths_1000,
            units_per_em,
        })
    }

    pub(crate) fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, self.index).ok()
    }

    fn char_width_1000(&self, ch: char) -> f32 {
        if let Some(&w) = self.widths_1000.get(&ch) {
            return w;
        }
        self.face()
            .and_then(|face| advance_1000(&face, ch, self.units_per_em))
            .unwrap_or(0.0)
    }

    /// Encode text as big-endian subset glyph ids, growing the remapper and
    /// the used-glyph table as new characters appear.
    pub(crate) fn encode(
        &self,
        text: &str,
        remapper: &mut subsetter::GlyphRemapper,
        used: &mut BTreeMap<u16, char>,
    ) -> Vec<u8> {
        let Some(face) = self.face() else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(text.len() * 2);
        for ch in text.chars() {
            let new_gid = match face.glyph_index(ch) {
                Some(gid) => {
                    let new_gid = remapper.remap(gid.0);
                    used.entry(new_gid).or_insert(ch);
                    new_gid
                }
                None => 0,
            };
            out.push((new_gid >> 8) as u8);
            out.push((new_gid & 0xFF) as u8);
        }
        out
    }
}

fn advance_1000(face: &Face, ch: char, units_per_em: f32) -> Option<f32> {
    face.glyph_index(ch)
        .and_then(|gid| face.glyph_hor_advance(gid))
        .map(|adv| adv as f32 / units_per_em * 1000.0)
}

pub enum FontFace {
    /// One of the 14 standard PDF fonts, WinAnsi encoded.
    Builtin {
        base_font: &'static str,
        widths_1000: &'static [u16; 95],
    },
    TrueType(TrueTypeFace),
}

impl FontFace {
    fn helvetica(style: FontStyle) -> Self {
        match style {
            FontStyle::Regular => FontFace::Builtin {
                base_font: "Helvetica",
                widths_1000: &HELVETICA_WIDTHS,
            },
            FontStyle::Bold => FontFace::Builtin {
                base_font: "Helvetica-Bold",
                widths_1000: &HELVETICA_BOLD_WIDTHS,
            },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FontFace::Builtin { base_font, .. } => base_font,
            FontFace::TrueType(face) => &face.family,
        }
    }

    pub(crate) fn char_width_1000(&self, ch: char) -> f32 {
        match self {
            FontFace::Builtin {
                base_font,
                widths_1000,
            } => builtin_char_width(widths_1000, *base_font == "Helvetica-Bold", ch),
            FontFace::TrueType(face) => face.char_width_1000(ch),
        }
    }
}

/// Process-wide, read-only pair of faces used for every measurement and
/// every draw in a render.
pub struct FontRegistry {
    regular: FontFace,
    bold: FontFace,
}

impl FontRegistry {
    /// Helvetica / Helvetica-Bold, always available.
    pub fn builtin() -> Self {
        Self {
            regular: FontFace::helvetica(FontStyle::Regular),
            bold: FontFace::helvetica(FontStyle::Bold),
        }
    }

    /// First configured family that has both a regular and a bold face in
    /// the configured directories, otherwise the built-in fallback.
    pub fn resolve(config: &FontConfig) -> Self {
        let t0 = std::time::Instant::now();
        let dirs = font_directories(config);
        if config.families.is_empty() || dirs.is_empty() {
            log::debug!("No font families or directories configured, using Helvetica");
            return Self::builtin();
        }
        let index = scan_font_dirs(dirs);

        for family in &config.families {
            let key = family.to_lowercase();
            let regular = index.get(&(key.clone(), false, false));
            let bold = index.get(&(key.clone(), true, false));
            let (Some((reg_path, reg_idx)), Some((bold_path, bold_idx))) = (regular, bold) else {
                log::debug!("Font family {family} lacks a regular/bold pair");
                continue;
            };
            let loaded = TrueTypeFace::load(family, reg_path, *reg_idx)
                .zip(TrueTypeFace::load(family, bold_path, *bold_idx));
            if let Some((regular, bold)) = loaded {
                log::info!(
                    "Using font family {family} ({:.1}ms)",
                    t0.elapsed().as_secs_f64() * 1000.0
                );
                return Self {
                    regular: FontFace::TrueType(regular),
                    bold: FontFace::TrueType(bold),
                };
            }
            log::warn!("Font family {family} found but could not be parsed");
        }

        log::warn!(
            "None of the font families {:?} found, using Helvetica",
            config.families
        );
        Self::builtin()
    }

    pub fn face(&self, style: FontStyle) -> &FontFace {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
        }
    }

    /// The one measurement function used by wrapping and layout.
    pub fn text_width(&self, style: FontStyle, text: &str, font_size: f32) -> f32 {
        let face = self.face(style);
        text.chars()
            .map(|ch| face.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }
}

static SHARED: OnceLock<Mutex<HashMap<FontConfig, Arc<FontRegistry>>>> = OnceLock::new();

/// Registry for `config`, resolved on first use and reused by every later
/// render with an equal config.
pub fn shared(config: &FontConfig) -> Arc<FontRegistry> {
    let cache = SHARED.get_or_init(Default::default);
    let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(registry) = cache.get(config) {
        return Arc::clone(registry);
    }
    let registry = Arc::new(FontRegistry::resolve(config));
    cache.insert(config.clone(), Arc::clone(&registry));
    registry
}

/// (lowercase family name, bold, italic) -> (file path, face index within TTC)
type FontLookup = HashMap<(String, bool, bool), (PathBuf, u32)>;

fn font_family_name(face: &Face) -> Option<String> {
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

fn read_font_style(data: &[u8], face_index: u32) -> Option<(String, bool, bool)> {
    let face = Face::parse(data, face_index).ok()?;
    let family = font_family_name(&face)?;
    Some((family, face.is_bold(), face.is_italic()))
}

fn font_directories(config: &FontConfig) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = config.dirs.clone();
    if !config.system_dirs {
        return dirs;
    }

    #[cfg(target_os = "macos")]
    {
        dirs.extend([
            "/Library/Fonts".into(),
            "/System/Library/Fonts".into(),
            "/System/Library/Fonts/Supplemental".into(),
        ]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(&home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.extend(["/usr/share/fonts".into(), "/usr/local/share/fonts".into()]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join(".local/share/fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        } else {
            dirs.push("C:\\Windows\\Fonts".into());
        }
    }

    dirs
}

fn is_font_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("ttf" | "otf" | "ttc")
    )
}

fn is_font_collection(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttc"))
}

fn scan_font_dirs(dirs: Vec<PathBuf>) -> FontLookup {
    let t0 = std::time::Instant::now();
    let mut index = FontLookup::new();
    let mut files_scanned = 0u32;
    let mut visited_dirs: HashSet<PathBuf> = HashSet::new();

    let mut stack: Vec<PathBuf> = dirs;
    while let Some(dir) = stack.pop() {
        if !visited_dirs.insert(dir.clone()) {
            continue;
        }
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if !is_font_file(&path) {
                continue;
            }
            files_scanned += 1;
            let Ok(file) = std::fs::File::open(&path) else {
                continue;
            };
            let Ok(data) = (unsafe { Mmap::map(&file) }) else {
                continue;
            };
            let face_count = if is_font_collection(&path) {
                ttf_parser::fonts_in_collection(&data).unwrap_or(1)
            } else {
                1
            };
            for face_idx in 0..face_count {
                if let Some((family, bold, italic)) = read_font_style(&data, face_idx) {
                    index
                        .entry((family.to_lowercase(), bold, italic))
                        .or_insert((path.clone(), face_idx));
                }
            }
        }
    }

    log::info!(
        "Font scan: {:.1}ms, {} dirs, {} files parsed → {} entries",
        t0.elapsed().as_secs_f64() * 1000.0,
        visited_dirs.len(),
        files_scanned,
        index.len(),
    );

    index
}

/// Windows-1252 (WinAnsi) byte to Unicode char mapping.
/// Bytes 0x80-0x9F are remapped; all others map directly to their Unicode codepoint.
fn winansi_to_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}', // bullet
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => byte as char,
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Unmappable characters are dropped, matching their zero measured width.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b >= 0x20)
        .collect()
}

/// Standard AFM advances for Helvetica, chars 32..=126.
static HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// Standard AFM advances for Helvetica-Bold, chars 32..=126.
static HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    333, 333, 584, 584, 584, 611, 975, // :..@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    333, 278, 333, 584, 556, 333, // [..`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a..m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n..z
    389, 280, 389, 584, // {..~
];

fn builtin_char_width(widths: &[u16; 95], bold: bool, ch: char) -> f32 {
    let ascii = |c: char| widths[(c as u32 - 32) as usize] as f32;
    match ch {
        ' '..='~' => ascii(ch),
        // Accented i's use the dotless i advance, wider than 'i' in the regular face.
        'ì' | 'í' | 'î' | 'ï' => 278.0,
        'À'..='Å' => ascii('A'),
        'Ç' => ascii('C'),
        'È'..='Ë' => ascii('E'),
        'Ì'..='Ï' => ascii('I'),
        'Ñ' => ascii('N'),
        'Ò'..='Ö' | 'Ø' => ascii('O'),
        'Ù'..='Ü' => ascii('U'),
        'Ý' => ascii('Y'),
        'à'..='å' => ascii('a'),
        'ç' => ascii('c'),
        'è'..='ë' => ascii('e'),
        'ñ' => ascii('n'),
        'ò'..='ö' | 'ø' => ascii('o'),
        'ù'..='ü' => ascii('u'),
        'ý' | 'ÿ' => ascii('y'),
        '¡' => 333.0,
        '¿' => 611.0,
        '°' => 400.0,
        '·' => 278.0,
        '«' | '»' => 556.0,
        'ª' => 370.0,
        'º' => 365.0,
        'ß' => 611.0,
        'Æ' => 1000.0,
        'æ' => 889.0,
        '\u{2013}' => 556.0,
        '\u{2014}' | '\u{2026}' => 1000.0,
        '\u{2022}' => 350.0,
        '\u{2018}' | '\u{2019}' => if bold { 278.0 } else { 222.0 },
        '\u{201C}' | '\u{201D}' => if bold { 500.0 } else { 333.0 },
        '\u{20AC}' => 556.0,
        _ if char_to_winansi(ch) >= 0x20 => 556.0,
        _ => 0.0,
    }
}

/// Write a standard Type1 font dictionary.
pub(crate) fn embed_builtin(pdf: &mut Pdf, font_ref: Ref, base_font: &str) {
    pdf.type1_font(font_ref)
        .base_font(Name(base_font.as_bytes()))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
}

/// Embed a TrueType/OpenType face as a CIDFont (Type0 composite) with
/// Identity-H encoding, subsetted to the glyphs the remapper collected.
pub(crate) fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    face_data: &TrueTypeFace,
    remapper: &subsetter::GlyphRemapper,
    used: &BTreeMap<u16, char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<()> {
    let face = face_data.face()?;
    let units = face.units_per_em() as f32;
    let ascent = face.ascender() as f32 / units * 1000.0;
    let descent = face.descender() as f32 / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 / units * 1000.0)
        .unwrap_or(700.0);

    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        bb.x_min as f32 / units * 1000.0,
        bb.y_min as f32 / units * 1000.0,
        bb.x_max as f32 / units * 1000.0,
        bb.y_max as f32 / units * 1000.0,
    );

    let subset_data = subsetter::subset(&face_data.data, face_data.index, remapper)
        .unwrap_or_else(|e| {
            log::warn!(
                "Font subsetting failed for {}: {e}; embedding full font",
                face_data.family
            );
            face_data.data.to_vec()
        });

    let descriptor_ref = alloc();
    let data_ref = alloc();
    let cid_font_ref = alloc();
    let tounicode_ref = alloc();

    let data_len = i32::try_from(subset_data.len()).ok()?;
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name = face_data.family.replace(' ', "");
    let ps_name = if face.is_bold() {
        format!("{ps_name}-Bold")
    } else {
        ps_name
    };

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(ascent)
        .descent(descent)
        .cap_height(cap_height)
        .stem_v(if face.is_bold() { 120.0 } else { 80.0 })
        .font_file2(data_ref);

    let system_info = pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info);
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        if !used.is_empty() {
            let mut w = cid.widths();
            for (&gid, &ch) in used {
                w.consecutive(gid, [face_data.char_width_1000(ch)]);
            }
        }
    }

    let cmap_name = format!("{}-UTF16", ps_name);
    let mut cmap = pdf_writer::types::UnicodeCmap::new(
        Name(cmap_name.as_bytes()),
        pdf_writer::types::SystemInfo {
            registry: pdf_writer::Str(b"Adobe"),
            ordering: pdf_writer::Str(b"Identity"),
            supplement: 0,
        },
    );
    for (&gid, &ch) in used {
        cmap.pair(gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Some(())
}
