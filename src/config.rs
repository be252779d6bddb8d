use std::ffi::OsStr;
use std::path::PathBuf;

/// Where and what to look for when resolving the document fonts.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontConfig {
    /// Candidate families, in order of preference. Each needs a regular and
    /// a bold face to be picked.
    pub families: Vec<String>,
    /// Directories scanned recursively for font files.
    pub dirs: Vec<PathBuf>,
    /// Also scan the platform's font directories.
    pub system_dirs: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            families: vec!["Segoe UI".to_string(), "Calibri".to_string()],
            dirs: Vec::new(),
            system_dirs: false,
        }
    }
}

pub const FONT_DIRS_ENV: &str = "CURRICULUM_PDF_FONTS";
pub const FONT_FAMILIES_ENV: &str = "CURRICULUM_PDF_FONT_FAMILIES";

impl FontConfig {
    /// Defaults extended by `CURRICULUM_PDF_FONTS` (path list, `:` or `;`
    /// separated by platform) and replaced by `CURRICULUM_PDF_FONT_FAMILIES`
    /// (comma separated) when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(val) = std::env::var_os(FONT_DIRS_ENV) {
            config.dirs.extend(font_dir_list(&val));
        }
        if let Ok(val) = std::env::var(FONT_FAMILIES_ENV) {
            let families = split_families(&val);
            if !families.is_empty() {
                config.families = families;
            }
        }
        config
    }
}

/// Platform path list, empty entries skipped.
pub fn font_dir_list(val: &OsStr) -> Vec<PathBuf> {
    std::env::split_paths(val)
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}

pub fn split_families(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

/// Settings for one document render.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub fonts: FontConfig,
    /// Page size in points (A4 by default).
    pub page_width: f32,
    pub page_height: f32,
    /// Deflate level for page content streams and raw image data.
    pub compression_level: u8,
}

pub const A4_WIDTH: f32 = 595.2756;
pub const A4_HEIGHT: f32 = 841.8898;

impl Default for Config {
    fn default() -> Self {
        Self {
            fonts: FontConfig::default(),
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            compression_level: 6,
        }
    }
}
