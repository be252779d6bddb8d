mod common;

use std::path::{Path, PathBuf};

use common::*;
use curriculum_pdf::fonts::{FontRegistry, FontStyle};
use curriculum_pdf::layout::wrap_text;
use curriculum_pdf::{CategoryFilter, Config, FontConfig, generate};

/// Override with CURRICULUM_PDF_TEST_FONTS when DejaVu lives elsewhere.
const DEJAVU_DIR: &str = "/usr/share/fonts/truetype/dejavu";

/// A directory holding only DejaVu Sans regular and bold, or `None` when the
/// host has no DejaVu fonts.
fn dejavu_dir() -> Option<tempfile::TempDir> {
    let src = std::env::var_os("CURRICULUM_PDF_TEST_FONTS")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEJAVU_DIR));
    let dir = tempfile::tempdir().ok()?;
    for file in ["DejaVuSans.ttf", "DejaVuSans-Bold.ttf"] {
        std::fs::copy(src.join(file), dir.path().join(file)).ok()?;
    }
    Some(dir)
}

fn dejavu_config(dir: &Path) -> FontConfig {
    FontConfig {
        families: vec!["DejaVu Sans".to_string()],
        dirs: vec![dir.to_path_buf()],
        system_dirs: false,
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn rich_store() -> curriculum_pdf::MemoryStore {
    let mut store = store();
    store.data.profiles[0].summary = Some("Ingeniera de software, señal ñandú «ok».".to_string());
    store.data.courses = vec![course(1, "Programación en Rust", date(2021, 1, 1))];
    store
}

#[test]
fn truetype_pair_is_resolved_from_configured_dir() {
    init_logger();
    let Some(dir) = dejavu_dir() else {
        eprintln!("DejaVu Sans not installed, skipping");
        return;
    };
    let fonts = FontRegistry::resolve(&dejavu_config(dir.path()));
    assert_eq!(fonts.face(FontStyle::Regular).name(), "DejaVu Sans");
    assert_eq!(fonts.face(FontStyle::Bold).name(), "DejaVu Sans");

    let sample = "Hoja de vida";
    let regular = fonts.text_width(FontStyle::Regular, sample, 10.0);
    let bold = fonts.text_width(FontStyle::Bold, sample, 10.0);
    assert!(regular > 0.0);
    assert!(bold > regular);
    assert_ne!(regular, FontRegistry::builtin().text_width(FontStyle::Regular, sample, 10.0));

    let text = "Responsable del diseño y mantenimiento de la infraestructura de red del campus universitario.";
    let lines = wrap_text(&fonts, FontStyle::Regular, 9.8, 120.0, text);
    assert!(lines.len() > 1);
    for line in &lines {
        assert!(fonts.text_width(FontStyle::Regular, line, 9.8) <= 120.0, "{line:?}");
    }
}

#[test]
fn unknown_family_falls_back_to_helvetica() {
    let Some(dir) = dejavu_dir() else {
        eprintln!("DejaVu Sans not installed, skipping");
        return;
    };
    let config = FontConfig {
        families: vec!["No Such Family".to_string()],
        ..dejavu_config(dir.path())
    };
    let fonts = FontRegistry::resolve(&config);
    assert_eq!(fonts.face(FontStyle::Regular).name(), "Helvetica");
    assert_eq!(fonts.face(FontStyle::Bold).name(), "Helvetica-Bold");
}

#[test]
fn pdf_embeds_subset_truetype_fonts() {
    let Some(dir) = dejavu_dir() else {
        eprintln!("DejaVu Sans not installed, skipping");
        return;
    };
    let config = Config {
        fonts: dejavu_config(dir.path()),
        ..Config::default()
    };
    let doc = generate(&rich_store(), &CategoryFilter::All, &config).unwrap();
    assert!(contains(&doc.bytes, b"/Type0"));
    assert!(contains(&doc.bytes, b"/Identity-H"));
    assert!(contains(&doc.bytes, b"/ToUnicode"));
    assert!(contains(&doc.bytes, b"/FontFile2"));
    assert!(contains(&doc.bytes, b"/DejaVuSans-Bold"));
    assert!(!contains(&doc.bytes, b"/Helvetica"));
}

#[test]
fn each_render_uses_its_own_font_config() {
    let Some(dir) = dejavu_dir() else {
        eprintln!("DejaVu Sans not installed, skipping");
        return;
    };
    let store = rich_store();
    let dejavu = Config {
        fonts: dejavu_config(dir.path()),
        ..Config::default()
    };

    let first = generate(&store, &CategoryFilter::All, &Config::default()).unwrap();
    assert!(contains(&first.bytes, b"/Helvetica"));
    assert!(!contains(&first.bytes, b"DejaVuSans"));

    let second = generate(&store, &CategoryFilter::All, &dejavu).unwrap();
    assert!(contains(&second.bytes, b"DejaVuSans"));
    assert!(!contains(&second.bytes, b"/Helvetica"));

    let third = generate(&store, &CategoryFilter::All, &Config::default()).unwrap();
    assert!(contains(&third.bytes, b"/Helvetica"));
}
