pub mod assets;
pub mod canvas;
pub mod config;
mod error;
pub mod fonts;
pub mod layout;
pub mod model;
mod pdf;
pub mod raster;
pub mod select;
pub mod store;

pub use config::{Config, FontConfig};
pub use error::{Error, Result};
pub use pdf::PdfCanvas;
pub use select::{CategoryFilter, Selection, select};
pub use store::{JsonStore, MemoryStore, Store, StoreData};

use std::path::Path;
use std::time::Instant;

use canvas::Canvas;
use fonts::FontRegistry;
use layout::{Geometry, PageFlow, Sidebar};
use model::AssetRef;
use raster::RasterImage;

/// A finished document, ready to be written or served.
#[derive(Clone, Debug)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl RenderedDocument {
    pub const CONTENT_TYPE: &'static str = "application/pdf";
    pub const FILENAME: &'static str = "hoja_de_vida.pdf";

    /// `Content-Disposition` value for serving the document inline.
    pub fn content_disposition(&self) -> String {
        format!("inline; filename=\"{}\"", Self::FILENAME)
    }
}

/// Read and decode one asset. Any failure is logged and yields `None`.
fn load_image<S: Store + ?Sized>(store: &S, asset: &AssetRef, level: u8) -> Option<RasterImage> {
    let decoded = store
        .read_asset(asset)
        .map_err(|e| Error::AssetUnreadable {
            name: asset.path.clone(),
            reason: e.to_string(),
        })
        .and_then(|a| RasterImage::decode(&asset.path, &a.bytes, &a.content_type, level));
    match decoded {
        Ok(image) => Some(image),
        Err(e) => {
            log::warn!("Skipping image: {e}");
            None
        }
    }
}

/// Lay the active profile out on `canvas`: sidebar pages with the selected
/// sections, then certificate plates, then the gallery. `NotFound` and
/// `Forbidden` are returned before the first page is begun.
pub fn compose<C, S>(
    canvas: &mut C,
    store: &S,
    filter: &CategoryFilter,
    fonts: &FontRegistry,
    config: &Config,
) -> Result<()>
where
    C: Canvas + ?Sized,
    S: Store + ?Sized,
{
    let t0 = Instant::now();
    let selection = select(store, filter)?;
    let images = assets::classify(&selection);
    let t_select = t0.elapsed();

    let level = config.compression_level;
    let photo = selection
        .profile
        .photo
        .as_ref()
        .filter(|p| !p.path.trim().is_empty())
        .and_then(|p| load_image(store, p, level));
    let sidebar = Sidebar::from_profile(&selection.profile, photo);
    let geometry = Geometry::new(config.page_width, config.page_height);

    let mut flow = PageFlow::new(canvas, fonts, geometry, sidebar);
    let mut cursor = flow.begin_document();
    if let Some(summary) = selection.profile.summary.as_deref() {
        cursor = flow.draw_summary(cursor, summary);
    }
    for (category, items) in selection.sections() {
        let cards: Vec<_> = items.iter().map(|item| item.card()).collect();
        cursor = flow.draw_section(cursor, category.heading(), &cards);
    }
    let content_pages = flow.page_count();
    let t_layout = t0.elapsed();

    flow.draw_plates(&images.certificates, |entry| load_image(store, &entry.asset, level));
    flow.draw_gallery(&images.normals, |entry| load_image(store, &entry.asset, level));
    let t_images = t0.elapsed();

    log::info!(
        "Compose phases: select={:.1}ms, layout={:.1}ms, images={:.1}ms ({} content page(s), {} plate(s), {} gallery image(s))",
        t_select.as_secs_f64() * 1000.0,
        (t_layout - t_select).as_secs_f64() * 1000.0,
        (t_images - t_layout).as_secs_f64() * 1000.0,
        content_pages,
        images.certificates.len(),
        images.normals.len(),
    );
    Ok(())
}

/// Render the active profile to PDF bytes. Fonts are resolved from
/// `config.fonts`; each distinct font config is scanned once per process.
pub fn generate<S: Store + ?Sized>(
    store: &S,
    filter: &CategoryFilter,
    config: &Config,
) -> Result<RenderedDocument> {
    let t0 = Instant::now();
    let fonts = fonts::shared(&config.fonts);
    let mut canvas = PdfCanvas::new(
        &fonts,
        config.page_width,
        config.page_height,
        config.compression_level,
    );
    canvas.set_title("Hoja de vida");
    compose(&mut canvas, store, filter, &fonts, config)?;
    let page_count = canvas.page_count();
    let bytes = canvas.finish();

    log::info!(
        "Generated {} page(s), {} bytes in {:.1}ms",
        page_count,
        bytes.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    Ok(RenderedDocument { bytes, page_count })
}

/// [`generate`] and write the result to `output`.
pub fn generate_to_file<S: Store + ?Sized>(
    store: &S,
    filter: &CategoryFilter,
    config: &Config,
    output: &Path,
) -> Result<RenderedDocument> {
    let doc = generate(store, filter, config)?;
    std::fs::write(output, &doc.bytes).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {e}", output.display()),
        ))
    })?;
    Ok(doc)
}
