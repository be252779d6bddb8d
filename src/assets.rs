use crate::model::{AssetRef, Category, ImageRole};
use crate::select::Selection;

/// One image scheduled for the trailing pages.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageEntry {
    pub section: &'static str,
    pub label: String,
    pub asset: AssetRef,
}

#[derive(Clone, Debug, Default)]
pub struct ImageSets {
    /// Rendered one per full page.
    pub certificates: Vec<ImageEntry>,
    /// Rendered in the gallery after the divider page.
    pub normals: Vec<ImageEntry>,
}

const TRAVERSAL: [Category; 5] = [
    Category::Courses,
    Category::Jobs,
    Category::AcademicProducts,
    Category::WorkProducts,
    Category::Awards,
];

/// Walk the selected items and sort every attached image into the
/// certificate or the gallery list, keeping section and item order.
pub fn classify(selection: &Selection) -> ImageSets {
    let mut sets = ImageSets::default();
    for category in TRAVERSAL {
        let section = category.plate_section();
        for item in selection.items(category) {
            let base = item.image_label();
            for (role, asset) in item.images() {
                match role {
                    ImageRole::Certificate => sets.certificates.push(ImageEntry {
                        section,
                        label: base.clone(),
                        asset: asset.clone(),
                    }),
                    ImageRole::Illustrative => sets.normals.push(ImageEntry {
                        section,
                        label: format!("{base} — Imagen del producto"),
                        asset: asset.clone(),
                    }),
                }
            }
        }
    }
    log::debug!(
        "Classified images: {} certificate(s), {} gallery image(s)",
        sets.certificates.len(),
        sets.normals.len()
    );
    sets
}
