use pdf_writer::{Filter, Pdf, Ref};

use crate::raster::{RasterColor, RasterFilter, RasterImage};

/// Write `image` (and its soft mask) as XObjects, returning the image ref.
pub(super) fn write_image(pdf: &mut Pdf, image: &RasterImage, alloc: &mut impl FnMut() -> Ref) -> Ref {
    let width = i32::try_from(image.width).unwrap_or(i32::MAX);
    let height = i32::try_from(image.height).unwrap_or(i32::MAX);

    let smask_ref = image.alpha.as_ref().map(|alpha| {
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(width);
        mask.height(height);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        mask_ref
    });

    let xobj_ref = alloc();
    let mut xobj = pdf.image_xobject(xobj_ref, &image.data);
    xobj.filter(match image.filter {
        RasterFilter::Dct => Filter::DctDecode,
        RasterFilter::Flate => Filter::FlateDecode,
    });
    xobj.width(width);
    xobj.height(height);
    match image.color {
        RasterColor::Gray => xobj.color_space().device_gray(),
        RasterColor::Rgb => xobj.color_space().device_rgb(),
    }
    xobj.bits_per_component(8);
    if let Some(mask_ref) = smask_ref {
        xobj.s_mask(mask_ref);
    }
    xobj_ref
}
