mod common;

use common::*;
use curriculum_pdf::Error;
use curriculum_pdf::raster::{RasterImage, cover_centered, fit_centered};

#[test]
fn png_with_alpha_decodes() {
    let bytes = png_bytes(40, 20);
    let img = RasterImage::decode("a.png", &bytes, "image/png", 6).unwrap();
    assert_eq!((img.width, img.height), (40, 20));
    assert_eq!(img.aspect(), 2.0);
}

#[test]
fn jpeg_decodes_with_its_dimensions() {
    let bytes = jpeg_bytes(30, 60);
    let img = RasterImage::decode("a.jpg", &bytes, "image/jpeg", 6).unwrap();
    assert_eq!((img.width, img.height), (30, 60));
}

#[test]
fn sniffed_format_wins_over_declared_type() {
    let bytes = png_bytes(8, 8);
    let img = RasterImage::decode("mislabelled.jpg", &bytes, "image/jpeg", 6).unwrap();
    assert_eq!(img.width, 8);
}

#[test]
fn garbage_is_unreadable() {
    let err = RasterImage::decode("broken.png", b"definitely not an image", "image/png", 6).unwrap_err();
    match err {
        Error::AssetUnreadable { name, .. } => assert_eq!(name, "broken.png"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn truncated_png_is_unreadable() {
    let bytes = png_bytes(64, 64);
    let cut = &bytes[..bytes.len() / 2];
    assert!(RasterImage::decode("cut.png", cut, "image/png", 6).is_err());
}

#[test]
fn identical_sources_share_a_key() {
    let bytes = png_bytes(10, 10);
    let a = RasterImage::decode("a.png", &bytes, "image/png", 6).unwrap();
    let b = RasterImage::decode("b.png", &bytes, "image/png", 6).unwrap();
    let c = RasterImage::decode("c.png", &png_bytes(11, 10), "image/png", 6).unwrap();
    assert_eq!(a.key, b.key);
    assert_ne!(a.key, c.key);
}

#[test]
fn fit_keeps_aspect_and_centres() {
    let (dx, dy, w, h) = fit_centered(2.0, 100.0, 100.0);
    assert_eq!((w, h), (100.0, 50.0));
    assert_eq!((dx, dy), (0.0, 25.0));

    let (dx, dy, w, h) = fit_centered(0.5, 100.0, 100.0);
    assert_eq!((w, h), (50.0, 100.0));
    assert_eq!((dx, dy), (25.0, 0.0));
}

#[test]
fn cover_fills_the_box() {
    let (dx, dy, w, h) = cover_centered(2.0, 80.0, 80.0);
    assert_eq!((w, h), (160.0, 80.0));
    assert_eq!((dx, dy), (-40.0, 0.0));
}

#[test]
fn degenerate_boxes_collapse() {
    assert_eq!(fit_centered(1.0, 0.0, 10.0), (0.0, 0.0, 0.0, 0.0));
    assert_eq!(fit_centered(f32::NAN, 10.0, 10.0), (0.0, 0.0, 0.0, 0.0));
}
