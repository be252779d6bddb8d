#![allow(dead_code)]

use std::io::Cursor;

use chrono::NaiveDate;
use curriculum_pdf::canvas::RecordingCanvas;
use curriculum_pdf::fonts::FontRegistry;
use curriculum_pdf::model::{
    AcademicProduct, AssetRef, Award, AwardKind, Classifier, Condition, Course, Job, Profile,
    SaleListing, WorkProduct,
};
use curriculum_pdf::{CategoryFilter, Config, MemoryStore, Result, StoreData};

pub const PROFILE_ID: u32 = 1;
pub const FULL_NAME: &str = "Ana María Pérez Loor";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn profile(id: u32) -> Profile {
    Profile {
        id,
        first_names: "Ana María".to_string(),
        last_names: "Pérez Loor".to_string(),
        national_id: "1312345678".to_string(),
        birth_date: Some(date(1994, 3, 12)),
        nationality: Some("Ecuatoriana".to_string()),
        phone: Some("0991234567".to_string()),
        home_address: Some("Av. 4 de Noviembre, Manta".to_string()),
        active: true,
        printing_allowed: true,
        ..Profile::default()
    }
}

pub fn course(id: u32, name: &str, end: NaiveDate) -> Course {
    Course {
        id,
        profile_id: PROFILE_ID,
        name: name.to_string(),
        start: end - chrono::Duration::days(30),
        end,
        total_hours: Some(40),
        description: None,
        sponsor: Some("SENESCYT".to_string()),
        contact_name: None,
        contact_phone: None,
        sponsor_email: None,
        visible: true,
        certificate_image: None,
    }
}

pub fn job(id: u32, position: &str, company: &str, start: NaiveDate, end: NaiveDate) -> Job {
    Job {
        id,
        profile_id: PROFILE_ID,
        company: company.to_string(),
        position: position.to_string(),
        start,
        end,
        responsibilities: None,
        company_address: None,
        company_phone: None,
        company_email: None,
        location: Some("Manta".to_string()),
        website: None,
        contact_name: None,
        contact_phone: None,
        duties: None,
        visible: true,
        certificate_image: None,
    }
}

pub fn academic(id: u32, name: &str) -> AcademicProduct {
    AcademicProduct {
        id,
        profile_id: PROFILE_ID,
        name: name.to_string(),
        classifier: Classifier::Articulo,
        description: None,
        visible: true,
        product_image: None,
        certificate_image: None,
    }
}

pub fn work_product(id: u32, name: &str, on: NaiveDate) -> WorkProduct {
    WorkProduct {
        id,
        profile_id: PROFILE_ID,
        name: name.to_string(),
        date: on,
        description: None,
        visible: true,
        product_image: None,
        certificate_image: None,
    }
}

pub fn award(id: u32, sponsor: &str, on: NaiveDate) -> Award {
    Award {
        id,
        profile_id: PROFILE_ID,
        kind: Some(AwardKind::Academic),
        date: on,
        description: None,
        sponsor: sponsor.to_string(),
        contact_name: None,
        contact_phone: None,
        visible: true,
        certificate_image: None,
    }
}

pub fn listing(id: u32, name: &str, on: NaiveDate) -> SaleListing {
    SaleListing {
        id,
        profile_id: PROFILE_ID,
        name: name.to_string(),
        condition: Condition::Good,
        description: None,
        date: on,
        price: Some(25.0),
        visible: true,
        photo: None,
    }
}

pub fn asset(path: &str) -> Option<AssetRef> {
    Some(AssetRef::new(path))
}

/// Store holding one active, printable profile and nothing else.
pub fn store() -> MemoryStore {
    MemoryStore::new(StoreData {
        profiles: vec![profile(PROFILE_ID)],
        ..StoreData::default()
    })
}

pub fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(w, h, |x, y| {
        image::Rgba([(x * 7) as u8, (y * 5) as u8, 120, if x < 2 { 128 } else { 255 }])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

pub fn jpeg_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(w, h, |x, y| image::Rgb([(x * 3) as u8, (y * 3) as u8, 200]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Jpeg)
        .expect("encode jpeg");
    out.into_inner()
}

/// Lay `store` out on a recording canvas with the built-in fonts.
pub fn record(store: &MemoryStore, filter: &CategoryFilter) -> (RecordingCanvas, Result<()>) {
    let fonts = FontRegistry::builtin();
    let mut canvas = RecordingCanvas::new();
    let result = curriculum_pdf::compose(&mut canvas, store, filter, &fonts, &Config::default());
    (canvas, result)
}
