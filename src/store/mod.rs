mod json;

use std::collections::HashMap;
use std::io;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    AcademicProduct, Asset, AssetRef, Award, Category, Course, Job, Profile, SaleListing,
    SectionItem, WorkProduct,
};

pub use json::JsonStore;

/// Read access to profiles, their items and their binary assets.
pub trait Store {
    /// The profile flagged active, if any.
    fn active_profile(&self) -> Result<Option<Profile>>;

    /// Items of one category owned by `profile_id`. Ordering is not part of
    /// the contract; selection re-sorts.
    fn list_items(
        &self,
        profile_id: u32,
        category: Category,
        visible_only: bool,
    ) -> Result<Vec<SectionItem>>;

    /// Full bytes of an asset. Missing or unreadable assets surface as
    /// `io::Error`.
    fn read_asset(&self, asset: &AssetRef) -> io::Result<Asset>;
}

/// Complete record set, as serialised in a store file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreData {
    pub profiles: Vec<Profile>,
    pub courses: Vec<Course>,
    pub jobs: Vec<Job>,
    pub academic_products: Vec<AcademicProduct>,
    pub work_products: Vec<WorkProduct>,
    pub awards: Vec<Award>,
    pub sale_listings: Vec<SaleListing>,
}

impl StoreData {
    /// Among profiles flagged active the most recently created (highest id)
    /// wins.
    pub fn active_profile(&self) -> Option<&Profile> {
        self.profiles
            .iter()
            .filter(|p| p.active)
            .max_by_key(|p| p.id)
    }

    /// Flag `profile_id` active and clear the flag on every other profile.
    pub fn activate_profile(&mut self, profile_id: u32) -> Result<()> {
        if !self.profiles.iter().any(|p| p.id == profile_id) {
            return Err(Error::Store(format!("unknown profile {profile_id}")));
        }
        for profile in &mut self.profiles {
            profile.active = profile.id == profile_id;
        }
        Ok(())
    }

    pub fn items(&self, profile_id: u32, category: Category, visible_only: bool) -> Vec<SectionItem> {
        let all: Vec<SectionItem> = match category {
            Category::Courses => self.courses.iter().cloned().map(SectionItem::Course).collect(),
            Category::Jobs => self.jobs.iter().cloned().map(SectionItem::Job).collect(),
            Category::AcademicProducts => self
                .academic_products
                .iter()
                .cloned()
                .map(SectionItem::AcademicProduct)
                .collect(),
            Category::WorkProducts => self
                .work_products
                .iter()
                .cloned()
                .map(SectionItem::WorkProduct)
                .collect(),
            Category::Awards => self.awards.iter().cloned().map(SectionItem::Award).collect(),
            Category::SaleListings => self
                .sale_listings
                .iter()
                .cloned()
                .map(SectionItem::SaleListing)
                .collect(),
        };
        all.into_iter()
            .filter(|item| item.profile_id() == profile_id)
            .filter(|item| !visible_only || item.is_visible())
            .collect()
    }
}

/// Guess a content type from an asset path's extension.
pub(crate) fn content_type_for(path: &str) -> String {
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Store backed entirely by memory. Assets are keyed by their path.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub data: StoreData,
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new(data: StoreData) -> Self {
        Self {
            data,
            assets: HashMap::new(),
        }
    }

    pub fn insert_asset(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(path.into(), bytes);
    }

    pub fn activate_profile(&mut self, profile_id: u32) -> Result<()> {
        self.data.activate_profile(profile_id)
    }
}

impl Store for MemoryStore {
    fn active_profile(&self) -> Result<Option<Profile>> {
        Ok(self.data.active_profile().cloned())
    }

    fn list_items(
        &self,
        profile_id: u32,
        category: Category,
        visible_only: bool,
    ) -> Result<Vec<SectionItem>> {
        Ok(self.data.items(profile_id, category, visible_only))
    }

    fn read_asset(&self, asset: &AssetRef) -> io::Result<Asset> {
        let bytes = self.assets.get(&asset.path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no asset {}", asset.path))
        })?;
        Ok(Asset {
            bytes,
            content_type: asset
                .content_type
                .clone()
                .unwrap_or_else(|| content_type_for(&asset.path)),
        })
    }
}

/// Number of visible items per category for one profile.
pub fn visible_counts<S: Store + ?Sized>(
    store: &S,
    profile: &Profile,
) -> Result<Vec<(Category, usize)>> {
    Category::ALL
        .into_iter()
        .map(|category| Ok((category, store.list_items(profile.id, category, true)?.len())))
        .collect()
}
