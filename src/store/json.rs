use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{Asset, AssetRef, Category, Profile, SectionItem};

use super::{Store, StoreData, content_type_for};

/// Store persisted as one JSON document, with assets as files under a media
/// root directory.
pub struct JsonStore {
    path: PathBuf,
    media_root: PathBuf,
    data: StoreData,
}

impl JsonStore {
    pub fn open(path: &Path, media_root: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => Error::Io(
                io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
            ),
            _ => Error::Io(e),
        })?;
        let data: StoreData = serde_json::from_str(&text).map_err(|source| Error::StoreFormat {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!(
            "Loaded store {}: {} profiles, {} courses, {} jobs, {} academic, {} work, {} awards, {} listings",
            path.display(),
            data.profiles.len(),
            data.courses.len(),
            data.jobs.len(),
            data.academic_products.len(),
            data.work_products.len(),
            data.awards.len(),
            data.sale_listings.len(),
        );
        Ok(Self {
            path: path.to_path_buf(),
            media_root: media_root.to_path_buf(),
            data,
        })
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }

    /// Flag one profile active, clear every other, and persist the result as
    /// a single file replacement.
    pub fn activate_profile(&mut self, profile_id: u32) -> Result<()> {
        let mut next = self.data.clone();
        next.activate_profile(profile_id)?;
        write_atomically(&self.path, &next)?;
        self.data = next;
        log::info!("Activated profile {profile_id}");
        Ok(())
    }

    fn resolve(&self, asset: &AssetRef) -> io::Result<PathBuf> {
        let rel = Path::new(asset.path.trim());
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || rel.as_os_str().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("asset path outside media root: {}", asset.path),
            ));
        }
        Ok(self.media_root.join(rel))
    }
}

fn write_atomically(path: &Path, data: &StoreData) -> Result<()> {
    let json = serde_json::to_vec_pretty(data).map_err(|source| Error::StoreFormat {
        path: path.to_path_buf(),
        source,
    })?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

impl Store for JsonStore {
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
        let full = self.resolve(asset)?;
        let bytes = std::fs::read(&full)
            .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", e, full.display())))?;
        Ok(Asset {
            bytes,
            content_type: asset
                .content_type
                .clone()
                .unwrap_or_else(|| content_type_for(&asset.path)),
        })
    }
}
