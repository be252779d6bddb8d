use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::model::{Category, Profile, SectionItem};
use crate::store::Store;

/// Which sections a document request includes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// No recognised flag was supplied.
    #[default]
    All,
    /// At least one recognised flag was supplied; everything else is empty.
    Only(BTreeSet<Category>),
}

impl CategoryFilter {
    /// Build from flag names. Unknown names are ignored; a single known one
    /// switches to filtering mode.
    pub fn from_flags<'a>(flags: impl IntoIterator<Item = &'a str>) -> Self {
        let set: BTreeSet<Category> = flags
            .into_iter()
            .filter_map(|f| Category::from_flag(f.trim()))
            .collect();
        if set.is_empty() {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(set)
        }
    }

    /// Parse a raw query string (`exp&cursos=on&page=2`). Only key presence
    /// matters, values are ignored.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_flags(
            query
                .split('&')
                .filter(|pair| !pair.is_empty())
                .map(|pair| pair.split_once('=').map_or(pair, |(key, _)| key)),
        )
    }

    pub fn includes(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(set) => set.contains(&category),
        }
    }
}

/// The active profile plus its ordered, filtered sections.
#[derive(Clone, Debug)]
pub struct Selection {
    pub profile: Profile,
    sections: Vec<(Category, Vec<SectionItem>)>,
}

impl Selection {
    pub fn items(&self, category: Category) -> &[SectionItem] {
        self.sections
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, items)| items.as_slice())
            .unwrap_or(&[])
    }

    /// Sections in document order.
    pub fn sections(&self) -> impl Iterator<Item = (Category, &[SectionItem])> {
        self.sections.iter().map(|(c, items)| (*c, items.as_slice()))
    }
}

/// Sort newest first on the category key; ids break ties so output is
/// identical across runs.
pub fn sort_items(items: &mut [SectionItem]) {
    items.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
}

/// Resolve the active profile and pull each section. Fails with `NotFound`
/// or `Forbidden` before any item is read.
pub fn select<S: Store + ?Sized>(store: &S, filter: &CategoryFilter) -> Result<Selection> {
    let profile = store.active_profile()?.ok_or(Error::NotFound)?;
    if !profile.printing_allowed {
        return Err(Error::Forbidden);
    }

    let mut sections = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        let items = if filter.includes(category) {
            let mut items = store.list_items(profile.id, category, true)?;
            sort_items(&mut items);
            items
        } else {
            Vec::new()
        };
        log::debug!("Selected {} item(s) for {:?}", items.len(), category);
        sections.push((category, items));
    }

    Ok(Selection { profile, sections })
}
