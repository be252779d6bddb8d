use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reference to a stored binary asset (photo or certificate scan).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl AssetRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content_type: None,
        }
    }
}

/// Bytes of an asset as handed out by a store.
#[derive(Clone, Debug)]
pub struct Asset {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub id: u32,
    pub first_names: String,
    pub last_names: String,
    pub national_id: String,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub birth_place: Option<String>,
    pub sex: Option<String>,
    pub marital_status: Option<String>,
    pub driving_license: Option<String>,
    pub landline_phone: Option<String>,
    pub phone: Option<String>,
    pub work_address: Option<String>,
    pub home_address: Option<String>,
    pub website: Option<String>,
    pub summary: Option<String>,
    pub photo: Option<AssetRef>,
    pub active: bool,
    pub printing_allowed: bool,
}

impl Profile {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_names.trim(), self.last_names.trim());
        let name = name.trim();
        if name.is_empty() {
            "Perfil".to_string()
        } else {
            name.to_string()
        }
    }

    /// Sidebar detail rows in their fixed order. Empty values are pruned by
    /// the caller.
    pub fn detail_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("Cédula", Some(self.national_id.clone())),
            ("Sexo", self.sex.clone()),
            ("Estado civil", self.marital_status.clone()),
            ("Fecha nac.", self.birth_date.map(format_date)),
            ("Nacionalidad", self.nationality.clone()),
            ("Lugar nac.", self.birth_place.clone()),
            ("Licencia", self.driving_license.clone()),
            ("Teléfono", self.phone.clone()),
            ("Convencional", self.landline_phone.clone()),
            ("Dirección dom.", self.home_address.clone()),
            ("Dirección trab.", self.work_address.clone()),
            ("Sitio web", self.website.clone()),
        ]
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Course {
    pub id: u32,
    pub profile_id: u32,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub total_hours: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sponsor: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub sponsor_email: Option<String>,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    #[serde(default)]
    pub certificate_image: Option<AssetRef>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Job {
    pub id: u32,
    pub profile_id: u32,
    pub company: String,
    pub position: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub responsibilities: Option<String>,
    #[serde(default)]
    pub company_address: Option<String>,
    #[serde(default)]
    pub company_phone: Option<String>,
    #[serde(default)]
    pub company_email: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub duties: Option<String>,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    #[serde(default)]
    pub certificate_image: Option<AssetRef>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classifier {
    Articulo,
    Tesis,
    Investigacion,
    Proyecto,
    Ponencia,
    Poster,
    Libro,
    Ensayo,
    Informe,
    Otro,
}

impl Classifier {
    pub fn label(self) -> &'static str {
        match self {
            Classifier::Articulo => "Artículo",
            Classifier::Tesis => "Tesis",
            Classifier::Investigacion => "Investigación",
            Classifier::Proyecto => "Proyecto",
            Classifier::Ponencia => "Ponencia",
            Classifier::Poster => "Póster",
            Classifier::Libro => "Libro / Capítulo",
            Classifier::Ensayo => "Ensayo",
            Classifier::Informe => "Informe",
            Classifier::Otro => "Otro",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AcademicProduct {
    pub id: u32,
    pub profile_id: u32,
    pub name: String,
    pub classifier: Classifier,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    #[serde(default)]
    pub product_image: Option<AssetRef>,
    #[serde(default)]
    pub certificate_image: Option<AssetRef>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkProduct {
    pub id: u32,
    pub profile_id: u32,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    #[serde(default)]
    pub product_image: Option<AssetRef>,
    #[serde(default)]
    pub certificate_image: Option<AssetRef>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AwardKind {
    #[serde(rename = "Académico")]
    Academic,
    #[serde(rename = "Público")]
    Public,
    #[serde(rename = "Privado")]
    Private,
}

impl AwardKind {
    pub fn label(self) -> &'static str {
        match self {
            AwardKind::Academic => "Académico",
            AwardKind::Public => "Público",
            AwardKind::Private => "Privado",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Award {
    pub id: u32,
    pub profile_id: u32,
    #[serde(default)]
    pub kind: Option<AwardKind>,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    pub sponsor: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    #[serde(default)]
    pub certificate_image: Option<AssetRef>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "Bueno")]
    Good,
    #[serde(rename = "Regular")]
    Fair,
}

impl Condition {
    pub fn label(self) -> &'static str {
        match self {
            Condition::Good => "Bueno",
            Condition::Fair => "Regular",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaleListing {
    pub id: u32,
    pub profile_id: u32,
    pub name: String,
    pub condition: Condition,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    #[serde(default)]
    pub photo: Option<AssetRef>,
}

fn visible_by_default() -> bool {
    true
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The six achievement sections, in the order the document lays them out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Jobs,
    Courses,
    AcademicProducts,
    WorkProducts,
    Awards,
    SaleListings,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Jobs,
        Category::Courses,
        Category::AcademicProducts,
        Category::WorkProducts,
        Category::Awards,
        Category::SaleListings,
    ];

    /// Query-string flag that includes this category in a filtered request.
    pub fn flag(self) -> &'static str {
        match self {
            Category::Jobs => "exp",
            Category::Courses => "cursos",
            Category::AcademicProducts => "pa",
            Category::WorkProducts => "pl",
            Category::Awards => "recon",
            Category::SaleListings => "vg",
        }
    }

    pub fn from_flag(flag: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.flag() == flag)
    }

    /// Section heading in the content column.
    pub fn heading(self) -> &'static str {
        match self {
            Category::Jobs => "Experiencia laboral",
            Category::Courses => "Cursos realizados",
            Category::AcademicProducts => "Productos académicos",
            Category::WorkProducts => "Productos laborales",
            Category::Awards => "Reconocimientos",
            Category::SaleListings => "Venta garage",
        }
    }

    /// Section name printed in image plate header bars.
    pub fn plate_section(self) -> &'static str {
        match self {
            Category::Courses => "Cursos",
            other => other.heading(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageRole {
    /// Authoritative proof, one full page per image.
    Certificate,
    /// Product photo, grouped in the gallery.
    Illustrative,
}

/// Ephemeral layout unit built from one item. Values are trimmed and empty
/// ones are dropped at construction time.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub title: String,
    pub pairs: Vec<(&'static str, String)>,
    pub notes: Option<String>,
}

impl Card {
    pub fn new(
        title: impl Into<String>,
        raw_pairs: Vec<(&'static str, Option<String>)>,
        notes: Option<&str>,
    ) -> Self {
        let pairs = raw_pairs
            .into_iter()
            .filter_map(|(label, value)| {
                let value = value?;
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| (label, trimmed.to_string()))
            })
            .collect();
        let notes = notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Self {
            title: title.into(),
            pairs,
            notes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty() && self.notes.is_none()
    }
}

fn joined_title(head: &str, tail: &str, sep: &str) -> String {
    if tail.trim().is_empty() {
        head.trim().to_string()
    } else {
        format!("{}{}{}", head, sep, tail).trim().to_string()
    }
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}

#[derive(Clone, Debug)]
pub enum SectionItem {
    Course(Course),
    Job(Job),
    AcademicProduct(AcademicProduct),
    WorkProduct(WorkProduct),
    Award(Award),
    SaleListing(SaleListing),
}

impl SectionItem {
    pub fn category(&self) -> Category {
        match self {
            SectionItem::Course(_) => Category::Courses,
            SectionItem::Job(_) => Category::Jobs,
            SectionItem::AcademicProduct(_) => Category::AcademicProducts,
            SectionItem::WorkProduct(_) => Category::WorkProducts,
            SectionItem::Award(_) => Category::Awards,
            SectionItem::SaleListing(_) => Category::SaleListings,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            SectionItem::Course(c) => c.id,
            SectionItem::Job(j) => j.id,
            SectionItem::AcademicProduct(p) => p.id,
            SectionItem::WorkProduct(p) => p.id,
            SectionItem::Award(a) => a.id,
            SectionItem::SaleListing(s) => s.id,
        }
    }

    pub fn profile_id(&self) -> u32 {
        match self {
            SectionItem::Course(c) => c.profile_id,
            SectionItem::Job(j) => j.profile_id,
            SectionItem::AcademicProduct(p) => p.profile_id,
            SectionItem::WorkProduct(p) => p.profile_id,
            SectionItem::Award(a) => a.profile_id,
            SectionItem::SaleListing(s) => s.profile_id,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            SectionItem::Course(c) => c.visible,
            SectionItem::Job(j) => j.visible,
            SectionItem::AcademicProduct(p) => p.visible,
            SectionItem::WorkProduct(p) => p.visible,
            SectionItem::Award(a) => a.visible,
            SectionItem::SaleListing(s) => s.visible,
        }
    }

    /// (primary, secondary, id); sections sort on this descending.
    pub fn sort_key(&self) -> (Option<NaiveDate>, Option<NaiveDate>, u32) {
        match self {
            SectionItem::Course(c) => (Some(c.end), Some(c.start), c.id),
            SectionItem::Job(j) => (Some(j.end), Some(j.start), j.id),
            SectionItem::AcademicProduct(p) => (None, None, p.id),
            SectionItem::WorkProduct(p) => (Some(p.date), None, p.id),
            SectionItem::Award(a) => (Some(a.date), None, a.id),
            SectionItem::SaleListing(s) => (Some(s.date), None, s.id),
        }
    }

    pub fn card(&self) -> Card {
        match self {
            SectionItem::Job(j) => Card::new(
                joined_title(or_fallback(&j.position, "Experiencia"), &j.company, " — "),
                vec![
                    ("Inicio", Some(format_date(j.start))),
                    ("Fin", Some(format_date(j.end))),
                    ("Lugar", j.location.clone()),
                    ("Dirección", j.company_address.clone()),
                    ("Sitio web", j.website.clone()),
                    ("Email", j.company_email.clone()),
                    ("Teléfono", j.company_phone.clone()),
                    ("Contacto", j.contact_name.clone()),
                    ("Tel. contacto", j.contact_phone.clone()),
                    ("Funciones", j.duties.clone()),
                ],
                j.responsibilities.as_deref(),
            ),
            SectionItem::Course(c) => Card::new(
                or_fallback(&c.name, "Curso"),
                vec![
                    ("Inicio", Some(format_date(c.start))),
                    ("Fin", Some(format_date(c.end))),
                    ("Total horas", c.total_hours.map(|h| h.to_string())),
                    ("Entidad", c.sponsor.clone()),
                    ("Contacto", c.contact_name.clone()),
                    ("Tel. contacto", c.contact_phone.clone()),
                    ("Email entidad", c.sponsor_email.clone()),
                ],
                c.description.as_deref(),
            ),
            SectionItem::AcademicProduct(p) => Card::new(
                or_fallback(&p.name, "Producto académico"),
                vec![("Clasificador", Some(p.classifier.label().to_string()))],
                p.description.as_deref(),
            ),
            SectionItem::WorkProduct(p) => Card::new(
                or_fallback(&p.name, "Producto laboral"),
                vec![("Fecha", Some(format_date(p.date)))],
                p.description.as_deref(),
            ),
            SectionItem::Award(a) => {
                let kind = a.kind.map_or("Reconocimiento", AwardKind::label);
                Card::new(
                    joined_title(kind, &a.sponsor, " — "),
                    vec![
                        ("Fecha", Some(format_date(a.date))),
                        ("Tipo", a.kind.map(|k| k.label().to_string())),
                        ("Entidad", Some(a.sponsor.clone())),
                    ],
                    a.description.as_deref(),
                )
            }
            SectionItem::SaleListing(s) => Card::new(
                or_fallback(&s.name, "Producto"),
                vec![
                    ("Fecha", Some(format_date(s.date))),
                    ("Estado", Some(s.condition.label().to_string())),
                    ("Valor", s.price.map(|p| format!("${p:.2}"))),
                ],
                s.description.as_deref(),
            ),
        }
    }

    /// Label used on image plates and gallery captions.
    pub fn image_label(&self) -> String {
        match self {
            SectionItem::Course(c) => format!("Curso \"{}\"", or_fallback(&c.name, "Sin título")),
            SectionItem::Job(j) => format!(
                "Experiencia \"{}\"",
                joined_title(or_fallback(&j.position, "Sin título"), &j.company, " - ")
            ),
            SectionItem::AcademicProduct(p) => {
                format!("Producto académico \"{}\"", or_fallback(&p.name, "Sin título"))
            }
            SectionItem::WorkProduct(p) => {
                format!("Producto laboral \"{}\"", or_fallback(&p.name, "Sin título"))
            }
            SectionItem::Award(a) => format!(
                "Reconocimiento \"{}\"",
                joined_title(a.kind.map_or("Reconocimiento", AwardKind::label), &a.sponsor, " - ")
            ),
            SectionItem::SaleListing(s) => format!("Venta \"{}\"", or_fallback(&s.name, "Sin título")),
        }
    }

    /// Attached images in classification order: illustrative photo first,
    /// then the certificate. Sale listing photos are never classified.
    pub fn images(&self) -> Vec<(ImageRole, &AssetRef)> {
        let (illustrative, certificate) = match self {
            SectionItem::Course(c) => (None, c.certificate_image.as_ref()),
            SectionItem::Job(j) => (None, j.certificate_image.as_ref()),
            SectionItem::AcademicProduct(p) => {
                (p.product_image.as_ref(), p.certificate_image.as_ref())
            }
            SectionItem::WorkProduct(p) => (p.product_image.as_ref(), p.certificate_image.as_ref()),
            SectionItem::Award(a) => (None, a.certificate_image.as_ref()),
            SectionItem::SaleListing(_) => (None, None),
        };
        illustrative
            .filter(|a| !a.path.trim().is_empty())
            .map(|a| (ImageRole::Illustrative, a))
            .into_iter()
            .chain(
                certificate
                    .filter(|a| !a.path.trim().is_empty())
                    .map(|a| (ImageRole::Certificate, a)),
            )
            .collect()
    }
}
