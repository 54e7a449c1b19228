//! Fallback text font for the software surface when none is configured.

use fontdb::{Database, Family, Query};

/// A sans-serif face found among the installed system fonts.
pub struct SystemFont {
    pub family: String,
    pub data: Vec<u8>,
    pub index: u32,
}

impl std::fmt::Debug for SystemFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemFont")
            .field("family", &self.family)
            .field("index", &self.index)
            .field("data_len", &self.data.len())
            .finish()
    }
}

const PREFERRED: &[&str] = &["Noto Sans", "DejaVu Sans", "Liberation Sans", "Arial", "Helvetica"];

/// Picks the first preferred family that is installed, then the generic
/// sans-serif family, then any face at all.
pub fn find_system_font() -> Option<SystemFont> {
    let mut db = Database::new();
    db.load_system_fonts();
    if db.is_empty() {
        log::warn!("No system fonts found");
        return None;
    }

    let named = PREFERRED.iter().find_map(|name| {
        db.query(&Query {
            families: &[Family::Name(*name)],
            ..Query::default()
        })
    });
    let id = named
        .or_else(|| {
            db.query(&Query {
                families: &[Family::SansSerif],
                ..Query::default()
            })
        })
        .or_else(|| db.faces().next().map(|face| face.id))?;

    let family = db
        .face(id)
        .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_default();
    let (data, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    log::debug!("Using system font '{}' for previews", family);
    Some(SystemFont {
        family,
        data,
        index,
    })
}
