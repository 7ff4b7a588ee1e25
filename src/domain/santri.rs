use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A student identity record. Identity fields never change after enrollment;
/// status fields do. Records are never hard-deleted, only moved through
/// [`SantriStatus`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Santri {
    pub id: Uuid,
    pub nama_lengkap: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nisn: Option<String>,
    /// Enrollment category label, e.g. "Santri Binaan Mukim" or "Reguler".
    pub kategori: String,
    #[serde(default)]
    pub status_sosial: StatusSosial,
    pub status: SantriStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tanggal_masuk: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Santri {
    pub fn new(nama_lengkap: impl Into<String>, kategori: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            nama_lengkap: nama_lengkap.into(),
            nisn: None,
            kategori: kategori.into(),
            status_sosial: StatusSosial::Lengkap,
            status: SantriStatus::Aktif,
            tanggal_masuk: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_aktif(&self) -> bool {
        matches!(self.status, SantriStatus::Aktif)
    }

    /// Matches the legacy category labels "Binaan Mukim" and "Mukim Binaan"
    /// in either word order, case-insensitively.
    pub fn is_binaan_mukim(&self) -> bool {
        let kategori = self.kategori.to_lowercase();
        kategori.contains("binaan mukim") || kategori.contains("mukim binaan")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SantriStatus {
    Aktif,
    NonAktif,
    Lulus,
    Keluar,
}

/// Orphan/poverty classification used by document requirements and aid rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum StatusSosial {
    #[default]
    Lengkap,
    Yatim,
    Piatu,
    #[serde(rename = "Yatim Piatu")]
    YatimPiatu,
    Dhuafa,
}

impl StatusSosial {
    pub fn label(&self) -> &'static str {
        match self {
            StatusSosial::Lengkap => "Lengkap",
            StatusSosial::Yatim => "Yatim",
            StatusSosial::Piatu => "Piatu",
            StatusSosial::YatimPiatu => "Yatim Piatu",
            StatusSosial::Dhuafa => "Dhuafa",
        }
    }
}
