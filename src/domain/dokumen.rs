use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One uploaded file for a (santri, document type) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DokumenSantri {
    pub id: Uuid,
    pub santri_id: Uuid,
    /// Normalized document type; legacy labels are mapped on ingest.
    pub jenis_dokumen: String,
    pub nama_file: String,
    pub path_file: String,
    pub ukuran_file: u64,
    pub tipe_file: String,
    pub status_verifikasi: StatusVerifikasi,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tanggal_verifikasi: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifikasi_oleh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catatan_verifikasi: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum StatusVerifikasi {
    #[default]
    #[serde(rename = "Belum Diverifikasi")]
    BelumDiverifikasi,
    Diverifikasi,
    Ditolak,
}

/// A derived document requirement — never persisted; computed from the
/// student's enrollment category and social status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersyaratanDokumen {
    pub jenis_dokumen: String,
    pub required: bool,
}

impl PersyaratanDokumen {
    pub fn wajib(jenis: impl Into<String>) -> Self {
        Self {
            jenis_dokumen: jenis.into(),
            required: true,
        }
    }

    pub fn opsional(jenis: impl Into<String>) -> Self {
        Self {
            jenis_dokumen: jenis.into(),
            required: false,
        }
    }
}
