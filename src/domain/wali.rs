use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A guardian attached to a student. At most one guardian per student
/// carries `is_utama`; promotion is handled by the wali service so the
/// previous primary is always demoted in the same mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wali {
    pub id: Uuid,
    pub santri_id: Uuid,
    pub nama_lengkap: String,
    pub hubungan_keluarga: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nik: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pekerjaan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penghasilan_bulanan: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alamat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_telepon: Option<String>,
    pub is_utama: bool,
    pub created_at: DateTime<Utc>,
}

impl Wali {
    pub fn new(
        santri_id: Uuid,
        nama_lengkap: impl Into<String>,
        hubungan_keluarga: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            santri_id,
            nama_lengkap: nama_lengkap.into(),
            hubungan_keluarga: hubungan_keluarga.into(),
            nik: None,
            pekerjaan: None,
            penghasilan_bulanan: None,
            alamat: None,
            no_telepon: None,
            is_utama: false,
            created_at: Utc::now(),
        }
    }
}
