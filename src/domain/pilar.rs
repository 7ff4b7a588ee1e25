use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::keuangan::JenisTransaksi;

/// Legacy pillar codes retained for backward compatibility with historical
/// reports. The pillar set itself is open: new rows come from the master
/// table, not from an enum.
pub const PENDIDIKAN_FORMAL: &str = "pendidikan_formal";
pub const PENDIDIKAN_PESANTREN: &str = "pendidikan_pesantren";
pub const ASRAMA_KONSUMSI: &str = "asrama_konsumsi";
pub const BANTUAN_LANGSUNG: &str = "bantuan_langsung";

/// Synthetic bucket for rows whose category maps to no pillar.
pub const LAINNYA: &str = "lainnya";

/// Master row describing one service pillar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PilarLayanan {
    pub id: Uuid,
    pub kode: String,
    pub nama: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deskripsi: Option<String>,
    pub urutan: u32,
    pub aktif: bool,
}

impl PilarLayanan {
    pub fn new(kode: impl Into<String>, nama: impl Into<String>, urutan: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            kode: kode.into(),
            nama: nama.into(),
            deskripsi: None,
            urutan,
            aktif: true,
        }
    }
}

/// Master row describing a financial category and the pillar it feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KategoriKeuangan {
    pub id: Uuid,
    pub nama: String,
    pub jenis: JenisTransaksi,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pilar_layanan_kode: Option<String>,
    pub urutan: u32,
    pub aktif: bool,
}

impl KategoriKeuangan {
    pub fn pengeluaran(nama: impl Into<String>, pilar_kode: Option<&str>, urutan: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            nama: nama.into(),
            jenis: JenisTransaksi::Pengeluaran,
            pilar_layanan_kode: pilar_kode.map(str::to_string),
            urutan,
            aktif: true,
        }
    }
}

/// The seeded pillar master rows mirroring the legacy fixed set.
pub fn pilar_bawaan() -> Vec<PilarLayanan> {
    vec![
        PilarLayanan::new(PENDIDIKAN_FORMAL, "Pendidikan Formal", 1),
        PilarLayanan::new(PENDIDIKAN_PESANTREN, "Pendidikan Pesantren", 2),
        PilarLayanan::new(ASRAMA_KONSUMSI, "Asrama & Konsumsi", 3),
        PilarLayanan::new(BANTUAN_LANGSUNG, "Bantuan Langsung Yayasan", 4),
    ]
}

/// The seeded category master rows mirroring the legacy mapping.
pub fn kategori_bawaan() -> Vec<KategoriKeuangan> {
    vec![
        KategoriKeuangan::pengeluaran("Pendidikan Formal", Some(PENDIDIKAN_FORMAL), 1),
        KategoriKeuangan::pengeluaran("Pendidikan Pesantren", Some(PENDIDIKAN_PESANTREN), 2),
        KategoriKeuangan::pengeluaran(
            "Operasional dan Konsumsi Santri",
            Some(ASRAMA_KONSUMSI),
            3,
        ),
        KategoriKeuangan::pengeluaran("Bantuan Langsung Yayasan", Some(BANTUAN_LANGSUNG), 4),
    ]
}
