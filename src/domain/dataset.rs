use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    dokumen::DokumenSantri,
    keuangan::{AlokasiPengeluaranSantri, Transaksi},
    layanan::{LedgerLayanan, LedgerLayananPeriodik},
    pilar::{kategori_bawaan, pilar_bawaan, KategoriKeuangan, PilarLayanan},
    santri::Santri,
    wali::Wali,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// The whole administration snapshot held as one document. Services query
/// and mutate it in memory; persistence writes it back in a single atomic
/// save, so multi-step operations never leave a partially written store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub santri: Vec<Santri>,
    #[serde(default)]
    pub wali: Vec<Wali>,
    #[serde(default)]
    pub dokumen: Vec<DokumenSantri>,
    #[serde(default)]
    pub transaksi: Vec<Transaksi>,
    #[serde(default)]
    pub alokasi_santri: Vec<AlokasiPengeluaranSantri>,
    #[serde(default)]
    pub ledger_layanan: Vec<LedgerLayanan>,
    #[serde(default)]
    pub ledger_periodik: Vec<LedgerLayananPeriodik>,
    #[serde(default)]
    pub master_pilar: Vec<PilarLayanan>,
    #[serde(default)]
    pub master_kategori: Vec<KategoriKeuangan>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Dataset::schema_version_default")]
    pub schema_version: u8,
}

impl Dataset {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            santri: Vec::new(),
            wali: Vec::new(),
            dokumen: Vec::new(),
            transaksi: Vec::new(),
            alokasi_santri: Vec::new(),
            ledger_layanan: Vec::new(),
            ledger_periodik: Vec::new(),
            master_pilar: pilar_bawaan(),
            master_kategori: kategori_bawaan(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_santri(&mut self, santri: Santri) -> Uuid {
        let id = santri.id;
        self.santri.push(santri);
        self.touch();
        id
    }

    pub fn add_wali(&mut self, wali: Wali) -> Uuid {
        let id = wali.id;
        self.wali.push(wali);
        self.touch();
        id
    }

    pub fn add_transaksi(&mut self, transaksi: Transaksi) -> Uuid {
        let id = transaksi.id;
        self.transaksi.push(transaksi);
        self.touch();
        id
    }

    pub fn add_alokasi(&mut self, alokasi: AlokasiPengeluaranSantri) -> Uuid {
        let id = alokasi.id;
        self.alokasi_santri.push(alokasi);
        self.touch();
        id
    }

    pub fn santri(&self, id: Uuid) -> Option<&Santri> {
        self.santri.iter().find(|s| s.id == id)
    }

    pub fn santri_mut(&mut self, id: Uuid) -> Option<&mut Santri> {
        self.santri.iter_mut().find(|s| s.id == id)
    }

    pub fn transaksi(&self, id: Uuid) -> Option<&Transaksi> {
        self.transaksi.iter().find(|t| t.id == id)
    }

    pub fn pilar(&self, kode: &str) -> Option<&PilarLayanan> {
        self.master_pilar.iter().find(|p| p.kode == kode)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_dataset_seeds_legacy_masters() {
        let dataset = Dataset::new("Pesantren");
        assert_eq!(dataset.master_pilar.len(), 4);
        assert_eq!(dataset.master_kategori.len(), 4);
        assert!(dataset.pilar("asrama_konsumsi").is_some());
    }

    #[test]
    fn add_santri_touches_the_snapshot() {
        let mut dataset = Dataset::new("Pesantren");
        let before = dataset.updated_at;
        let id = dataset.add_santri(Santri::new("Ahmad", "Reguler"));
        assert!(dataset.santri(id).is_some());
        assert!(dataset.updated_at >= before);
    }
}
