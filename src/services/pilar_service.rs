use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::domain::{pilar, Dataset, PilarLayanan};

use super::{ServiceError, ServiceResult};

/// Fixed legacy category→pillar table, kept for datasets whose master rows
/// predate the dynamic mapping.
static PILAR_LEGACY: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Pendidikan Pesantren", pilar::PENDIDIKAN_PESANTREN),
        ("Operasional dan Konsumsi Santri", pilar::ASRAMA_KONSUMSI),
        ("Pendidikan Formal", pilar::PENDIDIKAN_FORMAL),
        ("Bantuan Langsung Yayasan", pilar::BANTUAN_LANGSUNG),
    ])
});

pub struct PilarService;

impl PilarService {
    /// Resolves a category label to a pillar code: the dynamic master table
    /// first, then the fixed legacy table. `None` means unmapped — callers
    /// bucket such rows, they never abort the batch.
    pub fn pilar_untuk_kategori(dataset: &Dataset, kategori: &str) -> Option<String> {
        let dynamic = dataset
            .master_kategori
            .iter()
            .find(|k| k.aktif && k.nama == kategori)
            .and_then(|k| k.pilar_layanan_kode.clone());
        if dynamic.is_some() {
            return dynamic;
        }
        Self::pilar_legacy(kategori).map(str::to_string)
    }

    /// Static legacy mode only.
    pub fn pilar_legacy(kategori: &str) -> Option<&'static str> {
        PILAR_LEGACY.get(kategori).copied()
    }

    /// Reverse lookup: all category labels feeding the given pillar. Feeds
    /// the generator's transaction filter.
    pub fn kategori_untuk_pilar(dataset: &Dataset, pilar_kode: &str) -> Vec<String> {
        let mut names: Vec<String> = dataset
            .master_kategori
            .iter()
            .filter(|k| k.aktif && k.pilar_layanan_kode.as_deref() == Some(pilar_kode))
            .map(|k| k.nama.clone())
            .collect();
        for (nama, kode) in PILAR_LEGACY.iter() {
            if *kode == pilar_kode && !names.iter().any(|n| n == nama) {
                names.push((*nama).to_string());
            }
        }
        names.sort();
        names
    }

    pub fn daftar_pilar(dataset: &Dataset, aktif_only: bool) -> Vec<&PilarLayanan> {
        let mut rows: Vec<&PilarLayanan> = dataset
            .master_pilar
            .iter()
            .filter(|p| !aktif_only || p.aktif)
            .collect();
        rows.sort_by(|a, b| a.urutan.cmp(&b.urutan).then_with(|| a.nama.cmp(&b.nama)));
        rows
    }

    pub fn tambah_pilar(dataset: &mut Dataset, pilar: PilarLayanan) -> ServiceResult<()> {
        if pilar.kode.trim().is_empty() {
            return Err(ServiceError::Validation("pillar code is required".into()));
        }
        if dataset.pilar(&pilar.kode).is_some() {
            return Err(ServiceError::Validation(format!(
                "pillar code `{}` already exists",
                pilar.kode
            )));
        }
        dataset.master_pilar.push(pilar);
        dataset.touch();
        Ok(())
    }

    /// Removing a pillar is refused while ledger rows or category rows still
    /// reference its code.
    pub fn hapus_pilar(dataset: &mut Dataset, kode: &str) -> ServiceResult<()> {
        let used_by_ledger = dataset.ledger_layanan.iter().any(|l| l.pilar_layanan == kode)
            || dataset.ledger_periodik.iter().any(|l| l.pilar_layanan == kode);
        let used_by_kategori = dataset
            .master_kategori
            .iter()
            .any(|k| k.pilar_layanan_kode.as_deref() == Some(kode));
        if used_by_ledger || used_by_kategori {
            return Err(ServiceError::InvalidOperation(format!(
                "pillar `{kode}` is still referenced"
            )));
        }
        let before = dataset.master_pilar.len();
        dataset.master_pilar.retain(|p| p.kode != kode);
        if dataset.master_pilar.len() == before {
            return Err(ServiceError::InvalidOperation(format!(
                "pillar `{kode}` not found"
            )));
        }
        dataset.touch();
        Ok(())
    }
}
