use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    pilar, Dataset, LedgerLayanan, LedgerLayananPeriodik, StatusPeriodik, SumberBaris,
    SumberPeriodik, SumberPerhitungan,
};
use crate::periode::Periode;

use super::{LayananService, SantriService, ServiceError, ServiceResult};

/// Pillars whose per-student amount is taken directly from transactions
/// bearing the student's reference instead of a flat division.
pub const PILAR_PER_TRANSAKSI: [&str; 2] = [pilar::BANTUAN_LANGSUNG, pilar::PENDIDIKAN_FORMAL];

/// Per-student preview of what a per-transaction generation would produce.
#[derive(Debug, Clone)]
pub struct SantriGeneratePreview {
    pub santri_id: Uuid,
    pub santri_nama: String,
    pub santri_nisn: Option<String>,
    pub total_nilai: f64,
    pub jumlah_transaksi: u32,
}

pub struct GenerateService;

impl GenerateService {
    pub fn is_per_transaksi(pilar_kode: &str) -> bool {
        PILAR_PER_TRANSAKSI.contains(&pilar_kode)
    }

    pub fn periodik_exists(dataset: &Dataset, periode: Periode, pilar_kode: &str) -> bool {
        dataset.ledger_periodik.iter().any(|p| {
            p.periode == periode
                && p.pilar_layanan == pilar_kode
                && p.sumber_perhitungan == SumberPeriodik::Realisasi
        })
    }

    /// Periodic snapshots, newest period first, pillar-ordered within a
    /// period.
    pub fn daftar_periodik<'a>(
        dataset: &'a Dataset,
        periode: Option<Periode>,
        pilar_kode: Option<&str>,
    ) -> Vec<&'a LedgerLayananPeriodik> {
        let mut rows: Vec<&LedgerLayananPeriodik> = dataset
            .ledger_periodik
            .iter()
            .filter(|p| periode.map_or(true, |target| p.periode == target))
            .filter(|p| pilar_kode.map_or(true, |target| p.pilar_layanan == target))
            .collect();
        rows.sort_by(|a, b| {
            b.periode
                .cmp(&a.periode)
                .then_with(|| a.pilar_layanan.cmp(&b.pilar_layanan))
        });
        rows
    }

    /// Removes the realization snapshot for (period, pillar) together with
    /// every per-student row generated from it.
    pub fn hapus_periodik(
        dataset: &mut Dataset,
        periode: Periode,
        pilar_kode: &str,
    ) -> ServiceResult<()> {
        let periodik_ids: Vec<Uuid> = dataset
            .ledger_periodik
            .iter()
            .filter(|p| {
                p.periode == periode
                    && p.pilar_layanan == pilar_kode
                    && p.sumber_perhitungan == SumberPeriodik::Realisasi
            })
            .map(|p| p.id)
            .collect();
        if periodik_ids.is_empty() {
            return Err(ServiceError::InvalidOperation(format!(
                "no realization snapshot for `{pilar_kode}` in {periode}"
            )));
        }
        dataset.ledger_layanan.retain(|entry| {
            entry
                .referensi_periodik_id
                .map_or(true, |id| !periodik_ids.contains(&id))
        });
        dataset
            .ledger_periodik
            .retain(|p| !periodik_ids.contains(&p.id));
        dataset.touch();
        Ok(())
    }

    /// Name-sorted preview of the students a per-transaction generation
    /// would cover, with their summed amounts and row counts.
    pub fn daftar_santri_untuk_generate(
        dataset: &Dataset,
        periode: Periode,
        pilar_kode: &str,
    ) -> ServiceResult<Vec<SantriGeneratePreview>> {
        if !Self::is_per_transaksi(pilar_kode) {
            return Err(ServiceError::Validation(format!(
                "per-transaction preview is only defined for {:?}, got `{pilar_kode}`",
                PILAR_PER_TRANSAKSI
            )));
        }
        let mut per_santri: std::collections::BTreeMap<Uuid, SantriGeneratePreview> =
            std::collections::BTreeMap::new();
        for baris in LayananService::baris_generasi(dataset, periode, pilar_kode) {
            let entry = per_santri.entry(baris.santri_id).or_insert_with(|| {
                let santri = dataset.santri(baris.santri_id);
                SantriGeneratePreview {
                    santri_id: baris.santri_id,
                    santri_nama: santri
                        .map(|s| s.nama_lengkap.clone())
                        .unwrap_or_else(|| "Tidak Diketahui".into()),
                    santri_nisn: santri.and_then(|s| s.nisn.clone()),
                    total_nilai: 0.0,
                    jumlah_transaksi: 0,
                }
            });
            entry.total_nilai += baris.nilai;
            entry.jumlah_transaksi += 1;
        }
        let mut out: Vec<SantriGeneratePreview> = per_santri.into_values().collect();
        out.sort_by(|a, b| a.santri_nama.cmp(&b.santri_nama));
        Ok(out)
    }

    /// Generates the realization snapshot for one (period, pillar) and its
    /// per-student ledger rows. Direct-aid and formal-education pillars are
    /// generated per transaction; every other pillar is flat-divided over
    /// the resident population. Regeneration replaces the prior rows for the
    /// same key, so repeated runs never accumulate duplicates.
    pub fn generate_dari_realisasi(
        dataset: &mut Dataset,
        periode: Periode,
        pilar_kode: &str,
    ) -> ServiceResult<LedgerLayananPeriodik> {
        if dataset.pilar(pilar_kode).is_none() {
            return Err(ServiceError::Validation(format!(
                "unknown pillar `{pilar_kode}`"
            )));
        }
        if Self::is_per_transaksi(pilar_kode) {
            Self::generate_per_transaksi(dataset, periode, pilar_kode)
        } else {
            Self::generate_flat(dataset, periode, pilar_kode)
        }
    }

    /// Flat division: total qualifying expenditure over the resident
    /// population snapshot at period end.
    pub fn generate_flat(
        dataset: &mut Dataset,
        periode: Periode,
        pilar_kode: &str,
    ) -> ServiceResult<LedgerLayananPeriodik> {
        if Self::is_per_transaksi(pilar_kode) {
            return Err(ServiceError::UnsupportedPilar(pilar_kode.to_string()));
        }

        let total = LayananService::total_pengeluaran_pilar(dataset, periode, pilar_kode);
        let populasi: Vec<Uuid> =
            SantriService::populasi_binaan_mukim(dataset, periode.tanggal_akhir())
                .iter()
                .map(|s| s.id)
                .collect();
        if populasi.is_empty() {
            return Err(ServiceError::EmptyPopulation {
                periode,
                pilar: pilar_kode.to_string(),
            });
        }
        let jumlah_santri = populasi.len() as u32;
        let nilai_per_santri = total / jumlah_santri as f64;

        Self::hapus_generasi_sebelumnya(dataset, periode, pilar_kode);

        let periodik = Self::buat_periodik(periode, pilar_kode, total, jumlah_santri, nilai_per_santri);
        let periodik_id = periodik.id;
        dataset.ledger_periodik.push(periodik.clone());
        for santri_id in populasi {
            dataset.ledger_layanan.push(LedgerLayanan {
                id: Uuid::new_v4(),
                santri_id,
                periode,
                pilar_layanan: pilar_kode.to_string(),
                nilai_layanan: nilai_per_santri,
                sumber_perhitungan: SumberPerhitungan::GeneratePeriodik,
                referensi_keuangan_id: None,
                referensi_periodik_id: Some(periodik_id),
                created_at: Utc::now(),
            });
        }
        dataset.touch();
        tracing::info!(
            %periode,
            pilar = pilar_kode,
            jumlah_santri,
            "generated flat-division service ledger"
        );
        Ok(periodik)
    }

    /// Per-transaction generation: one ledger row per qualifying source row,
    /// each keeping its back-reference to the originating transaction.
    pub fn generate_per_transaksi(
        dataset: &mut Dataset,
        periode: Periode,
        pilar_kode: &str,
    ) -> ServiceResult<LedgerLayananPeriodik> {
        let rows = LayananService::baris_generasi(dataset, periode, pilar_kode);
        if rows.is_empty() {
            return Err(ServiceError::EmptyPopulation {
                periode,
                pilar: pilar_kode.to_string(),
            });
        }
        let total: f64 = rows.iter().map(|r| r.nilai).sum();
        let mut santri_ids: Vec<Uuid> = rows.iter().map(|r| r.santri_id).collect();
        santri_ids.sort();
        santri_ids.dedup();
        let jumlah_santri = santri_ids.len() as u32;
        let nilai_per_santri = total / jumlah_santri as f64;

        Self::hapus_generasi_sebelumnya(dataset, periode, pilar_kode);

        let periodik = Self::buat_periodik(periode, pilar_kode, total, jumlah_santri, nilai_per_santri);
        let periodik_id = periodik.id;
        dataset.ledger_periodik.push(periodik.clone());
        for baris in rows {
            let referensi_keuangan_id = match baris.sumber {
                SumberBaris::TransaksiLangsung { keuangan_id } => Some(keuangan_id),
                SumberBaris::AlokasiLama { keuangan_id, .. } => Some(keuangan_id),
                SumberBaris::Ledger { .. } => None,
            };
            dataset.ledger_layanan.push(LedgerLayanan {
                id: Uuid::new_v4(),
                santri_id: baris.santri_id,
                periode,
                pilar_layanan: pilar_kode.to_string(),
                nilai_layanan: baris.nilai,
                sumber_perhitungan: SumberPerhitungan::GeneratePeriodik,
                referensi_keuangan_id,
                referensi_periodik_id: Some(periodik_id),
                created_at: Utc::now(),
            });
        }
        dataset.touch();
        tracing::info!(
            %periode,
            pilar = pilar_kode,
            jumlah_santri,
            "generated per-transaction service ledger"
        );
        Ok(periodik)
    }

    /// Delete-then-insert replacement for the exact (period, pillar, source)
    /// key. The store has no unique constraint covering generated rows, so
    /// idempotence is enforced here.
    fn hapus_generasi_sebelumnya(dataset: &mut Dataset, periode: Periode, pilar_kode: &str) {
        dataset.ledger_periodik.retain(|p| {
            !(p.periode == periode
                && p.pilar_layanan == pilar_kode
                && p.sumber_perhitungan == SumberPeriodik::Realisasi)
        });
        dataset.ledger_layanan.retain(|entry| {
            !(entry.periode == periode
                && entry.pilar_layanan == pilar_kode
                && entry.sumber_perhitungan == SumberPerhitungan::GeneratePeriodik)
        });
    }

    fn buat_periodik(
        periode: Periode,
        pilar_kode: &str,
        total: f64,
        jumlah_santri: u32,
        nilai_per_santri: f64,
    ) -> LedgerLayananPeriodik {
        let now = Utc::now();
        LedgerLayananPeriodik {
            id: Uuid::new_v4(),
            periode,
            pilar_layanan: pilar_kode.to_string(),
            total_pengeluaran: total,
            jumlah_santri_snapshot: jumlah_santri,
            nilai_per_santri,
            sumber_perhitungan: SumberPeriodik::Realisasi,
            status: StatusPeriodik::Draft,
            catatan: None,
            created_at: now,
            updated_at: now,
        }
    }
}
