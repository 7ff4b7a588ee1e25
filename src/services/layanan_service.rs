use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{pilar, BarisAlokasi, Dataset, SumberBaris};
use crate::periode::{normalisasi_periode, Periode};

use super::{PilarService, SantriService};

/// Per-student realization totals for one period, bucketed by pillar code.
/// The pillar set is open; the four legacy pillars are plain accessors over
/// the same map.
#[derive(Debug, Clone)]
pub struct RealisasiSummary {
    pub santri_id: Uuid,
    pub santri_nama: String,
    pub santri_nisn: Option<String>,
    pub per_pilar: BTreeMap<String, f64>,
    pub total: f64,
}

impl RealisasiSummary {
    pub fn nilai(&self, pilar_kode: &str) -> f64 {
        self.per_pilar.get(pilar_kode).copied().unwrap_or(0.0)
    }

    pub fn pendidikan_formal(&self) -> f64 {
        self.nilai(pilar::PENDIDIKAN_FORMAL)
    }

    pub fn pendidikan_pesantren(&self) -> f64 {
        self.nilai(pilar::PENDIDIKAN_PESANTREN)
    }

    pub fn asrama_konsumsi(&self) -> f64 {
        self.nilai(pilar::ASRAMA_KONSUMSI)
    }

    pub fn bantuan_langsung(&self) -> f64 {
        self.nilai(pilar::BANTUAN_LANGSUNG)
    }

    /// Grand total rendered for display; this is the only place the report
    /// rounds.
    pub fn total_rupiah(&self) -> String {
        crate::format::format_rupiah(self.total)
    }
}

/// One month of a student's allocation history.
#[derive(Debug, Clone)]
pub struct RincianBulanan {
    pub periode: Periode,
    pub per_pilar: BTreeMap<String, f64>,
    pub total: f64,
}

pub struct LayananService;

impl LayananService {
    /// Read-path rows for a period. Only the per-student ledger is consulted
    /// here — it is the system of record for realization; transactions and
    /// legacy allocations feed generation, never this path.
    pub fn baris_ledger(dataset: &Dataset, periode: Periode) -> Vec<BarisAlokasi> {
        dataset
            .ledger_layanan
            .iter()
            .filter(|entry| entry.periode == periode)
            .map(|entry| BarisAlokasi {
                santri_id: entry.santri_id,
                periode: entry.periode,
                pilar_layanan: entry.pilar_layanan.clone(),
                nilai: entry.nilai_layanan,
                sumber: SumberBaris::Ledger {
                    referensi_periodik_id: entry.referensi_periodik_id,
                },
            })
            .collect()
    }

    /// Generation inputs for a per-transaction pillar: posted general-book
    /// expenditure carrying a student reference, plus legacy allocations
    /// whose referenced transaction falls inside the period window. A legacy
    /// allocation whose transaction already carries a student reference is
    /// skipped — that expenditure arrives through the direct variant.
    pub fn baris_generasi(
        dataset: &Dataset,
        periode: Periode,
        pilar_kode: &str,
    ) -> Vec<BarisAlokasi> {
        let kategori_list = PilarService::kategori_untuk_pilar(dataset, pilar_kode);
        let awal = periode.tanggal_awal();
        let akhir = periode.tanggal_akhir();
        let mut rows = Vec::new();

        for tx in dataset.transaksi.iter().filter(|tx| {
            tx.is_pengeluaran_umum()
                && tx.santri_id.is_some()
                && kategori_list.iter().any(|k| *k == tx.kategori)
                && tx.tanggal >= awal
                && tx.tanggal <= akhir
        }) {
            rows.push(BarisAlokasi {
                santri_id: tx.santri_id.unwrap(),
                periode,
                pilar_layanan: pilar_kode.to_string(),
                nilai: tx.jumlah,
                sumber: SumberBaris::TransaksiLangsung { keuangan_id: tx.id },
            });
        }

        for alokasi in &dataset.alokasi_santri {
            let Some(tx) = dataset.transaksi(alokasi.keuangan_id) else {
                tracing::warn!(
                    alokasi = %alokasi.id,
                    "legacy allocation references a missing transaction, skipping"
                );
                continue;
            };
            if tx.santri_id.is_some() {
                continue;
            }
            if !kategori_list.iter().any(|k| *k == tx.kategori) {
                continue;
            }
            if tx.tanggal < awal || tx.tanggal > akhir {
                continue;
            }
            rows.push(BarisAlokasi {
                santri_id: alokasi.santri_id,
                periode,
                pilar_layanan: pilar_kode.to_string(),
                nilai: alokasi.nominal_alokasi,
                sumber: SumberBaris::AlokasiLama {
                    alokasi_id: alokasi.id,
                    keuangan_id: alokasi.keuangan_id,
                },
            });
        }

        rows
    }

    /// Realization report for one period: every active resident-sponsored
    /// student at period end appears, even with all-zero pillar totals.
    pub fn realisasi_layanan(dataset: &Dataset, periode: Periode) -> Vec<RealisasiSummary> {
        let mut summaries: BTreeMap<Uuid, RealisasiSummary> = BTreeMap::new();
        for santri in SantriService::populasi_binaan_mukim(dataset, periode.tanggal_akhir()) {
            summaries.insert(
                santri.id,
                RealisasiSummary {
                    santri_id: santri.id,
                    santri_nama: santri.nama_lengkap.clone(),
                    santri_nisn: santri.nisn.clone(),
                    per_pilar: BTreeMap::new(),
                    total: 0.0,
                },
            );
        }

        for baris in Self::baris_ledger(dataset, periode) {
            let entry = summaries.entry(baris.santri_id).or_insert_with(|| {
                // Ledger rows can reference students that have since left the
                // population; keep their history visible.
                let santri = dataset.santri(baris.santri_id);
                RealisasiSummary {
                    santri_id: baris.santri_id,
                    santri_nama: santri
                        .map(|s| s.nama_lengkap.clone())
                        .unwrap_or_else(|| "Tidak Diketahui".into()),
                    santri_nisn: santri.and_then(|s| s.nisn.clone()),
                    per_pilar: BTreeMap::new(),
                    total: 0.0,
                }
            });
            *entry.per_pilar.entry(baris.pilar_layanan).or_insert(0.0) += baris.nilai;
        }

        let mut out: Vec<RealisasiSummary> = summaries.into_values().collect();
        for summary in &mut out {
            summary.total = summary.per_pilar.values().sum();
        }
        out.sort_by(|a, b| a.santri_nama.cmp(&b.santri_nama));
        out
    }

    /// A student's allocation history grouped by normalized month, newest
    /// first. This view reads the legacy allocation table directly — its own
    /// system of record — so generated ledger rows are never mixed in.
    pub fn rincian_bulanan_santri(dataset: &Dataset, santri_id: Uuid) -> Vec<RincianBulanan> {
        let today = Utc::now().date_naive();
        let mut per_bulan: BTreeMap<Periode, RincianBulanan> = BTreeMap::new();

        for alokasi in dataset
            .alokasi_santri
            .iter()
            .filter(|a| a.santri_id == santri_id)
        {
            let tx = dataset.transaksi(alokasi.keuangan_id);
            let fallback = tx.map(|t| t.tanggal);
            let periode = normalisasi_periode(
                alokasi.periode.as_deref().unwrap_or(""),
                fallback,
                today,
            );

            let pilar_kode = alokasi
                .alokasi_ke
                .clone()
                .or_else(|| {
                    tx.and_then(|t| PilarService::pilar_untuk_kategori(dataset, &t.kategori))
                })
                .unwrap_or_else(|| {
                    tracing::warn!(
                        alokasi = %alokasi.id,
                        "allocation category maps to no pillar, bucketing as `lainnya`"
                    );
                    pilar::LAINNYA.to_string()
                });

            let entry = per_bulan.entry(periode).or_insert_with(|| RincianBulanan {
                periode,
                per_pilar: BTreeMap::new(),
                total: 0.0,
            });
            *entry.per_pilar.entry(pilar_kode).or_insert(0.0) += alokasi.nominal_alokasi;
            entry.total += alokasi.nominal_alokasi;
        }

        let mut out: Vec<RincianBulanan> = per_bulan.into_values().collect();
        out.reverse();
        out
    }

    /// Trailing per-month expenditure totals for one pillar, oldest first.
    /// Used as the generation preview.
    pub fn rincian_bulanan_pilar(
        dataset: &Dataset,
        periode: Periode,
        pilar_kode: &str,
        months_back: u32,
    ) -> Vec<(Periode, f64)> {
        let mut out = Vec::new();
        let mut current = periode;
        for _ in 0..months_back {
            out.push((current, Self::total_pengeluaran_pilar(dataset, current, pilar_kode)));
            current = current.sebelumnya();
        }
        out.reverse();
        out
    }

    /// Sum of qualifying expenditure for a pillar in one period — all posted
    /// general-book expenditure in the pillar's categories, regardless of
    /// student references.
    pub fn total_pengeluaran_pilar(dataset: &Dataset, periode: Periode, pilar_kode: &str) -> f64 {
        let kategori_list = PilarService::kategori_untuk_pilar(dataset, pilar_kode);
        let awal = periode.tanggal_awal();
        let akhir = periode.tanggal_akhir();
        dataset
            .transaksi
            .iter()
            .filter(|tx| {
                tx.is_pengeluaran_umum()
                    && kategori_list.iter().any(|k| *k == tx.kategori)
                    && tx.tanggal >= awal
                    && tx.tanggal <= akhir
            })
            .map(|tx| tx.jumlah)
            .sum()
    }
}
