use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::periode::Periode;

/// Per-student service allocation entry. This table is the system of record
/// for realization reads; the other sources only feed generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerLayanan {
    pub id: Uuid,
    pub santri_id: Uuid,
    pub periode: Periode,
    pub pilar_layanan: String,
    pub nilai_layanan: f64,
    pub sumber_perhitungan: SumberPerhitungan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referensi_keuangan_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referensi_periodik_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// How a per-student entry was computed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SumberPerhitungan {
    BantuanLangsung,
    GeneratePeriodik,
    Rancangan,
}

/// Monthly snapshot of one pillar: total expenditure, population count at
/// period end, and the computed per-head share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerLayananPeriodik {
    pub id: Uuid,
    pub periode: Periode,
    pub pilar_layanan: String,
    pub total_pengeluaran: f64,
    pub jumlah_santri_snapshot: u32,
    pub nilai_per_santri: f64,
    pub sumber_perhitungan: SumberPeriodik,
    pub status: StatusPeriodik,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catatan: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SumberPeriodik {
    Realisasi,
    Rancangan,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatusPeriodik {
    Draft,
    Finalized,
}

/// A raw allocation row tagged with the physical table it came from. The
/// tag keeps read paths and generation inputs from ever mixing: a given
/// logical expenditure is consumed through exactly one variant per context.
#[derive(Debug, Clone)]
pub struct BarisAlokasi {
    pub santri_id: Uuid,
    pub periode: Periode,
    pub pilar_layanan: String,
    pub nilai: f64,
    pub sumber: SumberBaris,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SumberBaris {
    /// Per-student ledger row, optionally tied to its periodic snapshot.
    Ledger { referensi_periodik_id: Option<Uuid> },
    /// Posted expenditure transaction carrying a student reference.
    TransaksiLangsung { keuangan_id: Uuid },
    /// Legacy manual allocation joined to its originating transaction.
    AlokasiLama { alokasi_id: Uuid, keuangan_id: Uuid },
}
