use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ledger book tag for general foundation expenditure.
pub const LEDGER_UMUM: &str = "UMUM";

/// A financial transaction in the foundation's books. Expenditure rows that
/// carry a `santri_id` feed the per-transaction service pillars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaksi {
    pub id: Uuid,
    pub jenis_transaksi: JenisTransaksi,
    /// Category label into the financial master table.
    pub kategori: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_kategori: Option<String>,
    pub jumlah: f64,
    pub tanggal: NaiveDate,
    pub status: StatusTransaksi,
    /// Book tag; service generation only reads the "UMUM" book.
    pub ledger: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub santri_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keterangan: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaksi {
    /// A posted general-book expenditure, the shape the generator consumes.
    pub fn pengeluaran(kategori: impl Into<String>, jumlah: f64, tanggal: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            jenis_transaksi: JenisTransaksi::Pengeluaran,
            kategori: kategori.into(),
            sub_kategori: None,
            jumlah,
            tanggal,
            status: StatusTransaksi::Posted,
            ledger: LEDGER_UMUM.into(),
            santri_id: None,
            keterangan: None,
            created_at: Utc::now(),
        }
    }

    pub fn untuk_santri(mut self, santri_id: Uuid) -> Self {
        self.santri_id = Some(santri_id);
        self
    }

    /// Whether this row qualifies as generator input: a posted expenditure
    /// in the general book.
    pub fn is_pengeluaran_umum(&self) -> bool {
        self.jenis_transaksi == JenisTransaksi::Pengeluaran
            && self.status == StatusTransaksi::Posted
            && self.ledger == LEDGER_UMUM
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JenisTransaksi {
    Pemasukan,
    Pengeluaran,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatusTransaksi {
    Draft,
    Posted,
}

/// Legacy manual per-student allocation. The period label is free-form
/// ("April", "Desember 2024"); period membership is decided at read time
/// from the referenced transaction's date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlokasiPengeluaranSantri {
    pub id: Uuid,
    pub santri_id: Uuid,
    pub keuangan_id: Uuid,
    pub nominal_alokasi: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periode: Option<String>,
    /// Pillar hint written by newer allocation forms; older rows rely on the
    /// transaction's category instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alokasi_ke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keterangan: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AlokasiPengeluaranSantri {
    pub fn new(santri_id: Uuid, keuangan_id: Uuid, nominal_alokasi: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            santri_id,
            keuangan_id,
            nominal_alokasi,
            periode: None,
            alokasi_ke: None,
            keterangan: None,
            created_at: Utc::now(),
        }
    }
}
