//! Persisted entity models, the dataset aggregate, and helpers.

pub mod dataset;
pub mod dokumen;
pub mod keuangan;
pub mod layanan;
pub mod pilar;
pub mod santri;
pub mod wali;

pub use dataset::Dataset;
pub use dokumen::{DokumenSantri, PersyaratanDokumen, StatusVerifikasi};
pub use keuangan::{AlokasiPengeluaranSantri, JenisTransaksi, StatusTransaksi, Transaksi};
pub use layanan::{
    BarisAlokasi, LedgerLayanan, LedgerLayananPeriodik, StatusPeriodik, SumberBaris,
    SumberPeriodik, SumberPerhitungan,
};
pub use pilar::{KategoriKeuangan, PilarLayanan};
pub use santri::{Santri, SantriStatus, StatusSosial};
pub use wali::Wali;
