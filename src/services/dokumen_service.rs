use chrono::Utc;
use uuid::Uuid;

use crate::blob::{path_dokumen, BlobStore, SignedUrl};
use crate::config::Config;
use crate::domain::{Dataset, DokumenSantri, PersyaratanDokumen, StatusSosial, StatusVerifikasi};

use super::{ServiceError, ServiceResult};

/// Content types accepted for document uploads.
const TIPE_FILE_DIDUKUNG: [&str; 6] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Legacy document type values that violate the normalized enumeration.
/// Rows carrying them are deleted whenever a student's documents are loaded.
const JENIS_DIBLOKIR: [&str; 3] = ["Surat Permohonan Bantuan", "SKTM (Dhuafa)", "KTP/KK"];

/// Maps free-form document labels onto the strict enumeration values.
pub fn normalisasi_jenis_dokumen(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let lower = lower.trim();
    if lower.contains("ktp") && lower.contains("utama") {
        return "KTP Wali Utama".into();
    }
    if lower.contains("ktp") && (lower.contains("pendamping") || lower.contains("wali")) {
        return "KTP Wali Pendamping".into();
    }
    if lower.starts_with("sktm") {
        return "SKTM".into();
    }
    if lower.contains("kartu keluarga") || lower == "kk" || lower.contains("ktp/kk") {
        return "Kartu Keluarga".into();
    }
    if lower.contains("pas foto") || lower.contains("foto") {
        return "Pas Foto".into();
    }
    if lower.contains("akta kelahiran") {
        return "Akta Kelahiran".into();
    }
    if lower.contains("ijazah") {
        return "Ijazah Terakhir".into();
    }
    if lower.contains("transkrip") {
        return "Transkrip Nilai".into();
    }
    if lower.contains("surat keterangan sehat") {
        return "Surat Keterangan Sehat".into();
    }
    if lower.contains("akta kematian") && lower.contains("ayah") {
        return "Akta Kematian Ayah".into();
    }
    if lower.contains("akta kematian") && lower.contains("ibu") {
        return "Akta Kematian Ibu".into();
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        "Dokumen".into()
    } else {
        trimmed.into()
    }
}

pub struct DokumenService;

impl DokumenService {
    /// Derives the document requirement set for an enrollment category and
    /// social status. A combination matching no rule still yields the
    /// minimal baseline — a requirement set is never empty.
    pub fn persyaratan(kategori: &str, status_sosial: StatusSosial) -> Vec<PersyaratanDokumen> {
        let lower = kategori.to_lowercase();
        if lower.contains("non-mukim") || lower.contains("non mukim") {
            let mut docs = vec![
                PersyaratanDokumen::wajib("Pas Foto"),
                PersyaratanDokumen::wajib("Kartu Keluarga"),
                PersyaratanDokumen::wajib("Akta Kelahiran"),
                PersyaratanDokumen::wajib("KTP Wali Utama"),
                PersyaratanDokumen::opsional("KTP Wali Pendamping"),
            ];
            Self::tambah_persyaratan_status(&mut docs, status_sosial);
            docs
        } else if lower.contains("binaan mukim") || lower.contains("mukim binaan") {
            let mut docs = vec![
                PersyaratanDokumen::wajib("Pas Foto"),
                PersyaratanDokumen::wajib("Kartu Keluarga"),
                PersyaratanDokumen::wajib("Akta Kelahiran"),
                PersyaratanDokumen::wajib("KTP Wali Utama"),
                PersyaratanDokumen::opsional("KTP Wali Pendamping"),
                PersyaratanDokumen::wajib("Ijazah Terakhir"),
                PersyaratanDokumen::wajib("Transkrip Nilai"),
                PersyaratanDokumen::wajib("Surat Keterangan Sehat"),
            ];
            Self::tambah_persyaratan_status(&mut docs, status_sosial);
            docs.push(PersyaratanDokumen::opsional("Sertifikat Prestasi"));
            docs
        } else if lower.contains("reguler") {
            vec![
                PersyaratanDokumen::wajib("Pas Foto"),
                PersyaratanDokumen::wajib("Kartu Keluarga"),
                PersyaratanDokumen::wajib("Akta Kelahiran"),
                PersyaratanDokumen::opsional("Ijazah Terakhir"),
                PersyaratanDokumen::opsional("Transkrip Nilai"),
            ]
        } else {
            // No category rule matched: minimal baseline.
            vec![
                PersyaratanDokumen::wajib("Pas Foto"),
                PersyaratanDokumen::wajib("Kartu Keluarga"),
            ]
        }
    }

    fn tambah_persyaratan_status(docs: &mut Vec<PersyaratanDokumen>, status: StatusSosial) {
        match status {
            StatusSosial::Yatim => docs.push(PersyaratanDokumen::wajib("Akta Kematian Ayah")),
            StatusSosial::Piatu => docs.push(PersyaratanDokumen::wajib("Akta Kematian Ibu")),
            StatusSosial::YatimPiatu => {
                docs.push(PersyaratanDokumen::wajib("Akta Kematian Ayah"));
                docs.push(PersyaratanDokumen::wajib("Akta Kematian Ibu"));
            }
            StatusSosial::Lengkap | StatusSosial::Dhuafa => {}
        }
        if matches!(
            status,
            StatusSosial::Dhuafa | StatusSosial::Yatim | StatusSosial::Piatu | StatusSosial::YatimPiatu
        ) {
            docs.push(PersyaratanDokumen::wajib("SKTM"));
        }
    }

    /// A student's documents, newest first. Loading also deletes rows whose
    /// type value is in the blocked legacy set, keeping the stored data
    /// inside the normalized enumeration.
    pub fn dokumen_santri(dataset: &mut Dataset, santri_id: Uuid) -> Vec<DokumenSantri> {
        let before = dataset.dokumen.len();
        dataset.dokumen.retain(|d| {
            let blocked =
                d.santri_id == santri_id && JENIS_DIBLOKIR.contains(&d.jenis_dokumen.as_str());
            if blocked {
                tracing::info!(
                    dokumen = %d.id,
                    jenis = %d.jenis_dokumen,
                    "removing blocked legacy document type"
                );
            }
            !blocked
        });
        if dataset.dokumen.len() != before {
            dataset.touch();
        }

        let mut rows: Vec<DokumenSantri> = dataset
            .dokumen
            .iter()
            .filter(|d| d.santri_id == santri_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    /// Pre-upload validation; a failure aborts before anything is written.
    pub fn validasi_file(
        config: &Config,
        nama_file: &str,
        tipe_file: &str,
        ukuran_file: u64,
    ) -> ServiceResult<()> {
        if nama_file.trim().is_empty() {
            return Err(ServiceError::Validation("file name is required".into()));
        }
        if ukuran_file > config.maks_ukuran_file {
            return Err(ServiceError::Validation(format!(
                "file exceeds the {} byte upload limit",
                config.maks_ukuran_file
            )));
        }
        if !TIPE_FILE_DIDUKUNG.contains(&tipe_file) {
            return Err(ServiceError::Validation(format!(
                "unsupported file type `{tipe_file}`; use JPG, PNG, PDF, or DOC"
            )));
        }
        Ok(())
    }

    /// Stores the blob and inserts the document record. The blob is removed
    /// again if the record cannot be attached to an existing student.
    #[allow(clippy::too_many_arguments)]
    pub fn unggah(
        dataset: &mut Dataset,
        blobs: &dyn BlobStore,
        config: &Config,
        santri_id: Uuid,
        jenis_dokumen: &str,
        nama_file: &str,
        tipe_file: &str,
        bytes: &[u8],
    ) -> ServiceResult<DokumenSantri> {
        Self::validasi_file(config, nama_file, tipe_file, bytes.len() as u64)?;
        if dataset.santri(santri_id).is_none() {
            return Err(ServiceError::SantriNotFound(santri_id));
        }

        let jenis = normalisasi_jenis_dokumen(jenis_dokumen);
        let now = Utc::now();
        let path = path_dokumen(santri_id, &jenis, nama_file, now.timestamp_millis());
        blobs.simpan(&path, bytes)?;

        let dokumen = DokumenSantri {
            id: Uuid::new_v4(),
            santri_id,
            jenis_dokumen: jenis,
            nama_file: nama_file.to_string(),
            path_file: path,
            ukuran_file: bytes.len() as u64,
            tipe_file: tipe_file.to_string(),
            status_verifikasi: StatusVerifikasi::BelumDiverifikasi,
            tanggal_verifikasi: None,
            verifikasi_oleh: None,
            catatan_verifikasi: None,
            created_at: now,
        };
        dataset.dokumen.push(dokumen.clone());
        dataset.touch();
        Ok(dokumen)
    }

    /// Removes a document record and its blob. A blob-removal failure is
    /// logged and the record is still removed, matching the original
    /// cleanup order.
    pub fn hapus(
        dataset: &mut Dataset,
        blobs: &dyn BlobStore,
        dokumen_id: Uuid,
    ) -> ServiceResult<()> {
        let path = dataset
            .dokumen
            .iter()
            .find(|d| d.id == dokumen_id)
            .map(|d| d.path_file.clone())
            .ok_or(ServiceError::DokumenNotFound(dokumen_id))?;
        if let Err(err) = blobs.hapus(&path) {
            tracing::warn!(%dokumen_id, %err, "blob removal failed, removing record anyway");
        }
        dataset.dokumen.retain(|d| d.id != dokumen_id);
        dataset.touch();
        Ok(())
    }

    pub fn verifikasi(
        dataset: &mut Dataset,
        dokumen_id: Uuid,
        status: StatusVerifikasi,
        catatan: Option<String>,
        oleh: Option<String>,
    ) -> ServiceResult<()> {
        let dokumen = dataset
            .dokumen
            .iter_mut()
            .find(|d| d.id == dokumen_id)
            .ok_or(ServiceError::DokumenNotFound(dokumen_id))?;
        dokumen.status_verifikasi = status;
        dokumen.tanggal_verifikasi = Some(Utc::now());
        dokumen.catatan_verifikasi = catatan;
        if oleh.is_some() {
            dokumen.verifikasi_oleh = oleh;
        }
        dataset.touch();
        Ok(())
    }

    /// Direct download of one document's bytes.
    pub fn unduh(
        dataset: &Dataset,
        blobs: &dyn BlobStore,
        dokumen_id: Uuid,
    ) -> ServiceResult<Vec<u8>> {
        let dokumen = dataset
            .dokumen
            .iter()
            .find(|d| d.id == dokumen_id)
            .ok_or(ServiceError::DokumenNotFound(dokumen_id))?;
        Ok(blobs.baca(&dokumen.path_file)?)
    }

    /// Time-limited download URL for one document.
    pub fn url_dokumen(
        dataset: &Dataset,
        blobs: &dyn BlobStore,
        config: &Config,
        dokumen_id: Uuid,
    ) -> ServiceResult<SignedUrl> {
        let dokumen = dataset
            .dokumen
            .iter()
            .find(|d| d.id == dokumen_id)
            .ok_or(ServiceError::DokumenNotFound(dokumen_id))?;
        Ok(blobs.signed_url(&dokumen.path_file, config.masa_berlaku_url_detik)?)
    }
}
