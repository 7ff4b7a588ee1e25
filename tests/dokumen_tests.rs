mod common;

use chrono::Utc;
use common::santri_mukim;
use santri_core::blob::FsBlobStore;
use santri_core::config::Config;
use santri_core::domain::{Dataset, DokumenSantri, StatusVerifikasi};
use santri_core::services::{DokumenService, ServiceError};
use tempfile::TempDir;
use uuid::Uuid;

fn blob_store() -> (FsBlobStore, TempDir) {
    let temp = TempDir::new().unwrap();
    let store = FsBlobStore::new(temp.path().to_path_buf()).unwrap();
    (store, temp)
}

#[test]
fn upload_stores_the_blob_and_the_record() {
    let (blobs, _guard) = blob_store();
    let config = Config::default();
    let mut dataset = Dataset::new("Dokumen");
    let santri_id = santri_mukim(&mut dataset, "Budi");

    let dokumen = DokumenService::unggah(
        &mut dataset,
        &blobs,
        &config,
        santri_id,
        "pas foto",
        "foto_budi.jpg",
        "image/jpeg",
        b"fake-jpeg-bytes",
    )
    .expect("upload");

    assert_eq!(dokumen.jenis_dokumen, "Pas Foto");
    assert!(dokumen.path_file.starts_with(&format!("santri/{santri_id}/Pas Foto/")));
    assert!(dokumen.path_file.ends_with(".jpg"));
    assert_eq!(dokumen.status_verifikasi, StatusVerifikasi::BelumDiverifikasi);
    assert_eq!(blobs.baca(&dokumen.path_file).unwrap(), b"fake-jpeg-bytes");
}

#[test]
fn oversized_files_are_rejected_without_writes() {
    let (blobs, guard) = blob_store();
    let mut config = Config::default();
    config.maks_ukuran_file = 8;
    let mut dataset = Dataset::new("Dokumen");
    let santri_id = santri_mukim(&mut dataset, "Budi");

    let err = DokumenService::unggah(
        &mut dataset,
        &blobs,
        &config,
        santri_id,
        "Pas Foto",
        "foto.jpg",
        "image/jpeg",
        b"way too many bytes",
    )
    .expect_err("oversize");
    assert!(matches!(err, ServiceError::Validation(_)));
    assert!(dataset.dokumen.is_empty());
    assert_eq!(std::fs::read_dir(guard.path()).unwrap().count(), 0);
}

#[test]
fn unsupported_content_types_are_rejected() {
    let (blobs, _guard) = blob_store();
    let config = Config::default();
    let mut dataset = Dataset::new("Dokumen");
    let santri_id = santri_mukim(&mut dataset, "Budi");

    let err = DokumenService::unggah(
        &mut dataset,
        &blobs,
        &config,
        santri_id,
        "Pas Foto",
        "virus.exe",
        "application/x-msdownload",
        b"MZ",
    )
    .expect_err("bad type");
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn loading_documents_purges_blocked_legacy_types() {
    let mut dataset = Dataset::new("Dokumen");
    let santri_id = santri_mukim(&mut dataset, "Budi");
    let now = Utc::now();
    for jenis in ["KTP/KK", "SKTM (Dhuafa)", "Pas Foto"] {
        dataset.dokumen.push(DokumenSantri {
            id: Uuid::new_v4(),
            santri_id,
            jenis_dokumen: jenis.into(),
            nama_file: "berkas.pdf".into(),
            path_file: format!("santri/{santri_id}/{jenis}/1.pdf"),
            ukuran_file: 3,
            tipe_file: "application/pdf".into(),
            status_verifikasi: StatusVerifikasi::BelumDiverifikasi,
            tanggal_verifikasi: None,
            verifikasi_oleh: None,
            catatan_verifikasi: None,
            created_at: now,
        });
    }

    let docs = DokumenService::dokumen_santri(&mut dataset, santri_id);
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].jenis_dokumen, "Pas Foto");
    // The blocked rows are gone from the snapshot itself, not just filtered.
    assert_eq!(dataset.dokumen.len(), 1);
}

#[test]
fn verification_and_signed_url_flow() {
    let (blobs, _guard) = blob_store();
    let config = Config::default();
    let mut dataset = Dataset::new("Dokumen");
    let santri_id = santri_mukim(&mut dataset, "Budi");

    let dokumen = DokumenService::unggah(
        &mut dataset,
        &blobs,
        &config,
        santri_id,
        "Kartu Keluarga",
        "kk.pdf",
        "application/pdf",
        b"%PDF-1.4",
    )
    .unwrap();

    DokumenService::verifikasi(
        &mut dataset,
        dokumen.id,
        StatusVerifikasi::Diverifikasi,
        Some("lengkap".into()),
        Some("admin".into()),
    )
    .unwrap();
    let updated = dataset
        .dokumen
        .iter()
        .find(|d| d.id == dokumen.id)
        .unwrap();
    assert_eq!(updated.status_verifikasi, StatusVerifikasi::Diverifikasi);
    assert!(updated.tanggal_verifikasi.is_some());

    let signed = DokumenService::url_dokumen(&dataset, &blobs, &config, dokumen.id).unwrap();
    assert!(signed.expires_at > Utc::now());
    assert!(signed.expires_at <= Utc::now() + chrono::Duration::seconds(3600));

    let bytes = DokumenService::unduh(&dataset, &blobs, dokumen.id).unwrap();
    assert_eq!(bytes, b"%PDF-1.4");
}

#[test]
fn delete_removes_record_and_blob() {
    let (blobs, _guard) = blob_store();
    let config = Config::default();
    let mut dataset = Dataset::new("Dokumen");
    let santri_id = santri_mukim(&mut dataset, "Budi");

    let dokumen = DokumenService::unggah(
        &mut dataset,
        &blobs,
        &config,
        santri_id,
        "Pas Foto",
        "foto.png",
        "image/png",
        b"png-bytes",
    )
    .unwrap();

    DokumenService::hapus(&mut dataset, &blobs, dokumen.id).unwrap();
    assert!(dataset.dokumen.is_empty());
    assert!(blobs.baca(&dokumen.path_file).is_err());
}
