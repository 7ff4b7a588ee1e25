mod common;

use common::{date, santri_mukim};
use santri_core::domain::{Dataset, SumberPerhitungan, Transaksi};
use santri_core::periode::Periode;
use santri_core::services::{GenerateService, LayananService, ServiceError};

fn periode(raw: &str) -> Periode {
    raw.parse().unwrap()
}

fn dataset_with_population(n: usize) -> Dataset {
    let mut dataset = Dataset::new("Generate");
    for i in 0..n {
        santri_mukim(&mut dataset, &format!("Santri {i:02}"));
    }
    dataset
}

#[test]
fn flat_division_splits_the_total_evenly() {
    let mut dataset = dataset_with_population(10);
    dataset.add_transaksi(Transaksi::pengeluaran(
        "Operasional dan Konsumsi Santri",
        12_000_000.0,
        date(2024, 9, 12),
    ));

    let periodik =
        GenerateService::generate_dari_realisasi(&mut dataset, periode("2024-09"), "asrama_konsumsi")
            .expect("generate flat division");

    assert_eq!(periodik.total_pengeluaran, 12_000_000.0);
    assert_eq!(periodik.jumlah_santri_snapshot, 10);
    assert_eq!(periodik.nilai_per_santri, 1_200_000.0);

    let rows: Vec<_> = dataset
        .ledger_layanan
        .iter()
        .filter(|l| l.pilar_layanan == "asrama_konsumsi")
        .collect();
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|l| l.nilai_layanan == 1_200_000.0));
    assert!(rows
        .iter()
        .all(|l| l.sumber_perhitungan == SumberPerhitungan::GeneratePeriodik));
    assert!(rows
        .iter()
        .all(|l| l.referensi_periodik_id == Some(periodik.id)));
}

#[test]
fn regeneration_replaces_rows_instead_of_accumulating() {
    let mut dataset = dataset_with_population(4);
    dataset.add_transaksi(Transaksi::pengeluaran(
        "Pendidikan Pesantren",
        8_000_000.0,
        date(2024, 9, 5),
    ));

    let p = periode("2024-09");
    GenerateService::generate_dari_realisasi(&mut dataset, p, "pendidikan_pesantren").unwrap();
    let rows_first = dataset.ledger_layanan.len();
    let total_first: f64 = dataset.ledger_layanan.iter().map(|l| l.nilai_layanan).sum();

    GenerateService::generate_dari_realisasi(&mut dataset, p, "pendidikan_pesantren").unwrap();
    let total_second: f64 = dataset.ledger_layanan.iter().map(|l| l.nilai_layanan).sum();

    assert_eq!(dataset.ledger_layanan.len(), rows_first);
    assert_eq!(total_first, total_second);
    assert_eq!(
        dataset
            .ledger_periodik
            .iter()
            .filter(|pk| pk.periode == p && pk.pilar_layanan == "pendidikan_pesantren")
            .count(),
        1
    );
}

#[test]
fn empty_population_aborts_before_any_write() {
    let mut dataset = Dataset::new("Generate");
    dataset.add_transaksi(Transaksi::pengeluaran(
        "Operasional dan Konsumsi Santri",
        5_000_000.0,
        date(2024, 9, 12),
    ));

    let err = GenerateService::generate_dari_realisasi(
        &mut dataset,
        periode("2024-09"),
        "asrama_konsumsi",
    )
    .expect_err("no population");
    assert!(matches!(err, ServiceError::EmptyPopulation { .. }));
    assert!(dataset.ledger_periodik.is_empty());
    assert!(dataset.ledger_layanan.is_empty());
}

#[test]
fn per_transaction_pillars_refuse_flat_division() {
    let mut dataset = dataset_with_population(3);
    let err = GenerateService::generate_flat(&mut dataset, periode("2024-09"), "bantuan_langsung")
        .expect_err("direct aid is per transaction");
    assert!(matches!(err, ServiceError::UnsupportedPilar(_)));
}

#[test]
fn per_transaction_generation_keeps_back_references() {
    let mut dataset = dataset_with_population(1);
    let santri_id = dataset.santri[0].id;
    let tx_id = dataset.add_transaksi(
        Transaksi::pengeluaran("Pendidikan Formal", 2_500_000.0, date(2024, 9, 2))
            .untuk_santri(santri_id),
    );

    let periodik = GenerateService::generate_dari_realisasi(
        &mut dataset,
        periode("2024-09"),
        "pendidikan_formal",
    )
    .unwrap();

    assert_eq!(periodik.jumlah_santri_snapshot, 1);
    let row = dataset
        .ledger_layanan
        .iter()
        .find(|l| l.pilar_layanan == "pendidikan_formal")
        .unwrap();
    assert_eq!(row.referensi_keuangan_id, Some(tx_id));
    assert_eq!(row.nilai_layanan, 2_500_000.0);
}

#[test]
fn unknown_pillar_is_rejected_up_front() {
    let mut dataset = dataset_with_population(2);
    let err =
        GenerateService::generate_dari_realisasi(&mut dataset, periode("2024-09"), "tahfidz")
            .expect_err("unknown pillar");
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn snapshot_existence_and_removal() {
    let mut dataset = dataset_with_population(2);
    dataset.add_transaksi(Transaksi::pengeluaran(
        "Operasional dan Konsumsi Santri",
        1_000_000.0,
        date(2024, 9, 1),
    ));
    let p = periode("2024-09");
    assert!(!GenerateService::periodik_exists(&dataset, p, "asrama_konsumsi"));

    GenerateService::generate_dari_realisasi(&mut dataset, p, "asrama_konsumsi").unwrap();
    assert!(GenerateService::periodik_exists(&dataset, p, "asrama_konsumsi"));

    GenerateService::hapus_periodik(&mut dataset, p, "asrama_konsumsi").unwrap();
    assert!(!GenerateService::periodik_exists(&dataset, p, "asrama_konsumsi"));
    assert!(dataset.ledger_layanan.is_empty());
}

#[test]
fn generation_preview_counts_transactions_per_student() {
    let mut dataset = dataset_with_population(2);
    let a = dataset.santri[0].id;
    let b = dataset.santri[1].id;
    for (santri, jumlah, day) in [(a, 500_000.0, 3), (b, 300_000.0, 10), (b, 200_000.0, 21)] {
        dataset.add_transaksi(
            Transaksi::pengeluaran("Bantuan Langsung Yayasan", jumlah, date(2024, 9, day))
                .untuk_santri(santri),
        );
    }

    let preview = GenerateService::daftar_santri_untuk_generate(
        &dataset,
        periode("2024-09"),
        "bantuan_langsung",
    )
    .unwrap();
    assert_eq!(preview.len(), 2);
    let b_row = preview.iter().find(|r| r.santri_id == b).unwrap();
    assert_eq!(b_row.total_nilai, 500_000.0);
    assert_eq!(b_row.jumlah_transaksi, 2);
}

#[test]
fn transactions_outside_the_window_are_ignored() {
    let mut dataset = dataset_with_population(2);
    dataset.add_transaksi(Transaksi::pengeluaran(
        "Operasional dan Konsumsi Santri",
        3_000_000.0,
        date(2024, 9, 15),
    ));
    dataset.add_transaksi(Transaksi::pengeluaran(
        "Operasional dan Konsumsi Santri",
        9_999_999.0,
        date(2024, 10, 1),
    ));

    let total =
        LayananService::total_pengeluaran_pilar(&dataset, periode("2024-09"), "asrama_konsumsi");
    assert_eq!(total, 3_000_000.0);
}
