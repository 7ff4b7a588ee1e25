mod common;

use common::{date, santri_mukim};
use santri_core::domain::{Dataset, Transaksi};
use santri_core::periode::Periode;
use santri_core::services::{GenerateService, LayananService};

fn periode(raw: &str) -> Periode {
    raw.parse().unwrap()
}

#[test]
fn every_population_member_appears_even_with_zero_totals() {
    let mut dataset = Dataset::new("Realisasi");
    santri_mukim(&mut dataset, "Budi");
    santri_mukim(&mut dataset, "Candra");

    let summaries = LayananService::realisasi_layanan(&dataset, periode("2024-09"));
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|s| s.total == 0.0));
    assert!(summaries.iter().all(|s| s.per_pilar.is_empty()));
}

#[test]
fn direct_aid_transactions_aggregate_per_student() {
    let mut dataset = Dataset::new("Realisasi");
    let a = santri_mukim(&mut dataset, "Aisyah");
    let b = santri_mukim(&mut dataset, "Budi");

    for (santri, jumlah, day) in [(a, 500_000.0, 3), (b, 300_000.0, 10), (b, 200_000.0, 21)] {
        dataset.add_transaksi(
            Transaksi::pengeluaran("Bantuan Langsung Yayasan", jumlah, date(2024, 9, day))
                .untuk_santri(santri),
        );
    }
    GenerateService::generate_dari_realisasi(&mut dataset, periode("2024-09"), "bantuan_langsung")
        .expect("generate direct aid");

    let summaries = LayananService::realisasi_layanan(&dataset, periode("2024-09"));
    let aisyah = summaries.iter().find(|s| s.santri_nama == "Aisyah").unwrap();
    let budi = summaries.iter().find(|s| s.santri_nama == "Budi").unwrap();
    assert_eq!(aisyah.bantuan_langsung(), 500_000.0);
    assert_eq!(budi.bantuan_langsung(), 500_000.0);
    assert_eq!(budi.total_rupiah(), "Rp 500.000");
}

#[test]
fn per_pilar_totals_add_up_to_the_grand_total() {
    let mut dataset = Dataset::new("Realisasi");
    let a = santri_mukim(&mut dataset, "Aisyah");
    santri_mukim(&mut dataset, "Budi");

    dataset.add_transaksi(
        Transaksi::pengeluaran("Bantuan Langsung Yayasan", 123_456.78, date(2024, 9, 3))
            .untuk_santri(a),
    );
    dataset.add_transaksi(Transaksi::pengeluaran(
        "Operasional dan Konsumsi Santri",
        1_000_001.0,
        date(2024, 9, 14),
    ));
    let p = periode("2024-09");
    GenerateService::generate_dari_realisasi(&mut dataset, p, "bantuan_langsung").unwrap();
    GenerateService::generate_dari_realisasi(&mut dataset, p, "asrama_konsumsi").unwrap();

    for summary in LayananService::realisasi_layanan(&dataset, p) {
        let sum: f64 = summary.per_pilar.values().sum();
        assert_eq!(
            sum, summary.total,
            "additivity broke for {}",
            summary.santri_nama
        );
    }
}

#[test]
fn report_reads_the_ledger_only_never_raw_transactions() {
    let mut dataset = Dataset::new("Realisasi");
    let a = santri_mukim(&mut dataset, "Aisyah");
    // A direct transaction that was never generated into the ledger must not
    // leak into the realization report.
    dataset.add_transaksi(
        Transaksi::pengeluaran("Bantuan Langsung Yayasan", 900_000.0, date(2024, 9, 3))
            .untuk_santri(a),
    );

    let summaries = LayananService::realisasi_layanan(&dataset, periode("2024-09"));
    let aisyah = summaries.iter().find(|s| s.santri_nama == "Aisyah").unwrap();
    assert_eq!(aisyah.bantuan_langsung(), 0.0);
}

#[test]
fn pillar_preview_sums_trailing_months_oldest_first() {
    let mut dataset = Dataset::new("Preview");
    dataset.add_transaksi(Transaksi::pengeluaran(
        "Operasional dan Konsumsi Santri",
        400_000.0,
        date(2024, 8, 10),
    ));
    dataset.add_transaksi(Transaksi::pengeluaran(
        "Operasional dan Konsumsi Santri",
        600_000.0,
        date(2024, 9, 10),
    ));

    let breakdown =
        LayananService::rincian_bulanan_pilar(&dataset, periode("2024-09"), "asrama_konsumsi", 3);
    assert_eq!(breakdown.len(), 3);
    assert_eq!(breakdown[0].0.to_string(), "2024-07");
    assert_eq!(breakdown[0].1, 0.0);
    assert_eq!(breakdown[1].1, 400_000.0);
    assert_eq!(breakdown[2].1, 600_000.0);
}
