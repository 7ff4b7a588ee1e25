#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use santri_core::domain::{Dataset, Santri};
use uuid::Uuid;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn enrolled_at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(date(y, m, d).and_hms_opt(8, 0, 0).unwrap(), Utc)
}

/// An active resident-sponsored student enrolled early enough to count in
/// every 2024 population snapshot.
pub fn santri_mukim(dataset: &mut Dataset, nama: &str) -> Uuid {
    let mut santri = Santri::new(nama, "Santri Binaan Mukim");
    santri.created_at = enrolled_at(2024, 1, 1);
    santri.updated_at = santri.created_at;
    dataset.add_santri(santri)
}
