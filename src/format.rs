//! Display formatting for amounts and dates. Aggregation never rounds;
//! rounding happens here, at render time only.

use chrono::{Datelike, NaiveDate};

/// Formats an amount as Indonesian Rupiah, e.g. `Rp 1.200.000`. Rupiah has
/// no minor units in day-to-day reporting, so the value is rounded to whole
/// rupiah.
pub fn format_rupiah(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_digits(&digits, '.');
    if negative {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

/// Formats a date the way reports render it, e.g. `5 September 2024`.
pub fn format_tanggal(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        bulan_label(date.month()),
        date.year()
    )
}

fn bulan_label(month: u32) -> &'static str {
    match month {
        1 => "Januari",
        2 => "Februari",
        3 => "Maret",
        4 => "April",
        5 => "Mei",
        6 => "Juni",
        7 => "Juli",
        8 => "Agustus",
        9 => "September",
        10 => "Oktober",
        11 => "November",
        12 => "Desember",
        _ => "",
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    let mut count = 0;
    for ch in digits.chars().rev() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
        count += 1;
    }
    grouped
}
