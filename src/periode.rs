use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Indonesian month names, lowercased, as they appear in legacy period labels.
static BULAN: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    HashMap::from([
        ("januari", 1),
        ("februari", 2),
        ("maret", 3),
        ("april", 4),
        ("mei", 5),
        ("juni", 6),
        ("juli", 7),
        ("agustus", 8),
        ("september", 9),
        ("oktober", 10),
        ("november", 11),
        ("desember", 12),
    ])
});

const NAMA_BULAN: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// A canonical monthly reporting period, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Periode {
    year: i32,
    month: u32,
}

impl Periode {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the period's month.
    pub fn tanggal_awal(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap()
    }

    /// Last day of the period's month.
    pub fn tanggal_akhir(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap() - Duration::days(1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn nama_bulan(&self) -> &'static str {
        NAMA_BULAN[(self.month - 1) as usize]
    }

    /// Display label, e.g. "September 2024".
    pub fn label(&self) -> String {
        format!("{} {}", self.nama_bulan(), self.year)
    }

    pub fn berikutnya(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn sebelumnya(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Inclusive list of periods from `self` through `sampai`.
    pub fn sampai(&self, sampai: Periode) -> Vec<Periode> {
        let mut out = Vec::new();
        let mut current = *self;
        while current <= sampai {
            out.push(current);
            current = current.berikutnya();
        }
        out
    }
}

impl fmt::Display for Periode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Periode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (year_part, month_part) = trimmed
            .split_once('-')
            .ok_or_else(|| format!("invalid period `{trimmed}`"))?;
        if year_part.len() != 4 || month_part.len() != 2 {
            return Err(format!("invalid period `{trimmed}`"));
        }
        let year: i32 = year_part
            .parse()
            .map_err(|_| format!("invalid period year `{year_part}`"))?;
        let month: u32 = month_part
            .parse()
            .map_err(|_| format!("invalid period month `{month_part}`"))?;
        Periode::new(year, month).ok_or_else(|| format!("invalid period month `{month_part}`"))
    }
}

impl TryFrom<String> for Periode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Periode> for String {
    fn from(value: Periode) -> Self {
        value.to_string()
    }
}

/// Normalizes a free-form period label into a canonical [`Periode`].
///
/// Legacy allocation rows carry periods in several shapes: "Desember 2024",
/// a bare "April" with no year, or an already canonical "2024-12". A bare
/// month name takes its year from the originating transaction's date; with
/// no fallback date at all, the current date decides.
///
/// An unrecognized month name in the "<month> <year>" form maps to month
/// "01". That default mirrors the historical data-entry behavior and is a
/// deliberate policy choice, kept so existing reports stay stable; the case
/// is logged so it never passes silently.
pub fn normalisasi_periode(raw: &str, fallback: Option<NaiveDate>, today: NaiveDate) -> Periode {
    let trimmed = raw.trim();

    // "<month name> <4-digit year>", e.g. "Desember 2024"
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.len() == 2 && tokens[1].len() == 4 {
        if let Ok(year) = tokens[1].parse::<i32>() {
            let nama = tokens[0].to_lowercase();
            let month = match BULAN.get(nama.as_str()) {
                Some(&m) => m,
                None => {
                    tracing::warn!(periode = trimmed, "unrecognized month name, defaulting to 01");
                    1
                }
            };
            return Periode { year, month };
        }
    }

    // Bare month name, e.g. "April" — year comes from the transaction date.
    // A word that is not a recognized month still takes the month-name path
    // and lands on the "01" default.
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_alphabetic()) {
        let year = fallback.map(|d| d.year()).unwrap_or_else(|| today.year());
        let month = match BULAN.get(trimmed.to_lowercase().as_str()) {
            Some(&m) => m,
            None => {
                tracing::warn!(periode = trimmed, "unrecognized month name, defaulting to 01");
                1
            }
        };
        return Periode { year, month };
    }

    // Already canonical.
    if let Ok(periode) = trimmed.parse::<Periode>() {
        return periode;
    }

    match fallback {
        Some(date) => Periode::from_date(date),
        None => Periode::from_date(today),
    }
}
