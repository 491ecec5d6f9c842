//! Grouped counts over a merged table: the series behind the descriptive
//! charts (series per start year, per decade and category, genre shares).

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use serde::Serialize;

use super::model::MergedTable;

/// Label of the bucket collecting small shares in [`genre_shares`].
pub const OTHER: &str = "Other";

/// Number of rows per year of a date column, ascending by year.
pub fn count_by_year(table: &MergedTable, date_column: &str) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for date in table.dates(date_column).unwrap_or_default().into_iter().flatten() {
        *counts.entry(date.year()).or_insert(0) += 1;
    }
    counts
}

/// Number of rows per (decade, category) for dates from `since_year` on.
/// Rows without a date or a category are not counted.
pub fn count_by_decade(
    table: &MergedTable,
    date_column: &str,
    category_column: &str,
    since_year: i32,
) -> BTreeMap<(i32, String), usize> {
    let mut counts = BTreeMap::new();
    let (Some(dates), Some(categories)) = (table.dates(date_column), table.column(category_column))
    else {
        return counts;
    };

    for (row, date) in dates.iter().enumerate() {
        let (Some(date), Some(category)) = (date, categories.get(row)) else {
            continue;
        };
        if date.year() < since_year {
            continue;
        }
        let decade = date.year().div_euclid(10) * 10;
        *counts.entry((decade, category.to_string())).or_insert(0) += 1;
    }
    counts
}

/// One slice of the genre breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub label: String,
    pub count: usize,
    /// Percentage of all counted values.
    pub percent: f64,
}

/// Split a multi-valued column on `separator`, count each value and express
/// the counts as percentages.
///
/// Values below `threshold` percent are folded into a trailing [`OTHER`]
/// share (omitted when nothing falls below).  Shares are sorted by count,
/// largest first, ties by label.
pub fn genre_shares(table: &MergedTable, column: &str, separator: &str, threshold: f64) -> Vec<Share> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    if let Some(col) = table.column(column) {
        for cell in col.values.iter().flatten() {
            for genre in cell.split(separator).map(str::trim).filter(|g| !g.is_empty()) {
                *counts.entry(genre).or_insert(0) += 1;
            }
        }
    }

    let total: usize = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut counts: Vec<(&str, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut shares = Vec::new();
    let mut other = Share {
        label: OTHER.to_string(),
        count: 0,
        percent: 0.0,
    };
    for (label, count) in counts {
        let percent = count as f64 / total as f64 * 100.0;
        if percent < threshold {
            other.count += count;
            other.percent += percent;
        } else {
            shares.push(Share {
                label: label.to_string(),
                count,
                percent,
            });
        }
    }
    if other.count > 0 {
        shares.push(other);
    }
    shares
}
