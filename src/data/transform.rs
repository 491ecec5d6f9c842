use std::collections::HashMap;

use serde::Serialize;

use super::filter::Mask;
use super::model::{Key, MergedTable};

/// Placeholder URL for rows missing either URL part.
pub const NOT_AVAILABLE: &str = "NOT AVAILABLE";

// ---------------------------------------------------------------------------
// Airing spans
// ---------------------------------------------------------------------------

/// Days between two date columns, per row.  `None` when either date is
/// missing or unparsable.
pub fn air_days(table: &MergedTable, start: &str, end: &str) -> Vec<Option<i64>> {
    let (Some(starts), Some(ends)) = (table.dates(start), table.dates(end)) else {
        return vec![None; table.len()];
    };
    starts
        .iter()
        .zip(&ends)
        .map(|(s, e)| Some((((*e)?) - ((*s)?)).num_days()))
        .collect()
}

/// Rows where both dates are present and `start` is strictly before `end`.
pub fn coherent_dates(table: &MergedTable, start: &str, end: &str) -> Mask {
    let days = air_days(table, start, end);
    Mask::from_fn(table.len(), |row| days[row].is_some_and(|d| d > 0))
}

/// One row of [`longest_running`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiringSpan {
    pub row: usize,
    pub key: Key,
    pub days: i64,
}

/// The `n` rows with the longest coherent span between `start` and `end`,
/// longest first.  Ties keep table order.
pub fn longest_running(table: &MergedTable, start: &str, end: &str, n: usize) -> Vec<AiringSpan> {
    let mut spans: Vec<AiringSpan> = air_days(table, start, end)
        .into_iter()
        .enumerate()
        .filter_map(|(row, days)| {
            let days = days.filter(|d| *d > 0)?;
            Some(AiringSpan {
                row,
                key: table.keys()[row].clone(),
                days,
            })
        })
        .collect();
    spans.sort_by(|a, b| b.days.cmp(&a.days));
    spans.truncate(n);
    spans
}

// ---------------------------------------------------------------------------
// Poster URLs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PosterUrl {
    pub name: String,
    pub url: String,
}

/// Build `name → homepage + poster` for every row with a name.
///
/// When either part is missing the URL is [`NOT_AVAILABLE`].  Entries keep
/// first-seen name order; a repeated name overwrites the earlier URL in place.
pub fn poster_urls(table: &MergedTable, name: &str, homepage: &str, poster: &str) -> Vec<PosterUrl> {
    let mut urls: Vec<PosterUrl> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in 0..table.len() {
        let Some(title) = table.cell(row, name) else {
            continue;
        };
        let url = match (table.cell(row, homepage), table.cell(row, poster)) {
            (Some(base), Some(file)) => format!("{base}{file}"),
            _ => NOT_AVAILABLE.to_string(),
        };

        match positions.get(title) {
            Some(&i) => urls[i].url = url,
            None => {
                positions.insert(title.to_string(), urls.len());
                urls.push(PosterUrl {
                    name: title.to_string(),
                    url,
                });
            }
        }
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn table(columns: &[&str], rows: &[&[&str]]) -> MergedTable {
        let mut table = MergedTable::new("id");
        let cols: Vec<usize> = columns
            .iter()
            .map(|n| table.push_column(Column::new(*n, "t.csv")))
            .collect();
        for (i, row) in rows.iter().enumerate() {
            let r = table.row_for(Key::Int(i as i64));
            for (c, v) in cols.iter().zip(row.iter()) {
                table.set_cell(*c, r, (!v.is_empty()).then(|| v.to_string()));
            }
        }
        table.finish();
        table
    }

    fn date_pairs() -> MergedTable {
        table(
            &["date", "date2"],
            &[
                &["2010-10-03", "2015-10-03"],
                &["2015-10-03", "2005-10-03"],
                &["2015-10-03", "2016-10-03"],
                &["2010-10-13", "2010-12-13"],
                &["2007-10-03", "2008-10-03"],
                &["2023-10-03", "2009-10-03"],
                &["2005-07-03", "2007-07-03"],
                &["2011-03-03", "2018-03-03"],
            ],
        )
    }

    #[test]
    fn coherent_dates_drop_reversed_spans() {
        let table = date_pairs();
        assert_eq!(coherent_dates(&table, "date", "date2").count(), 6);
    }

    #[test]
    fn air_days_handles_missing_dates() {
        let t = table(&["a", "b"], &[&["2020-01-01", "2020-01-31"], &["", "2020-01-31"]]);
        assert_eq!(air_days(&t, "a", "b"), [Some(30), None]);
        assert_eq!(air_days(&t, "a", "nope"), [None, None]);
    }

    #[test]
    fn longest_running_sorts_descending() {
        //* Given
        let table = date_pairs();

        //* When
        let top = longest_running(&table, "date", "date2", 3);

        //* Then
        let rows: Vec<usize> = top.iter().map(|s| s.row).collect();
        assert_eq!(rows, [7, 0, 6]);
        assert!(top.windows(2).all(|w| w[0].days >= w[1].days));
    }

    #[test]
    fn poster_urls_mark_missing_parts() {
        //* Given
        let t = table(
            &["name", "path", "poster"],
            &[
                &["Serie A", "https://example.com/", "image1.jpg"],
                &["Serie B", "https://example.com/photos/", ""],
                &["Serie C", "https://example.net/pictures/", "pic_01.jpg"],
                &["Serie H", "https://static-images.net/img/", ""],
            ],
        );

        //* When
        let urls = poster_urls(&t, "name", "path", "poster");

        //* Then
        assert_eq!(urls.len(), 4);
        assert_eq!(urls.iter().filter(|u| u.url == NOT_AVAILABLE).count(), 2);
        assert_eq!(urls[0].url, "https://example.com/image1.jpg");
    }

    #[test]
    fn repeated_names_overwrite_in_place() {
        let t = table(
            &["name", "path", "poster"],
            &[&["X", "a/", "1.jpg"], &["Y", "b/", "2.jpg"], &["X", "c/", ""]],
        );
        let urls = poster_urls(&t, "name", "path", "poster");
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].name, "X");
        assert_eq!(urls[0].url, NOT_AVAILABLE);
    }
}
