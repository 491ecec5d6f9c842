//! Typed view of a TV-series record, for indexing the TMDB fragments into a
//! struct instead of a string map.
//!
//! Every field is optional: each fragment only carries some of them, and the
//! index deserializes one fragment row at a time.  Numbers and dates that do
//! not parse are treated as missing rather than failing the whole load.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::data::model::parse_date;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Series {
    pub name: Option<String>,
    pub original_name: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub genres: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub number_of_seasons: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    pub number_of_episodes: Option<u32>,
    #[serde(deserialize_with = "lenient_date", serialize_with = "iso_date")]
    pub first_air_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_date", serialize_with = "iso_date")]
    pub last_air_date: Option<NaiveDate>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

fn iso_date<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match date {
        Some(d) => serializer.serialize_some(&d.format("%Y-%m-%d").to_string()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv_text: &str) -> Series {
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        reader
            .deserialize()
            .next()
            .expect("should have a row")
            .expect("should deserialize")
    }

    #[test]
    fn partial_rows_leave_other_fields_empty() {
        let series = parse("name,type,number_of_seasons\nDark,Scripted,3\n");
        assert_eq!(series.name.as_deref(), Some("Dark"));
        assert_eq!(series.kind.as_deref(), Some("Scripted"));
        assert_eq!(series.number_of_seasons, Some(3));
        assert_eq!(series.first_air_date, None);
    }

    #[test]
    fn malformed_numbers_and_dates_become_missing() {
        let series = parse("number_of_episodes,first_air_date,last_air_date\nmany,someday,2019-06-27\n");
        assert_eq!(series.number_of_episodes, None);
        assert_eq!(series.first_air_date, None);
        assert_eq!(series.last_air_date, NaiveDate::from_ymd_opt(2019, 6, 27));
    }
}
