use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tabled::Tabled;

/// One row of the source CSV, exactly as read. Every cell is optional
/// text; parsing and validation happen in the normalizer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    #[serde(rename = "iyear")]
    pub year: Option<String>,
    #[serde(rename = "imonth")]
    pub month: Option<String>,
    #[serde(rename = "iday")]
    pub day: Option<String>,
    #[serde(rename = "provstate")]
    pub region: Option<String>,
    #[serde(rename = "city")]
    pub city: Option<String>,
    #[serde(rename = "longitude")]
    pub longitude: Option<String>,
    #[serde(rename = "latitude")]
    pub latitude: Option<String>,
    #[serde(rename = "nkill")]
    pub killed: Option<String>,
    #[serde(rename = "nwound")]
    pub wounded: Option<String>,
    #[serde(rename = "summary")]
    pub summary: Option<String>,
    #[serde(rename = "target1")]
    pub target: Option<String>,
    #[serde(rename = "gname")]
    pub actor_group: Option<String>,
}

/// A normalized incident. Month is always in 1..=12 and `event_date` is a
/// valid calendar date built from (year, month, day).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Incident {
    pub year: i32,
    pub month: u32,
    /// Day of month after imputation.
    pub day: u32,
    /// True when the source day was unknown and replaced.
    pub day_imputed: bool,
    pub event_date: NaiveDate,
    pub region: String,
    pub city: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub killed: Option<f64>,
    pub wounded: Option<f64>,
    pub summary: Option<String>,
    pub target: Option<String>,
    pub actor_group: Option<String>,
}

/// The filter state of one interaction: selected regions, selected cities
/// and an inclusive year range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub regions: BTreeSet<String>,
    pub cities: BTreeSet<String>,
    pub year_min: i32,
    pub year_max: i32,
}

impl Selection {
    pub fn new<R, C>(regions: R, cities: C, year_min: i32, year_max: i32) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
            cities: cities.into_iter().map(Into::into).collect(),
            year_min,
            year_max,
        }
    }

    /// Clamps both year bounds into the observed `(min, max)` range.
    #[must_use]
    pub fn clamp_years(mut self, (min, max): (i32, i32)) -> Self {
        self.year_min = self.year_min.clamp(min, max);
        self.year_max = self.year_max.clamp(min, max);
        self
    }
}

/// Number of matching incidents in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Map-style projection of a matching incident for the rendering side.
#[derive(Debug, Clone, Serialize)]
pub struct MapMarker {
    pub region: String,
    pub city: String,
    pub longitude: f64,
    pub latitude: f64,
    pub event_date: NaiveDate,
    pub killed: Option<f64>,
    pub wounded: Option<f64>,
    pub actor_group: Option<String>,
    pub target: Option<String>,
    pub summary: Option<String>,
    pub hover_text: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct YearBarRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Tick")]
    #[tabled(rename = "Tick")]
    pub tick: String,
    #[serde(rename = "Attacks")]
    #[tabled(rename = "Attacks")]
    pub count: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct IncidentRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: String,
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "Killed")]
    #[tabled(rename = "Killed")]
    pub killed: String,
    #[serde(rename = "Wounded")]
    #[tabled(rename = "Wounded")]
    pub wounded: String,
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub actor_group: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_collects_into_sets() {
        let s = Selection::new(["X", "X", "Y"], vec!["A".to_string()], 2010, 2016);
        assert_eq!(s.regions.len(), 2);
        assert!(s.cities.contains("A"));
    }

    #[test]
    fn clamp_years_pulls_bounds_into_observed_range() {
        let s = Selection::new(["X"], ["A"], 1950, 2030).clamp_years((1970, 2016));
        assert_eq!((s.year_min, s.year_max), (1970, 2016));

        let s = Selection::new(["X"], ["A"], 1990, 2000).clamp_years((1970, 2016));
        assert_eq!((s.year_min, s.year_max), (1990, 2000));
    }
}
