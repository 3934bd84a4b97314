//! Turns raw rows into the immutable in-memory [`Dataset`].
//!
//! Rows with an unknown month are dropped, unknown days are imputed to the
//! middle of the month, and each surviving row gets a calendar date. Rows
//! whose date cannot exist are rejected one at a time and counted.

use crate::error::DateConstructionError;
use crate::types::{Incident, RawRow};
use crate::util::{clean_text, parse_f64_safe, parse_i32_safe};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Day of month substituted when the source day is unknown.
pub const IMPUTED_DAY: i32 = 15;

/// Value used when a row has no region or city.
pub const UNKNOWN_LOCATION: &str = "Unknown";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub total_rows: usize,
    /// Rows whose year was missing or not a number.
    pub unparseable_rows: usize,
    /// Rows dropped because the month was unknown.
    pub unknown_month_rows: usize,
    pub imputed_days: usize,
    /// Rows rejected because (year, month, day) is not a real date.
    pub rejected_dates: usize,
    pub kept_rows: usize,
}

/// The normalized incidents plus the selector options derived from them.
/// Never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    incidents: Vec<Incident>,
    regions: Vec<String>,
    cities: Vec<String>,
    year_bounds: Option<(i32, i32)>,
}

impl Dataset {
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Sorted distinct regions of the kept incidents.
    pub fn region_options(&self) -> &[String] {
        &self.regions
    }

    /// Sorted distinct cities of the kept incidents.
    pub fn city_options(&self) -> &[String] {
        &self.cities
    }

    /// Observed `(min_year, max_year)`, or `None` for an empty dataset.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.year_bounds
    }
}

impl FromIterator<Incident> for Dataset {
    fn from_iter<I: IntoIterator<Item = Incident>>(iter: I) -> Self {
        let incidents: Vec<Incident> = iter.into_iter().collect();
        let regions: BTreeSet<&str> = incidents.iter().map(|i| i.region.as_str()).collect();
        let cities: BTreeSet<&str> = incidents.iter().map(|i| i.city.as_str()).collect();
        let year_bounds = incidents.iter().fold(None, |acc, i| match acc {
            None => Some((i.year, i.year)),
            Some((lo, hi)) => Some((i32::min(lo, i.year), i32::max(hi, i.year))),
        });
        Self {
            regions: regions.into_iter().map(str::to_string).collect(),
            cities: cities.into_iter().map(str::to_string).collect(),
            year_bounds,
            incidents,
        }
    }
}

/// Build the date for a surviving row.
pub fn build_event_date(year: i32, month: i32, day: i32) -> Result<NaiveDate, DateConstructionError> {
    let err = DateConstructionError { year, month, day };
    let m = u32::try_from(month).map_err(|_| err)?;
    let d = u32::try_from(day).map_err(|_| err)?;
    NaiveDate::from_ymd_opt(year, m, d).ok_or(err)
}

pub fn normalize<I>(raw_rows: I) -> (Dataset, NormalizeReport)
where
    I: IntoIterator<Item = RawRow>,
{
    let mut report = NormalizeReport::default();
    let mut incidents = Vec::new();

    for row in raw_rows {
        report.total_rows += 1;

        let Some(year) = parse_i32_safe(row.year.as_deref()) else {
            log::debug!("Skipping row {} with unparseable year {:?}", report.total_rows, row.year);
            report.unparseable_rows += 1;
            continue;
        };

        // Blank month/day cells mean "unknown", same as 0.
        let month = parse_i32_safe(row.month.as_deref()).unwrap_or(0);
        if month == 0 {
            report.unknown_month_rows += 1;
            continue;
        }

        let raw_day = parse_i32_safe(row.day.as_deref()).unwrap_or(0);
        let day_imputed = raw_day == 0;
        let day = if day_imputed { IMPUTED_DAY } else { raw_day };

        let event_date = match build_event_date(year, month, day) {
            Ok(d) => d,
            Err(e) => {
                log::debug!("Rejecting row {}: {e}", report.total_rows);
                report.rejected_dates += 1;
                continue;
            }
        };
        if day_imputed {
            report.imputed_days += 1;
        }

        incidents.push(Incident {
            year,
            month: event_date.month(),
            day: event_date.day(),
            day_imputed,
            event_date,
            region: clean_text(row.region).unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            city: clean_text(row.city).unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            longitude: parse_f64_safe(row.longitude.as_deref()),
            latitude: parse_f64_safe(row.latitude.as_deref()),
            killed: parse_f64_safe(row.killed.as_deref()),
            wounded: parse_f64_safe(row.wounded.as_deref()),
            summary: clean_text(row.summary),
            target: clean_text(row.target),
            actor_group: clean_text(row.actor_group),
        });
    }

    report.kept_rows = incidents.len();
    if report.rejected_dates > 0 {
        log::warn!("Rejected {} rows with impossible dates", report.rejected_dates);
    }
    log::info!(
        "Normalized {} of {} rows ({} unknown month, {} unparseable, {} days imputed)",
        report.kept_rows,
        report.total_rows,
        report.unknown_month_rows,
        report.unparseable_rows,
        report.imputed_days,
    );

    (incidents.into_iter().collect(), report)
}
