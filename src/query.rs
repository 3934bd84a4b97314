//! Filter-and-aggregate over a [`Dataset`].
//!
//! [`query`] is a pure function of its arguments: it borrows the dataset,
//! keeps no state between calls and returns the same result for the same
//! selection.

use crate::error::QueryError;
use crate::normalize::Dataset;
use crate::types::{Incident, Selection, YearCount};
use std::collections::{BTreeMap, BTreeSet};

/// Width of the initial year window, counted back from the latest year.
pub const INITIAL_WINDOW_YEARS: i32 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<'a> {
    /// One row per year with at least one match, ascending by year.
    pub yearly: Vec<YearCount>,
    /// Matching incidents in dataset order.
    pub matches: Vec<&'a Incident>,
}

impl Selection {
    /// The selection shown before the user picks anything: no regions, no
    /// cities, and the latest years of the dataset.
    pub fn initial(dataset: &Dataset) -> Self {
        let (min, max) = dataset.year_bounds().unwrap_or((0, 0));
        Self {
            regions: BTreeSet::new(),
            cities: BTreeSet::new(),
            year_min: (max - INITIAL_WINDOW_YEARS).max(min),
            year_max: max,
        }
    }

    /// Whether `incident` passes all three conditions. An empty-string
    /// placeholder in the region/city sets matches nothing, since normalized
    /// incidents never carry a blank location.
    pub fn matches(&self, incident: &Incident) -> bool {
        let in_regions = self.regions.contains(&incident.region);
        let in_cities = self.cities.contains(&incident.city);
        let in_years = (self.year_min..=self.year_max).contains(&incident.year);
        in_regions && in_cities && in_years
    }
}

pub fn query<'a>(dataset: &'a Dataset, selection: &Selection) -> Result<QueryResult<'a>, QueryError> {
    if selection.year_min > selection.year_max {
        return Err(QueryError::InvalidRange {
            year_min: selection.year_min,
            year_max: selection.year_max,
        });
    }

    let matches: Vec<&Incident> = dataset
        .incidents()
        .iter()
        .filter(|i| selection.matches(i))
        .collect();
    let yearly = yearly_counts(&matches);

    log::debug!(
        "Query {}-{} over {} regions / {} cities matched {} incidents in {} years",
        selection.year_min,
        selection.year_max,
        selection.regions.len(),
        selection.cities.len(),
        matches.len(),
        yearly.len(),
    );
    Ok(QueryResult { yearly, matches })
}

/// Count incidents per year. Only years that occur are emitted, ascending.
pub fn yearly_counts(incidents: &[&Incident]) -> Vec<YearCount> {
    let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
    for i in incidents {
        *by_year.entry(i.year).or_default() += 1;
    }
    by_year
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}
