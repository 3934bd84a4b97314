use crate::error::OutputError;
use crate::query::QueryResult;
use crate::types::{Incident, IncidentRow, MapMarker, Selection, YearBarRow, YearCount};
use crate::util::{format_casualties, format_int};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

/// Column width for summaries in marker hover labels.
pub const HOVER_WRAP_WIDTH: usize = 50;

/// Everything the presentation side needs to redraw after one interaction.
#[derive(Debug, Serialize)]
pub struct QueryView<'a> {
    pub selection: &'a Selection,
    pub yearly: &'a [YearCount],
    pub markers: Vec<MapMarker>,
}

impl<'a> QueryView<'a> {
    pub fn new(selection: &'a Selection, result: &'a QueryResult<'_>) -> Self {
        Self {
            selection,
            yearly: &result.yearly,
            markers: map_markers(&result.matches),
        }
    }
}

pub fn write_csv<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<(), OutputError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<(), OutputError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Render at most `max_rows` rows as a markdown table.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_table(rows, max_rows));
    if rows.len() > max_rows {
        println!("({} more rows not shown)\n", format_int(rows.len() - max_rows));
    }
}

/// Axis tick in the `'YY` style, e.g. `'70` for 1970.
pub fn year_tick_label(year: i32) -> String {
    format!("'{:02}", year.rem_euclid(100))
}

pub fn year_bar_rows(yearly: &[YearCount]) -> Vec<YearBarRow> {
    yearly
        .iter()
        .map(|yc| YearBarRow {
            year: yc.year,
            tick: year_tick_label(yc.year),
            count: format_int(yc.count),
        })
        .collect()
}

pub fn incident_rows(incidents: &[&Incident]) -> Vec<IncidentRow> {
    incidents
        .iter()
        .map(|i| IncidentRow {
            date: i.event_date.format("%Y-%m-%d").to_string(),
            region: i.region.clone(),
            city: i.city.clone(),
            killed: format_casualties(i.killed),
            wounded: format_casualties(i.wounded),
            actor_group: i.actor_group.clone().unwrap_or_default(),
        })
        .collect()
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

pub fn hover_text(incident: &Incident) -> String {
    let mut parts = vec![
        format!("{}, {}", incident.city, incident.region),
        incident.event_date.format("%Y-%m-%d").to_string(),
        format!(
            "Killed: {}, Wounded: {}",
            format_casualties(incident.killed),
            format_casualties(incident.wounded)
        ),
    ];
    if let Some(group) = &incident.actor_group {
        parts.push(format!("Group: {group}"));
    }
    if let Some(target) = &incident.target {
        parts.push(format!("Target: {target}"));
    }
    if let Some(summary) = &incident.summary {
        parts.extend(wrap_words(summary, HOVER_WRAP_WIDTH));
    }
    parts.join("<br>")
}

/// Markers for incidents that have coordinates; the rest are left off the
/// map but still count toward the yearly series.
pub fn map_markers(incidents: &[&Incident]) -> Vec<MapMarker> {
    incidents
        .iter()
        .filter_map(|i| {
            let (longitude, latitude) = (i.longitude?, i.latitude?);
            Some(MapMarker {
                region: i.region.clone(),
                city: i.city.clone(),
                longitude,
                latitude,
                event_date: i.event_date,
                killed: i.killed,
                wounded: i.wounded,
                actor_group: i.actor_group.clone(),
                target: i.target.clone(),
                summary: i.summary.clone(),
                hover_text: hover_text(i),
            })
        })
        .collect()
}
