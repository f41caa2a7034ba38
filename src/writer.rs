// 📤 Result Writer - CSV and JSON output of linked close approaches
//
// Every row pairs an approach with its NEO. Approaches without a NEO have
// nothing to put in the NEO columns and are skipped with a warning.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::db::LinkedApproach;
use crate::entities::{ApproachRecord, NeoRecord};

/// CSV header, in output order
pub const CSV_FIELDS: [&str; 7] = [
    "datetime_utc",
    "distance_au",
    "velocity_km_s",
    "designation",
    "name",
    "diameter_km",
    "potentially_hazardous",
];

#[derive(Debug, Serialize)]
struct CsvRow {
    datetime_utc: String,
    distance_au: f64,
    velocity_km_s: f64,
    designation: String,
    name: String,
    /// Unknown diameters are written as "nan"
    diameter_km: String,
    potentially_hazardous: bool,
}

impl CsvRow {
    fn new(approach: ApproachRecord, neo: NeoRecord) -> Self {
        let diameter_km = if neo.diameter_km.is_nan() {
            "nan".to_string()
        } else {
            neo.diameter_km.to_string()
        };

        CsvRow {
            datetime_utc: approach.datetime_utc,
            distance_au: approach.distance_au,
            velocity_km_s: approach.velocity_km_s,
            designation: neo.designation,
            name: neo.name,
            diameter_km,
            potentially_hazardous: neo.potentially_hazardous,
        }
    }
}

/// JSON element: approach attributes plus a nested `neo` object
#[derive(Debug, Serialize)]
struct JsonRow {
    #[serde(flatten)]
    approach: ApproachRecord,
    neo: NeoRecord,
}

/// Results that have a NEO to write, in order
///
/// Apply before `limit` so skipped approaches do not count against it.
pub fn writable<'a, I>(results: I) -> impl Iterator<Item = LinkedApproach<'a>>
where
    I: IntoIterator<Item = LinkedApproach<'a>>,
{
    results.into_iter().filter(|result| {
        if result.neo.is_none() {
            tracing::debug!(
                designation = result.approach.designation(),
                "leaving out close approach with no linked NEO"
            );
        }
        result.neo.is_some()
    })
}

/// Split a result into its two serialized records, or skip it
fn records(result: &LinkedApproach<'_>) -> Option<(ApproachRecord, NeoRecord)> {
    match result.neo {
        Some(neo) => Some((result.approach.serialize(), neo.serialize())),
        None => {
            tracing::warn!(
                designation = result.approach.designation(),
                "skipping close approach with no linked NEO"
            );
            None
        }
    }
}

/// Write results to a CSV file; returns the number of rows written
pub fn write_to_csv<'a, I>(results: I, filename: &Path) -> Result<usize>
where
    I: IntoIterator<Item = LinkedApproach<'a>>,
{
    let file = File::create(filename)
        .with_context(|| format!("Failed to create file: {}", filename.display()))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));

    writer.write_record(CSV_FIELDS)?;

    let mut count = 0;
    for result in results {
        if let Some((approach, neo)) = records(&result) {
            writer
                .serialize(CsvRow::new(approach, neo))
                .context("Failed to write CSV row")?;
            count += 1;
        }
    }
    writer.flush().context("Failed to flush CSV output")?;

    tracing::info!(rows = count, path = %filename.display(), "wrote CSV results");
    Ok(count)
}

/// Write results to a pretty-printed JSON array; returns the element count
///
/// Unknown diameters serialize as `null`.
pub fn write_to_json<'a, I>(results: I, filename: &Path) -> Result<usize>
where
    I: IntoIterator<Item = LinkedApproach<'a>>,
{
    let rows: Vec<JsonRow> = results
        .into_iter()
        .filter_map(|result| records(&result))
        .map(|(approach, neo)| JsonRow { approach, neo })
        .collect();

    let file = File::create(filename)
        .with_context(|| format!("Failed to create file: {}", filename.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, &rows).context("Failed to write JSON results")?;
    out.flush().context("Failed to flush JSON output")?;

    tracing::info!(rows = rows.len(), path = %filename.display(), "wrote JSON results");
    Ok(rows.len())
}

/// Pick the writer from the file extension (.csv or .json)
pub fn write_results<'a, I>(results: I, filename: &Path) -> Result<usize>
where
    I: IntoIterator<Item = LinkedApproach<'a>>,
{
    let extension = filename
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("csv") => write_to_csv(results, filename),
        Some("json") => write_to_json(results, filename),
        _ => bail!(
            "Unsupported output file {}: expected a .csv or .json extension",
            filename.display()
        ),
    }
}

// ============================================================================
// TESTS
// ============================================================================
