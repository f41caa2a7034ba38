// 📥 Record Loader - NASA NEO CSV and close approach JSON
//
// Two input files, two flat collections, no linking:
// - neos.csv: SBDB export, header row, columns pdes/name/diameter/pha used
// - cad.json: CAD API export, {"fields": [...], "data": [[...], ...]}
//
// Rows that fail record construction are skipped with a warning. Unreadable
// files and malformed CSV/JSON structure are errors.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::db::{NeoDatabase, UnlinkedPolicy};
use crate::entities::{CloseApproach, NearEarthObject};

// ============================================================================
// NEO CSV
// ============================================================================

/// The NEO CSV columns we use (all others are ignored)
#[derive(Debug, Deserialize)]
struct NeoRow {
    pdes: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    diameter: String,
    #[serde(default)]
    pha: String,
}

/// Load near-Earth objects from a CSV file
pub fn load_neos(neo_csv_path: &Path) -> Result<Vec<NearEarthObject>> {
    let file = File::open(neo_csv_path)
        .with_context(|| format!("Failed to open file: {}", neo_csv_path.display()))?;

    load_neos_from_reader(file)
        .with_context(|| format!("Failed to load NEOs from {}", neo_csv_path.display()))
}

/// Load near-Earth objects from any CSV source with a header row
pub fn load_neos_from_reader<R: Read>(reader: R) -> Result<Vec<NearEarthObject>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let mut neos = Vec::new();
    let mut skipped = 0usize;

    for (line_num, result) in reader.deserialize::<NeoRow>().enumerate() {
        // +2 because: 1-indexed + header row
        let row = result.with_context(|| format!("Failed to parse CSV line {}", line_num + 2))?;

        match NearEarthObject::new(&row.pdes, &row.name, &row.diameter, &row.pha) {
            Ok(neo) => neos.push(neo),
            Err(err) => {
                tracing::warn!(line = line_num + 2, error = %err, "skipping NEO record");
                skipped += 1;
            }
        }
    }

    tracing::info!(loaded = neos.len(), skipped, "loaded NEO records");
    Ok(neos)
}

// ============================================================================
// CLOSE APPROACH JSON
// ============================================================================

#[derive(Debug, Deserialize)]
struct CadFile {
    #[serde(default)]
    fields: Vec<String>,
    data: Vec<Vec<serde_json::Value>>,
}

/// Positions of the columns we use within each `data` row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CadColumns {
    des: usize,
    cd: usize,
    dist: usize,
    v_rel: usize,
}

impl CadColumns {
    /// Layout of the CAD API's default field list
    const DEFAULT: CadColumns = CadColumns {
        des: 0,
        cd: 3,
        dist: 4,
        v_rel: 7,
    };

    /// Resolve columns by name from `fields`, falling back to the default layout
    fn resolve(fields: &[String]) -> Self {
        let position = |name: &str, fallback: usize| {
            fields.iter().position(|f| f == name).unwrap_or(fallback)
        };

        CadColumns {
            des: position("des", Self::DEFAULT.des),
            cd: position("cd", Self::DEFAULT.cd),
            dist: position("dist", Self::DEFAULT.dist),
            v_rel: position("v_rel", Self::DEFAULT.v_rel),
        }
    }
}

/// Load close approaches from a CAD JSON file
pub fn load_approaches(cad_json_path: &Path) -> Result<Vec<CloseApproach>> {
    let file = File::open(cad_json_path)
        .with_context(|| format!("Failed to open file: {}", cad_json_path.display()))?;

    load_approaches_from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to load close approaches from {}", cad_json_path.display()))
}

/// Load close approaches from any CAD JSON source
pub fn load_approaches_from_reader<R: Read>(reader: R) -> Result<Vec<CloseApproach>> {
    let cad: CadFile = serde_json::from_reader(reader).context("Failed to parse CAD JSON")?;
    let columns = CadColumns::resolve(&cad.fields);

    let mut approaches = Vec::with_capacity(cad.data.len());
    let mut skipped = 0usize;

    for (row_num, row) in cad.data.iter().enumerate() {
        let des = cell(row, columns.des);
        let cd = cell(row, columns.cd);
        let dist = cell(row, columns.dist);
        let v_rel = cell(row, columns.v_rel);

        match CloseApproach::new(&des, &cd, &dist, &v_rel) {
            Ok(approach) => approaches.push(approach),
            Err(err) => {
                tracing::warn!(row = row_num, error = %err, "skipping close approach record");
                skipped += 1;
            }
        }
    }

    tracing::info!(loaded = approaches.len(), skipped, "loaded close approach records");
    Ok(approaches)
}

/// Cell text; numbers are accepted as well as strings, null/missing is ""
fn cell(row: &[serde_json::Value], index: usize) -> String {
    match row.get(index) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

// ============================================================================
// DATABASE
// ============================================================================

/// Load both files and link them into a database
pub fn load_database(
    neo_csv_path: &Path,
    cad_json_path: &Path,
    policy: UnlinkedPolicy,
) -> Result<NeoDatabase> {
    let neos = load_neos(neo_csv_path)?;
    let approaches = load_approaches(cad_json_path)?;

    Ok(NeoDatabase::with_policy(neos, approaches, policy))
}

// ============================================================================
// TESTS
// ============================================================================
