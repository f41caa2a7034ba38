//! CLI argument definitions using clap derive API

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use neo_database::Criteria;

/// Explore past and future close approaches of near-Earth objects
#[derive(Parser, Debug)]
#[command(name = "neo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to the CSV file of near-Earth objects
    #[arg(long, global = true, env = "NEO_CSV", default_value = "data/neos.csv")]
    pub neofile: PathBuf,

    /// Path to the JSON file of close approaches
    #[arg(long, global = true, env = "NEO_CAD_JSON", default_value = "data/cad.json")]
    pub cadfile: PathBuf,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect a single NEO by primary designation or by name
    Inspect(InspectArgs),

    /// Query close approaches that match a set of criteria
    Query(QueryArgs),
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
#[command(group(clap::ArgGroup::new("target").required(true).args(["pdes", "name"])))]
pub struct InspectArgs {
    /// Primary designation of the NEO
    #[arg(short, long)]
    pub pdes: Option<String>,

    /// IAU name of the NEO (exact, case-sensitive)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Also list every known close approach of the NEO
    #[arg(long)]
    pub verbose: bool,
}

/// Arguments for the query command
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Only approaches on this date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Only approaches on or after this date (YYYY-MM-DD)
    #[arg(short, long)]
    pub start_date: Option<NaiveDate>,

    /// Only approaches on or before this date (YYYY-MM-DD)
    #[arg(short, long)]
    pub end_date: Option<NaiveDate>,

    /// Minimum approach distance in au
    #[arg(long)]
    pub min_distance: Option<f64>,

    /// Maximum approach distance in au
    #[arg(long)]
    pub max_distance: Option<f64>,

    /// Minimum relative velocity in km/s
    #[arg(long)]
    pub min_velocity: Option<f64>,

    /// Maximum relative velocity in km/s
    #[arg(long)]
    pub max_velocity: Option<f64>,

    /// Minimum NEO diameter in km
    #[arg(long)]
    pub min_diameter: Option<f64>,

    /// Maximum NEO diameter in km
    #[arg(long)]
    pub max_diameter: Option<f64>,

    /// Only potentially hazardous NEOs
    #[arg(long, conflicts_with = "not_hazardous")]
    pub hazardous: bool,

    /// Only NEOs that are not potentially hazardous
    #[arg(long)]
    pub not_hazardous: bool,

    /// JSON file of criteria; flags override its values
    #[arg(long = "criteria")]
    pub criteria_file: Option<PathBuf>,

    /// Maximum number of results (0 = no limit; 10 when printing)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Write results to this .csv or .json file instead of printing them
    #[arg(short, long)]
    pub outfile: Option<PathBuf>,

    /// Discard close approaches whose NEO is not in the catalog
    #[arg(long)]
    pub drop_unlinked: bool,
}

impl QueryArgs {
    /// Criteria given on the command line
    pub fn criteria(&self) -> Criteria {
        let hazardous = match (self.hazardous, self.not_hazardous) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        Criteria {
            date: self.date,
            start_date: self.start_date,
            end_date: self.end_date,
            distance_min: self.min_distance,
            distance_max: self.max_distance,
            velocity_min: self.min_velocity,
            velocity_max: self.max_velocity,
            diameter_min: self.min_diameter,
            diameter_max: self.max_diameter,
            hazardous,
        }
    }
}
