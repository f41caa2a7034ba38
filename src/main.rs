mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, GlobalArgs, InspectArgs, QueryArgs};
use neo_database::{
    create_filters, limit, load_database, writable, write_results, Criteria, UnlinkedPolicy,
};

/// Results printed to stdout when no limit is given
const DEFAULT_PRINT_LIMIT: usize = 10;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.debug);

    match &cli.command {
        Commands::Inspect(args) => run_inspect(&cli.global, args),
        Commands::Query(args) => run_query(&cli.global, args),
    }
}

/// Logs go to stderr so stdout only carries results
fn init_tracing(debug: bool) {
    let default_level = if debug {
        "neo_database=debug"
    } else {
        "neo_database=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_inspect(global: &GlobalArgs, args: &InspectArgs) -> Result<()> {
    let db = load_database(&global.neofile, &global.cadfile, UnlinkedPolicy::Keep)?;

    let neo = match (&args.pdes, &args.name) {
        (Some(pdes), _) => db.get_neo_by_designation(pdes),
        (None, Some(name)) => db.get_neo_by_name(name),
        (None, None) => None,
    };

    let Some(neo) = neo else {
        eprintln!("No matching NEOs exist in the database.");
        return Ok(());
    };

    println!("{}", neo);
    if args.verbose {
        for approach in neo.approaches().iter().filter_map(|id| db.linked(*id)) {
            println!("- {}", approach);
        }
    }

    Ok(())
}

fn run_query(global: &GlobalArgs, args: &QueryArgs) -> Result<()> {
    let policy = if args.drop_unlinked {
        UnlinkedPolicy::Drop
    } else {
        UnlinkedPolicy::Keep
    };
    let db = load_database(&global.neofile, &global.cadfile, policy)?;

    let base = match &args.criteria_file {
        Some(path) => Criteria::from_file(path)?,
        None => Criteria::default(),
    };
    let criteria = base.merge(args.criteria());
    let filters = create_filters(&criteria);
    for filter in &filters {
        tracing::debug!(%filter, "query filter");
    }

    let results = db.query(&filters);

    match &args.outfile {
        Some(outfile) => {
            let written = write_results(limit(writable(results), args.limit), outfile)?;
            println!("Wrote {} close approaches to {}", written, outfile.display());
        }
        None => {
            let n = args.limit.unwrap_or(DEFAULT_PRINT_LIMIT);
            for result in limit(results, Some(n)) {
                println!("{}", result);
            }
        }
    }

    Ok(())
}
