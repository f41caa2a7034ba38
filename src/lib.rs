// NEO Database - Core Library
// Loads NASA near-Earth object and close approach data, links the two
// datasets, and answers filtered queries. Used by the `neo` CLI and tests.

pub mod error;
pub mod helpers;
pub mod entities;
pub mod db;
pub mod filters;
pub mod extract;
pub mod writer;

// Re-export commonly used types
pub use error::ModelError;
pub use entities::{
    ApproachId, ApproachRecord, CloseApproach, NearEarthObject, NeoId, NeoRecord,
};
pub use db::{LinkStats, LinkedApproach, NeoDatabase, UnlinkedPolicy};
pub use filters::{
    create_filters, limit, predicate, ApproachFilter, AttributeFilter, Comparison, Criteria,
    Predicate,
};
pub use extract::{
    load_approaches, load_approaches_from_reader, load_database, load_neos,
    load_neos_from_reader,
};
pub use writer::{writable, write_results, write_to_csv, write_to_json, CSV_FIELDS};
