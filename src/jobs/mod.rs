//! Saved searches generated from the setup settings.
//!
//! Lookup jobs come from the user's lookup definitions; cleanup jobs are a
//! fixed set with one job per IOC type.

mod cleanup;
mod lookup;
mod schedule;
mod types;

pub use cleanup::{cleanup_job_name, generate_cleanup_job, generate_cleanup_jobs, is_cleanup_job_name};
pub use lookup::{
    generate_lookup_job, generate_lookup_jobs, lookup_job_name, lookup_key, parse_lookup_search,
    LookupNaming, ALERTS_COLLECTION,
};
pub use schedule::{cleanup_cron, lookup_cron, LOOKUP_EARLIEST, LOOKUP_LATEST};
pub use types::GeneratedJob;
