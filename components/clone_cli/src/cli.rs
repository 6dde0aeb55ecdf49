//! Command line arguments

use clap::Parser;
use std::path::PathBuf;
use structural_clone::{CloneOptions, HostCapabilities};

/// Deep-clone a JSON document through the structured clone fallback chain
#[derive(Parser, Debug)]
#[command(name = "deepclone", version, about)]
pub struct Cli {
    /// JSON file to clone (reads stdin when omitted)
    pub input: Option<PathBuf>,

    /// Act as a host without a native structured clone
    #[arg(long)]
    pub no_structured_clone: bool,

    /// Act as a host without the JSON round-trip
    #[arg(long)]
    pub no_round_trip: bool,

    /// Maximum container nesting the tiers accept
    #[arg(long, default_value_t = CloneOptions::default().max_depth)]
    pub max_depth: usize,

    /// Make the root object cyclic by pointing KEY back at it
    #[arg(long, value_name = "KEY")]
    pub self_reference: Option<String>,

    /// Log filter directive, overrides RUST_LOG
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Print a JSON report of the clone instead of the clone itself
    #[arg(long)]
    pub report: bool,
}

impl Cli {
    /// Host capabilities selected by the flags
    pub fn host(&self) -> HostCapabilities {
        let mut host = HostCapabilities::default().with_options(CloneOptions {
            max_depth: self.max_depth,
        });
        if self.no_structured_clone {
            host = host.without_structured_clone();
        }
        if self.no_round_trip {
            host = host.without_json_round_trip();
        }
        host
    }
}
