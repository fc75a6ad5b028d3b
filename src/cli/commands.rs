use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cohort", about = "Interest-based user grouping over precomputed embeddings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Bind address (overrides COHORT_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port (overrides COHORT_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Group users once and print the result
    Group {
        /// Users per group
        #[arg(long, default_value = "4")]
        size: i64,
        /// Strategy (maximal_cohesion, balanced_groups, greedy)
        #[arg(long, default_value = "maximal_cohesion")]
        strategy: String,
        /// Comma-separated user ids to restrict grouping to
        #[arg(long, value_delimiter = ',')]
        users: Option<Vec<String>>,
        /// Seed for the random anchor choice
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List users that have embeddings
    Users,
    /// Load a `{"user_id": [f32, ...]}` JSON file into the SQLite store
    Import {
        /// JSON file to read; stdin when omitted or `-`
        file: Option<PathBuf>,
    },
    /// Show the most similar user pairs
    Pairs {
        #[arg(long, default_value = "10")]
        top_k: usize,
    },
}
