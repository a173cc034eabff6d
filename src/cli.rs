use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

// Only flags given on the command line are serialized, so unset ones do not
// shadow values from the environment or the local yaml file.
#[derive(Debug, Default, Parser, Serialize)]
#[command(version, about = "Marble maze leaderboard server")]
pub struct Cli {
    /// JSON file backing the leaderboard
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
    /// Maximum number of entries kept on the leaderboard
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}
