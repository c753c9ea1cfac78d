use clap::Parser;
use serde::Serialize;

#[derive(Debug, Default, Parser, Serialize)]
#[command(about = "Serves the Rotten Tomatoes top box office ranking from memory")]
pub struct Cli {
    /// Port the HTTP server listens on
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Seconds between two refreshes of the ranking
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_interval_sec: Option<u64>,
    /// Base url of the page the ranking is scraped from
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_base_url: Option<String>,
}
