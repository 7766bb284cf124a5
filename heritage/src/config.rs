use clap::Parser;

/// Loads heritage sites and oral histories from the heritage API
#[derive(Debug, Clone, Parser)]
#[command(name = "heritage", version, about)]
pub struct Args {
    /// Base URL of the heritage API
    #[arg(long, env = "HERITAGE_API_URL", default_value = "http://127.0.0.1:8000")]
    pub base_url: String,

    /// Print HTML fragments instead of plain text
    #[arg(long)]
    pub html: bool,
}
