// CLI module for gemvision

use clap::Parser;

/// gemvision - Single-page Gemini vision chat
#[derive(Parser, Debug)]
#[command(name = "gemvision", version, about, long_about = None)]
pub struct Args {
    /// Probe Gemini API connectivity and exit
    #[arg(long)]
    pub check: bool,
}
