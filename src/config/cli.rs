use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "sheet-slides")]
#[command(about = "Generate one slide per selected sheet row from a template deck")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "sheet-slides.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Load config and sheet data, report what would be generated, then stop
    #[arg(long)]
    pub dry_run: bool,
}
