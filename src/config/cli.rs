use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "grpc-example-client")]
#[command(about = "HTTP front end for the Greeter gRPC service and the REST test backend")]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config/application.toml")]
    pub config: PathBuf,

    /// Overrides `server.listen`.
    #[arg(long)]
    pub listen: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}
