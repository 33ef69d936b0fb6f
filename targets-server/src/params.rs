use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "targets-watch", about = "Follows a published broker targets file")]
pub struct Params {
    /// TOML config file. Defaults apply when omitted.
    #[arg(long, env = "TARGETS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overrides `targets_path` from the config.
    #[arg(long, env = "TARGETS_PATH")]
    pub targets_path: Option<PathBuf>,
}
