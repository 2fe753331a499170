//! Command handlers.

pub mod config;
pub mod judge;
pub mod oneshot;

use clap::Args;
use pinpoint_core::Config;
use std::path::PathBuf;

/// Arguments shared by `judge` and `oneshot`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Image containing the bounded individual
    #[arg(required = true)]
    pub image: PathBuf,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL")]
    pub model: Option<String>,

    /// Directory to write the report to (defaults to config `output.dir`)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Parse and check the judgment JSON; fail instead of writing an invalid report
    #[arg(long)]
    pub strict: bool,
}

impl RunArgs {
    /// Report directory: `--output-dir` (with ~ expanded), else the config value.
    pub fn report_dir(&self, config: &Config) -> PathBuf {
        match &self.output_dir {
            Some(dir) => {
                let path_str = dir.to_string_lossy();
                PathBuf::from(shellexpand::tilde(&path_str).into_owned())
            }
            None => config.output_dir(),
        }
    }
}
