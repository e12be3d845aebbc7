//! CLI argument definitions for devdash.

use std::path::PathBuf;

use clap::Parser;

use crate::export::ExportLayout;

/// Version string with the commit and build time injected by `build.rs`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("DEVDASH_GIT_COMMIT"),
    ", built ",
    env!("DEVDASH_BUILD_TIMESTAMP"),
    ")"
);

/// devdash - git status, system metrics, tasks and a Pomodoro timer in one terminal.
///
/// Without options the interactive dashboard starts. Configuration is read
/// from ./.devdash.toml, <config dir>/devdash/config.toml or ~/.devdash.toml
/// (first match wins) unless --config is given.
#[derive(Parser, Debug)]
#[command(name = "devdash")]
#[command(author, version, long_version = LONG_VERSION, about, long_about = None)]
pub struct Cli {
    /// Use this config file instead of searching the default locations
    #[arg(short = 'c', long = "config", env = "DEVDASH_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Check the configuration and exit (exit code 1 when there are warnings)
    #[arg(long, conflicts_with_all = ["show_config", "print_example_config", "export"])]
    pub validate_config: bool,

    /// Print the resolved configuration as TOML and exit
    #[arg(long, conflicts_with_all = ["print_example_config", "export"])]
    pub show_config: bool,

    /// Print a commented example configuration and exit
    #[arg(long, conflicts_with = "export")]
    pub print_example_config: bool,

    /// Export the task list to Markdown and exit (flat, grouped or category)
    #[arg(long, value_name = "LAYOUT", value_parser = parse_layout)]
    pub export: Option<ExportLayout>,

    /// Directory for --export output (default: current directory)
    #[arg(long, value_name = "DIR", requires = "export")]
    pub output_dir: Option<PathBuf>,
}

/// What the process should do after parsing arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Dashboard,
    ValidateConfig,
    ShowConfig,
    PrintExampleConfig,
    Export {
        layout: ExportLayout,
        output_dir: Option<PathBuf>,
    },
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.validate_config {
            Mode::ValidateConfig
        } else if self.show_config {
            Mode::ShowConfig
        } else if self.print_example_config {
            Mode::PrintExampleConfig
        } else if let Some(layout) = self.export {
            Mode::Export {
                layout,
                output_dir: self.output_dir.clone(),
            }
        } else {
            Mode::Dashboard
        }
    }
}

fn parse_layout(s: &str) -> Result<ExportLayout, String> {
    ExportLayout::parse(s).ok_or_else(|| {
        format!(
            "invalid layout '{}' (expected one of: flat, grouped, category)",
            s
        )
    })
}
