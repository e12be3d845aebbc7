//! devdash CLI - terminal dashboard entry point.

use std::path::Path;
use std::process;

use chrono::Local;
use clap::Parser;
use devdash::cli::{Cli, Mode};
use devdash::config::{ConfigLocations, EXAMPLE_CONFIG, LoadedConfig, load_config_from};
use devdash::export::{ExportLayout, ExportOptions, export_to_file};
use devdash::logging;
use devdash::storage::TaskStore;

fn main() {
    let cli = Cli::parse();
    let mode = cli.mode();

    if mode == Mode::PrintExampleConfig {
        print!("{}", EXAMPLE_CONFIG);
        return;
    }

    // Held until exit so buffered log lines are flushed.
    let _log_guard = logging::init_logging();

    let locations = ConfigLocations::from_env();
    let custom_path = cli.config.as_deref();

    let code = match mode {
        Mode::ValidateConfig => validate_config(custom_path, &locations),
        Mode::ShowConfig => show_config(custom_path, &locations),
        Mode::Export { layout, output_dir } => {
            let dir = output_dir.unwrap_or_else(|| locations.cwd.clone());
            export_tasks(custom_path, &locations, layout, &dir)
        }
        Mode::Dashboard => run_dashboard(custom_path, &locations),
        Mode::PrintExampleConfig => 0,
    };

    if code != 0 {
        process::exit(code);
    }
}

/// `--validate-config`: exit 0 when the configuration has no warnings.
fn validate_config(custom_path: Option<&Path>, locations: &ConfigLocations) -> i32 {
    let loaded = match load_config_from(custom_path, locations) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let Some(source) = loaded.source.as_ref() else {
        println!("No configuration file found; using built-in defaults.");
        return 0;
    };

    println!("Configuration file: {}", source.display());
    let warnings = loaded.all_warnings();
    if warnings.is_empty() {
        println!("Configuration is valid.");
        return 0;
    }

    println!("Found {} warning(s):", warnings.len());
    for warning in &warnings {
        println!("  - {}", warning);
    }
    1
}

/// `--show-config`: print the resolved configuration.
fn show_config(custom_path: Option<&Path>, locations: &ConfigLocations) -> i32 {
    let loaded = match load_config_from(custom_path, locations) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    print_warnings(&loaded);

    match loaded.config.to_toml() {
        Ok(toml) => {
            match &loaded.source {
                Some(path) => println!("# Resolved from {}", path.display()),
                None => println!("# Built-in defaults"),
            }
            print!("{}", toml);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// `--export`: write the task file as Markdown.
fn export_tasks(
    custom_path: Option<&Path>,
    locations: &ConfigLocations,
    layout: ExportLayout,
    dir: &Path,
) -> i32 {
    let loaded = load_or_defaults(custom_path, locations);
    let tasks_config = &loaded.config.tasks;
    let store = TaskStore::resolve(&tasks_config.file_path, &locations.cwd);
    let tasks = store.load();

    let options = ExportOptions::new(Local::now().naive_local(), tasks_config.due_soon_days);
    match export_to_file(&tasks, dir, layout, &options) {
        Ok(path) => {
            println!("Exported {} tasks to {}", tasks.len(), path.display());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[cfg(feature = "tui")]
fn run_dashboard(custom_path: Option<&Path>, locations: &ConfigLocations) -> i32 {
    let loaded = load_or_defaults(custom_path, locations);
    match devdash::tui::run_tui(loaded, custom_path.map(Path::to_path_buf), locations.clone()) {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "Dashboard exited with an error");
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[cfg(not(feature = "tui"))]
fn run_dashboard(_custom_path: Option<&Path>, _locations: &ConfigLocations) -> i32 {
    eprintln!("Error: devdash was built without the `tui` feature");
    1
}

/// Load the configuration, reporting problems on stderr and falling back
/// to defaults when the file cannot be loaded.
fn load_or_defaults(custom_path: Option<&Path>, locations: &ConfigLocations) -> LoadedConfig {
    match load_config_from(custom_path, locations) {
        Ok(loaded) => {
            print_warnings(&loaded);
            loaded
        }
        Err(e) => {
            tracing::warn!(error = %e, "Config load failed, using defaults");
            eprintln!("Error: {}", e);
            eprintln!("Using built-in defaults.");
            LoadedConfig::default()
        }
    }
}

fn print_warnings(loaded: &LoadedConfig) {
    let warnings = loaded.all_warnings();
    if warnings.is_empty() {
        return;
    }
    eprintln!("Configuration warnings:");
    for warning in &warnings {
        eprintln!("  - {}", warning);
    }
}
