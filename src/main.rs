//! Taskmine Logger CLI
//!
//! Local pipeline turning raw browser capture events into a privacy-safe,
//! exportable interaction log.

use chrono::{SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use taskmine_logger::{
    capture::EnvelopeSource,
    config::Config,
    export::{export_filename, to_csv_dynamic, to_csv_fixed, to_text},
    normalize::{normalize, CaptureContext},
    store::{EventLogStore, JsonFileStore},
    Event, REDACTION_DECLARATION, VERSION,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskmine-logger")]
#[command(version = VERSION)]
#[command(about = "Privacy-safe browser interaction telemetry logger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read capture envelopes (one JSON object per line) and log them
    Capture {
        /// Read from a file instead of standard input
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Print recent log records, newest first
    Show {
        /// Maximum number of records to print
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show log count and storage locations
    Status,

    /// Display redaction policy
    Privacy,

    /// Export the full log to the export directory
    Export {
        /// Export format (csv or txt)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Use the dynamic flattened-schema CSV instead of the fixed columns
        #[arg(long)]
        dynamic: bool,

        /// Write into this directory instead of the configured export path
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Run a named command trigger (e.g. export-logs)
    Trigger {
        /// Command name
        name: String,
    },

    /// Remove all stored log records
    Clear {
        /// Skip the confirmation requirement
        #[arg(long)]
        yes: bool,
    },

    /// Show configuration
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Capture { input } => {
            cmd_capture(input);
        }
        Commands::Show { limit } => {
            cmd_show(limit);
        }
        Commands::Status => {
            cmd_status();
        }
        Commands::Privacy => {
            cmd_privacy();
        }
        Commands::Export {
            format,
            dynamic,
            output,
        } => {
            cmd_export(&format, dynamic, output);
        }
        Commands::Trigger { name } => {
            cmd_trigger(&name);
        }
        Commands::Clear { yes } => {
            cmd_clear(yes);
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn open_store(config: &Config) -> EventLogStore<JsonFileStore> {
    EventLogStore::new(JsonFileStore::new(config.data_path.clone()))
}

fn cmd_capture(input: Option<PathBuf>) {
    let config = Config::load().unwrap_or_default();
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }
    let mut store = open_store(&config);

    let from_file = input.is_some();
    let source = match input {
        Some(path) => match File::open(&path) {
            Ok(file) => EnvelopeSource::spawn(BufReader::new(file)),
            Err(e) => {
                eprintln!("Error opening {path:?}: {e}");
                std::process::exit(1);
            }
        },
        None => EnvelopeSource::stdin(),
    };

    println!("Taskmine Logger v{VERSION}");
    if !from_file {
        println!("Reading capture envelopes from stdin. Press Ctrl+C to stop.");
    }
    println!();

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    let receiver = source.receiver().clone();
    let mut appended: u64 = 0;
    let mut failed: u64 = 0;
    let mut drained = false;

    while running.load(Ordering::SeqCst) {
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(envelope) => {
                let context = CaptureContext::from_envelope(&envelope);
                let event = normalize(&envelope, &context);
                match store.append(event) {
                    Ok(()) => appended += 1,
                    Err(e) => {
                        failed += 1;
                        eprintln!("Error appending event: {e}");
                    }
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                drained = true;
                break;
            }
        }
    }

    println!();
    if drained {
        // Input ended on its own; collect reader counters.
        let stats = source.join();
        if stats.skipped > 0 {
            println!("Skipped {} malformed line(s)", stats.skipped);
        }
    }
    println!("Appended {appended} event(s)");
    if failed > 0 {
        println!("Failed to append {failed} event(s)");
    }
}

fn cmd_show(limit: Option<usize>) {
    let config = Config::load().unwrap_or_default();
    let store = open_store(&config);

    let events = match store.get_all() {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Error reading log: {e}");
            std::process::exit(1);
        }
    };

    let total = events.len();
    println!("{total} log{}", if total == 1 { "" } else { "s" });

    if events.is_empty() {
        println!("No logs found.");
        return;
    }

    let limit = limit.unwrap_or(config.show_limit);
    for event in events.iter().rev().take(limit) {
        println!(
            "[{}] {} {}",
            event
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            event.kind,
            describe(event)
        );
    }
}

/// One-line summary of where an event happened.
fn describe(event: &Event) -> String {
    if let Some(title) = &event.page_title {
        return title.clone();
    }
    if let Some(url) = &event.page_url {
        return url.clone();
    }
    if let Some(selector) = event.target.as_ref().and_then(|t| t.selector.clone()) {
        return selector;
    }
    "(no title/url)".to_string()
}

fn cmd_status() {
    let config = Config::load().unwrap_or_default();
    let store = open_store(&config);

    println!("Taskmine Logger Status");
    println!("======================");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!("Log storage: {:?}", config.data_path);
    println!("Export directory: {:?}", config.export_path);
    println!();

    match store.count() {
        Ok(count) => println!("Stored events: {count}"),
        Err(e) => println!("Stored events: unavailable ({e})"),
    }
}

fn cmd_privacy() {
    println!("{REDACTION_DECLARATION}");
}

fn cmd_export(format: &str, dynamic: bool, output: Option<PathBuf>) {
    let config = Config::load().unwrap_or_default();
    let store = open_store(&config);

    let events = match store.get_all() {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Error reading log: {e}");
            std::process::exit(1);
        }
    };

    if events.is_empty() {
        println!("No logs to export");
        return;
    }

    let (content, extension) = match format {
        "csv" => {
            let csv = if dynamic {
                to_csv_dynamic(&events)
            } else {
                to_csv_fixed(&events)
            };
            (csv, "csv")
        }
        "txt" | "text" => (to_text(&events), "txt"),
        other => {
            eprintln!("Error: unknown export format '{other}' (expected csv or txt)");
            std::process::exit(1);
        }
    };

    let export_dir = output.unwrap_or_else(|| config.export_path.clone());
    if let Err(e) = std::fs::create_dir_all(&export_dir) {
        eprintln!("Error creating export directory {export_dir:?}: {e}");
        std::process::exit(1);
    }

    let output_path = export_dir.join(export_filename(extension, Utc::now()));
    match std::fs::write(&output_path, content) {
        Ok(()) => println!("Exported {} event(s) to {:?}", events.len(), output_path),
        Err(e) => {
            eprintln!("Error writing export: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_trigger(name: &str) {
    match name {
        "export-logs" => cmd_export("csv", false, None),
        other => {
            eprintln!("Unknown command: {other}");
            std::process::exit(1);
        }
    }
}

fn cmd_clear(yes: bool) {
    if !yes {
        eprintln!("Remove all stored logs? This cannot be undone.");
        eprintln!("Re-run with --yes to confirm.");
        std::process::exit(1);
    }

    let config = Config::load().unwrap_or_default();
    let mut store = open_store(&config);

    match store.clear() {
        Ok(()) => println!("Logs cleared"),
        Err(e) => {
            eprintln!("Error clearing logs: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}
