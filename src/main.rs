//! Tagedit - edit XML text in place by scanning tag boundaries.
//!
//! # Usage
//!
//! ```bash
//! tagedit
//! tagedit --input doc.xml --element item --insert '<note/>'
//! tagedit --reverse --save
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use tagedit::app::{self, RunOptions};
use tagedit::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags,
};
use tagedit::perf;

/// Find an element in an XML file, insert text before it, then erase it
#[derive(Parser, Debug)]
#[command(name = "tagedit", version, about, long_about = None)]
struct Cli {
    /// XML file to read [default: tree.xml]
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// File the edited XML is written to [default: new_tree.xml]
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Element name to search for [default: li]
    #[arg(long, value_name = "NAME")]
    element: Option<String>,

    /// Text inserted before the found element
    #[arg(long, value_name = "TEXT")]
    insert: Option<String>,

    /// List spans from last to first
    #[arg(long)]
    reverse: bool,

    /// Print load/list/save timings
    #[arg(long)]
    perf: bool,

    /// Write edit events to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    fn flags(&self) -> ConfigFlags {
        ConfigFlags {
            input: self.input.clone(),
            output: self.output.clone(),
            element: self.element.clone(),
            insert: self.insert.clone(),
            reverse: self.reverse,
            perf: self.perf,
            debug_log: self.debug_log.clone(),
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let debug_log_path = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os("TAGEDIT_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(debug_log_path.as_deref()) {
        eprintln!(
            "[warn] Failed to initialize event log {}: {}",
            debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            err
        );
    }

    let options = RunOptions::from_flags(&effective);
    let mut stdout = std::io::stdout().lock();
    app::run(&options, &mut stdout)?;
    Ok(())
}
