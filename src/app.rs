//! The load, list, find, add, erase, save pass run by the binary.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::ConfigFlags;
use crate::editor::XmlBuffer;
use crate::perf;

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub element: String,
    pub insert: String,
    pub reverse: bool,
}

impl RunOptions {
    pub fn from_flags(flags: &ConfigFlags) -> Self {
        Self {
            input: flags.input_path(),
            output: flags.output_path(),
            element: flags.element_name().to_owned(),
            insert: flags.insert_text().to_owned(),
            reverse: flags.reverse,
        }
    }
}

/// What a run did, step by step.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Every span in listing order.
    pub spans: Vec<String>,
    /// The span `find` stopped on, if any.
    pub found: Option<String>,
    pub added: bool,
    pub erased: bool,
}

/// Run one editing pass, writing progress messages to `out`.
///
/// # Errors
/// Returns an error if the input cannot be loaded, the output cannot be
/// saved, or `out` cannot be written.
pub fn run(options: &RunOptions, out: &mut impl Write) -> Result<RunReport> {
    let mut buffer = XmlBuffer::empty();
    {
        let _scope = perf::scope("load");
        buffer.load(&options.input)?;
    }
    perf::log_event("load", options.input.display().to_string());
    info!(path = %options.input.display(), "XML loaded");
    writeln!(out, "XML loaded successfully")?;

    let spans = {
        let _scope = perf::scope("list");
        list_spans(&buffer, options.reverse)
    };
    for span in &spans {
        writeln!(out, "Current Element: {span}")?;
    }

    let mut report = RunReport {
        spans,
        ..RunReport::default()
    };

    let anchor = buffer.find(&options.element).anchor();
    if anchor.is_located() {
        writeln!(out, "Element found: {}", anchor.span())?;
        perf::log_event("find", anchor.span());
        report.found = Some(anchor.span().to_owned());

        report.added = buffer.add(&options.insert, &anchor);
        if report.added {
            perf::log_event("add", &options.insert);
            writeln!(out, "New element added successfully.")?;
        } else {
            warn!(span = anchor.span(), "anchor vanished before add");
            writeln!(out, "Error adding the new element.")?;
        }

        report.erased = buffer.erase(&anchor);
        if report.erased {
            perf::log_event("erase", anchor.span());
            writeln!(out, "Element erased successfully.")?;
        } else {
            warn!(span = anchor.span(), "anchor vanished before erase");
            writeln!(out, "Error erasing the element.")?;
        }
    } else {
        perf::log_event("find", format!("no <{}", options.element));
        writeln!(out, "Element not found.")?;
    }

    {
        let _scope = perf::scope("save");
        buffer.save(&options.output)?;
    }
    perf::log_event("save", options.output.display().to_string());
    info!(path = %options.output.display(), "XML saved");
    writeln!(out, "XML saved in {}.", options.output.display())?;

    Ok(report)
}

/// Every span of `buffer`, first to last or last to first.
pub fn list_spans(buffer: &XmlBuffer, reverse: bool) -> Vec<String> {
    let mut cursor = buffer.cursor();
    let mut spans = Vec::new();
    if reverse {
        while cursor.next() {}
        while cursor.has_previous() && cursor.previous() {
            spans.push(cursor.span().to_owned());
        }
    } else {
        while cursor.is_located() {
            spans.push(cursor.span().to_owned());
            cursor.next();
        }
    }
    spans
}
