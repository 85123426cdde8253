// Chunk: docs/chunks/label_engine - Command-line inspection harness
//!
//! linelabel: labels a file and prints it with 24-bit ANSI colors.
//!
//! The binary drives a `LabeledDocument` exactly as an editor would, running
//! frames until the refresh queue is idle, then prints every line. It is
//! useful for checking scheme definitions against real files.

use std::error::Error;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use linelabel_buffer::{Color, LineBuffer, StyledLine};
use linelabel_syntax::{check_document, LabelEnd, LabeledDocument, LabelerConfig, SchemeRegistry};

#[derive(Parser)]
#[command(name = "linelabel")]
#[command(about = "Label a source file and print it with colors")]
struct Args {
    /// Path to the file to label
    file: PathBuf,

    /// Scheme name or file extension to use instead of the file's extension
    #[arg(long)]
    scheme: Option<String>,

    /// Additional JSON scheme definition files, loaded in order
    #[arg(long = "schemes", value_name = "JSON")]
    schemes: Vec<PathBuf>,

    /// Engine tuning file
    #[arg(long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Print the labels of every line as JSON instead of colored text
    #[arg(long)]
    json: bool,

    /// Report unbalanced brackets outside strings and comments
    #[arg(long)]
    brackets: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error: failed to install logger: {}", err);
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut registry = SchemeRegistry::with_builtin();
    for path in &args.schemes {
        let loaded = registry.load_file(path)?;
        tracing::debug!(path = %path.display(), ?loaded, "loaded scheme definitions");
    }

    let scheme = match &args.scheme {
        Some(name) => registry
            .scheme_for_name(name)
            .or_else(|| registry.scheme_for_extension(name))
            .ok_or_else(|| format!("unknown scheme `{}`", name))?,
        None => registry.scheme_for_path(&args.file).ok_or_else(|| {
            format!(
                "no scheme for {}; pick one with --scheme ({})",
                args.file.display(),
                registry.names().join(", ")
            )
        })?,
    };

    let config = match &args.config {
        Some(path) => LabelerConfig::load(path)?,
        None => LabelerConfig::default(),
    };

    let content = std::fs::read_to_string(&args.file)?;
    let buffer = LineBuffer::from_str(&content);
    let mut doc = LabeledDocument::new(scheme, config, buffer.line_count());

    let started = Instant::now();
    let relabeled = doc.run_until_idle(started, &buffer);
    tracing::debug!(
        lines = buffer.line_count(),
        relabeled,
        elapsed = ?started.elapsed(),
        "labeled file"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        writeln!(out, "{}", labels_json(&doc, &buffer))?;
    } else {
        for line in 0..buffer.line_count() {
            let text = buffer.line(line).unwrap_or("");
            writeln!(out, "{}", ansi(&doc.styled_line(line, text)))?;
        }
    }

    if args.brackets {
        for problem in check_document(&doc, &buffer, &bracket_masks()) {
            writeln!(out, "{}: {}", args.file.display(), problem)?;
        }
    }
    Ok(())
}

/// Labels whose contents are not code.
fn bracket_masks() -> [&'static str; 9] {
    [
        "COMMENT",
        "BLOCK_COMMENT",
        "STRING_DOUBLE",
        "STRING_SINGLE",
        "TEMPLATE",
        "TRIPLE_DOUBLE",
        "TRIPLE_SINGLE",
        "SCRIPT_BLOCK",
        "STYLE_BLOCK",
    ]
}

fn ansi(line: &StyledLine) -> String {
    let mut out = String::new();
    for span in &line.spans {
        match span.color {
            Color::Rgb { r, g, b } => {
                let _ = write!(out, "\x1b[38;2;{};{};{}m", r, g, b);
            }
            Color::Default => out.push_str("\x1b[39m"),
        }
        out.push_str(&span.text);
    }
    out.push_str("\x1b[0m");
    out
}

fn labels_json(doc: &LabeledDocument, buffer: &LineBuffer) -> serde_json::Value {
    let lines: Vec<serde_json::Value> = (0..buffer.line_count())
        .map(|line| {
            let labels: Vec<serde_json::Value> = doc
                .labels(line)
                .iter()
                .map(|label| {
                    let end = match label.end {
                        LabelEnd::At(end) => serde_json::json!(end),
                        LabelEnd::EndOfLine => serde_json::json!("eol"),
                    };
                    serde_json::json!({
                        "name": &*label.name,
                        "scheme": &*label.scheme,
                        "kind": format!("{:?}", label.kind),
                        "start": label.start,
                        "end": end,
                        "depth": label.depth,
                        "level": label.level,
                        "disabled": label.disabled,
                        "color": label.color.to_string(),
                    })
                })
                .collect();
            let continues: Vec<String> = doc
                .line_labels(line)
                .map(|result| {
                    result
                        .offered()
                        .keys()
                        .map(|key| format!("{}:{}", key.scheme, key.name))
                        .collect()
                })
                .unwrap_or_default();
            serde_json::json!({ "line": line, "labels": labels, "continues": continues })
        })
        .collect();
    serde_json::Value::Array(lines)
}
