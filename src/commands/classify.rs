//! `testforge classify` command handler.

use clap::{Args, ValueEnum};
use serde::Serialize;
use std::io::Write;
use test_kind::{Classifier, TestKind, DEFAULT_EXTENSIONS};

/// Output format for classification results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ClassifyFormat {
    /// One `path<TAB>kind` line per path
    #[default]
    Text,
    /// A JSON array of `{ "path", "kind" }` objects
    Json,
}

/// Arguments for `testforge classify`.
#[derive(Args, Clone, Debug)]
pub struct ClassifyArgs {
    /// Paths to classify (the files are never opened)
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<String>,

    /// File extensions to recognise, e.g. --ext ts --ext tsx (default: ts)
    #[arg(
        long = "ext",
        value_name = "EXT",
        env = "TESTFORGE_EXTENSIONS",
        value_delimiter = ','
    )]
    pub extensions: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ClassifyFormat::Text)]
    pub format: ClassifyFormat,
}

#[derive(Debug, Serialize)]
struct Classified<'a> {
    path: &'a str,
    kind: TestKind,
}

/// Run the classify command.
///
/// Every recognised path is printed. Unrecognised paths are reported on
/// stderr and make the command fail once all paths have been processed.
pub fn run_classify(args: ClassifyArgs) -> anyhow::Result<()> {
    let classifier = if args.extensions.is_empty() {
        Classifier::with_extensions(DEFAULT_EXTENSIONS.iter().copied())
    } else {
        Classifier::with_extensions(&args.extensions)
    };
    tracing::info!(
        "Classifying {} path(s) with extensions {:?}",
        args.paths.len(),
        classifier.extensions()
    );

    let (classified, errors) = classifier.partition(args.paths.iter().map(String::as_str));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        ClassifyFormat::Text => {
            for (path, kind) in &classified {
                writeln!(out, "{path}\t{kind}")?;
            }
        }
        ClassifyFormat::Json => {
            let rows: Vec<Classified<'_>> = classified
                .iter()
                .map(|(path, kind)| Classified {
                    path: *path,
                    kind: *kind,
                })
                .collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
        }
    }

    for error in &errors {
        eprintln!("{error}");
    }
    if !errors.is_empty() {
        anyhow::bail!(
            "{} of {} path(s) did not match a test kind",
            errors.len(),
            args.paths.len()
        );
    }

    tracing::info!("Classified {} path(s)", classified.len());
    Ok(())
}
