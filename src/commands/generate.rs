//! `testforge generate` command handler.

use super::load_schema;
use anyhow::Context;
use clap::{Args, ValueEnum};
use sample_core::{GenerationRequest, SampleValue};
use sample_generator::default_generator;
use std::io::Write;
use std::path::PathBuf;

/// Output format for generated samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SampleFormat {
    /// Pretty-printed JSON array
    #[default]
    Json,
    /// One compact JSON value per line
    Jsonl,
    /// YAML sequence
    Yaml,
}

/// Arguments for `testforge generate`.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Schema file (YAML)
    #[arg(long, value_name = "PATH", required_unless_present = "request", conflicts_with = "request")]
    pub schema: Option<PathBuf>,

    /// Generation request file (YAML with schema, count and seed)
    #[arg(long, value_name = "PATH")]
    pub request: Option<PathBuf>,

    /// Number of samples (default: 1, or the request's count)
    #[arg(long, env = "TESTFORGE_COUNT")]
    pub count: Option<usize>,

    /// Seed for reproducible output; omit for random samples
    #[arg(long, env = "TESTFORGE_SEED")]
    pub seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = SampleFormat::Json)]
    pub format: SampleFormat,

    /// Write samples to this file instead of stdout
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Run the generate command.
pub fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let samples = match (&args.request, &args.schema) {
        (Some(request_path), _) => {
            let mut request = GenerationRequest::from_file(request_path)
                .with_context(|| format!("Failed to load request from {request_path:?}"))?;
            if let Some(count) = args.count {
                request.count = count;
            }
            if args.seed.is_some() {
                request.seed = args.seed;
            }
            tracing::info!(
                "Generating {} sample(s) from request {:?} (seed: {:?})",
                request.count,
                request_path,
                request.seed
            );
            default_generator().generate_request(&request)?
        }
        (None, Some(schema_path)) => {
            let schema = load_schema(schema_path)?;
            let count = args.count.unwrap_or(1);
            tracing::info!(
                "Generating {} sample(s) from {:?} (seed: {:?})",
                count,
                schema_path,
                args.seed
            );
            default_generator().generate(&schema, count, args.seed)?
        }
        (None, None) => anyhow::bail!("Either --schema or --request is required"),
    };

    let rendered = render(&samples, args.format)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} sample(s) to {}", samples.len(), path.display());
        }
        None => std::io::stdout().lock().write_all(rendered.as_bytes())?,
    }

    Ok(())
}

/// Render samples in the requested format, newline terminated.
pub fn render(samples: &[SampleValue], format: SampleFormat) -> anyhow::Result<String> {
    let rendered = match format {
        SampleFormat::Json => format!("{}\n", serde_json::to_string_pretty(samples)?),
        SampleFormat::Jsonl => {
            let mut out = String::new();
            for sample in samples {
                out.push_str(&serde_json::to_string(sample)?);
                out.push('\n');
            }
            out
        }
        SampleFormat::Yaml => serde_yaml::to_string(samples)?,
    };
    Ok(rendered)
}
