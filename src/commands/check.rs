//! `testforge check` command handler.

use super::load_schema;
use anyhow::Context;
use clap::Args;
use sample_core::{decode, SchemaNode};
use std::path::PathBuf;

/// Arguments for `testforge check`.
#[derive(Args, Clone, Debug)]
pub struct CheckArgs {
    /// Schema file (YAML)
    #[arg(long, value_name = "PATH")]
    pub schema: PathBuf,

    /// JSON file holding an array of samples (a single value is also accepted)
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> anyhow::Result<()> {
    let schema = load_schema(&args.schema)?;

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read samples from {:?}", args.input))?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON in {:?}", args.input))?;

    let samples = match json {
        serde_json::Value::Array(items) => items,
        single => vec![single],
    };
    tracing::info!("Checking {} sample(s) against {:?}", samples.len(), args.schema);

    let failures = check_samples(&schema, &samples);
    for failure in &failures {
        eprintln!("{failure}");
    }
    if !failures.is_empty() {
        anyhow::bail!(
            "{} of {} sample(s) do not conform to the schema",
            failures.len(),
            samples.len()
        );
    }

    println!("{} sample(s) conform", samples.len());
    Ok(())
}

/// Decode and check each sample, returning one message per failing sample.
pub fn check_samples(schema: &SchemaNode, samples: &[serde_json::Value]) -> Vec<String> {
    samples
        .iter()
        .enumerate()
        .filter_map(|(i, json)| {
            let result = decode(schema, json)
                .map_err(|e| e.to_string())
                .and_then(|value| schema.check(&value).map_err(|e| e.to_string()));
            result.err().map(|e| format!("sample {i}: {e}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sample_core::{FieldSchema, NumberConstraints, StringConstraints};
    use serde_json::json;

    #[test]
    fn test_check_samples_reports_each_failure() {
        let schema = SchemaNode::structure(vec![
            FieldSchema::required("id", SchemaNode::string(StringConstraints::new().with_min_length(1))),
            FieldSchema::required("age", SchemaNode::number(NumberConstraints::int_between(0, 150))),
        ]);

        let failures = check_samples(
            &schema,
            &[
                json!({"id": "a", "age": 3}),
                json!({"id": "", "age": 3}),
                json!({"id": "b"}),
                json!({"id": "c", "age": 200}),
            ],
        );

        assert_eq!(failures.len(), 3);
        assert!(failures[0].starts_with("sample 1: $.id"));
        assert!(failures[1].starts_with("sample 2: $.age"));
        assert!(failures[2].starts_with("sample 3: $.age"));
    }
}
