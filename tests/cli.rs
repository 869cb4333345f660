#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn testforge() -> Command {
    let mut cmd = Command::cargo_bin("testforge").unwrap();
    cmd.env_remove("TESTFORGE_SEED")
        .env_remove("TESTFORGE_COUNT")
        .env_remove("TESTFORGE_EXTENSIONS");
    cmd
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn generate_json(args: &[&str]) -> serde_json::Value {
    let output = testforge().arg("generate").args(args).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// testforge classify
// ---------------------------------------------------------------------------

#[test]
fn classify_prints_kind_per_path() {
    testforge()
        .args([
            "classify",
            "src/pricing.test.ts",
            "src/orders.integration.ts",
            "e2e/checkout.spec.ts",
            "src/payment.test-impl.ts",
        ])
        .assert()
        .success()
        .stdout(
            "src/pricing.test.ts\tunit\n\
             src/orders.integration.ts\tintegration\n\
             e2e/checkout.spec.ts\te2e\n\
             src/payment.test-impl.ts\ttest_implementation\n",
        );
}

#[test]
fn classify_fails_on_unrecognized_path_after_reporting_all() {
    testforge()
        .args(["classify", "a.test.ts", "orders.handler.ts", "b.spec.ts"])
        .assert()
        .failure()
        .stdout("a.test.ts\tunit\nb.spec.ts\te2e\n")
        .stderr(predicate::str::contains("orders.handler.ts"))
        .stderr(predicate::str::contains("1 of 3 path(s)"));
}

#[test]
fn classify_json_output() {
    let output = testforge()
        .args(["classify", "--format", "json", "payment.test-impl.ts"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        rows,
        serde_json::json!([{"path": "payment.test-impl.ts", "kind": "test_implementation"}])
    );
}

#[test]
fn classify_extensions_from_flag_and_env() {
    testforge()
        .args(["classify", "--ext", "tsx", "Cart.test.tsx"])
        .assert()
        .success()
        .stdout("Cart.test.tsx\tunit\n");

    testforge()
        .env("TESTFORGE_EXTENSIONS", "js,mjs")
        .args(["classify", "api.integration.mjs"])
        .assert()
        .success()
        .stdout("api.integration.mjs\tintegration\n");

    testforge()
        .args(["classify", "--ext", "tsx", "Cart.test.ts"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// testforge generate
// ---------------------------------------------------------------------------

#[test]
fn generate_is_reproducible_with_seed() {
    let schema = fixture("user_schema.yaml");
    let args = ["--schema", schema.as_str(), "--count", "3", "--seed", "42"];

    let first = generate_json(&args);
    let second = generate_json(&args);

    assert_eq!(first, second);
    let records = first.as_array().unwrap();
    assert_eq!(records.len(), 3);
    for record in records {
        assert!(!record["id"].as_str().unwrap().is_empty());
        let age = record["age"].as_i64().unwrap();
        assert!((0..=150).contains(&age));
    }
}

#[test]
fn generate_seed_from_env() {
    let schema = fixture("user_schema.yaml");
    let with_flag = generate_json(&["--schema", &schema, "--count", "2", "--seed", "7"]);

    let output = testforge()
        .env("TESTFORGE_SEED", "7")
        .env("TESTFORGE_COUNT", "2")
        .args(["generate", "--schema", &schema])
        .output()
        .unwrap();
    assert!(output.status.success());
    let with_env: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(with_flag, with_env);
}

#[test]
fn generate_from_request_file() {
    let from_request = generate_json(&["--request", &fixture("users.request.yaml")]);
    let from_schema = generate_json(&[
        "--schema",
        &fixture("user_schema.yaml"),
        "--count",
        "3",
        "--seed",
        "42",
    ]);
    assert_eq!(from_request, from_schema);
}

#[test]
fn generate_jsonl_to_file_then_check_roundtrip() {
    let dir = TempDir::new().unwrap();
    let schema = fixture("order_schema.yaml");
    let json_path = dir.path().join("orders.json");

    testforge()
        .args(["generate", "--schema", &schema, "--count", "10", "--seed", "1", "-o"])
        .arg(&json_path)
        .assert()
        .success()
        .stdout("");

    testforge()
        .args(["check", "--schema", &schema, "--input"])
        .arg(&json_path)
        .assert()
        .success()
        .stdout("10 sample(s) conform\n");

    let jsonl = testforge()
        .args(["generate", "--schema", &schema, "--count", "4", "--seed", "1", "--format", "jsonl"])
        .output()
        .unwrap();
    assert!(jsonl.status.success());
    assert_eq!(String::from_utf8(jsonl.stdout).unwrap().lines().count(), 4);
}

#[test]
fn generate_yaml_output() {
    testforge()
        .args([
            "generate",
            "--schema",
            &fixture("user_schema.yaml"),
            "--count",
            "2",
            "--seed",
            "3",
            "--format",
            "yaml",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("- id: "));
}

#[test]
fn generate_rejects_cyclic_schema() {
    testforge()
        .args(["generate", "--schema", &fixture("cyclic_schema.yaml")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cyclic schema: category -> category"));
}

#[test]
fn generate_rejects_unsatisfiable_schema() {
    testforge()
        .args(["generate", "--schema", &fixture("unsatisfiable_schema.yaml"), "--seed", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsatisfiable constraint at $"))
        .stderr(predicate::str::contains("min_length 5"));
}

#[test]
fn generate_requires_schema_or_request() {
    testforge().arg("generate").assert().failure();
}

// ---------------------------------------------------------------------------
// testforge check
// ---------------------------------------------------------------------------

#[test]
fn check_reports_nonconforming_samples() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("users.json");
    std::fs::write(
        &input,
        r#"[{"id": "u1", "age": 30}, {"id": "", "age": 30}, {"id": "u3", "age": 151}]"#,
    )
    .unwrap();

    testforge()
        .args(["check", "--schema", &fixture("user_schema.yaml"), "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("sample 1: $.id"))
        .stderr(predicate::str::contains("sample 2: $.age"))
        .stderr(predicate::str::contains("2 of 3 sample(s)"));
}

#[test]
fn check_missing_input_names_the_file() {
    testforge()
        .args([
            "check",
            "--schema",
            &fixture("user_schema.yaml"),
            "--input",
            "/nonexistent/samples.json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/samples.json"));
}
