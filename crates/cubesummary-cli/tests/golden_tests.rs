use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use similar::{ChangeTag, TextDiff};

const SAMPLE: &str = "{fixtures}/ls5_fc_albers-sample.jsonl";
const TWO_PRODUCTS: &str = "{fixtures}/two-products.jsonl";

/// Golden cases, run in order. Later cases read the summary files written
/// by earlier `generate` cases.
const CASES: &[(&str, &[&str])] = &[
    (
        "generate_chicago",
        &[
            "generate", "--datasets", SAMPLE, "--tz", "America/Chicago", "--output",
            "{summaries}/chicago.json",
        ],
    ),
    (
        "generate_darwin",
        &[
            "generate", "--datasets", SAMPLE, "--tz", "Australia/Darwin", "--output",
            "{summaries}/darwin.json",
        ],
    ),
    (
        "summary_chicago_month",
        &[
            "summary", "--product", "ls5_fc_albers", "--year", "2010", "--month", "12",
            "--summaries", "{summaries}/chicago.json",
        ],
    ),
    (
        "summary_chicago_day",
        &[
            "summary", "--product", "ls5_fc_albers", "--year", "2010", "--month", "12", "--day",
            "30", "--summaries", "{summaries}/chicago.json",
        ],
    ),
    (
        "summary_chicago_missing_year",
        &[
            "summary", "--product", "ls5_fc_albers", "--year", "2011", "--summaries",
            "{summaries}/chicago.json",
        ],
    ),
    (
        "summary_darwin_all",
        &[
            "summary", "--product", "ls5_fc_albers", "--summaries", "{summaries}/darwin.json",
        ],
    ),
    (
        "datasets_darwin_2011",
        &[
            "datasets", "--datasets", SAMPLE, "--product", "ls5_fc_albers", "--year", "2011",
            "--tz", "Australia/Darwin",
        ],
    ),
    (
        "search_chicago",
        &[
            "search", "--datasets", SAMPLE, "--product", "ls5_fc_albers", "--begin",
            "2010-12-30", "--end", "2010-12-31", "--tz", "America/Chicago",
        ],
    ),
    (
        "period_chicago_day",
        &[
            "period", "--tz", "America/Chicago", "--year", "2010", "--month", "12", "--day",
            "30", "--output-format", "text",
        ],
    ),
    (
        "generate_shared_ls5",
        &[
            "generate", "--datasets", TWO_PRODUCTS, "--product", "ls5_fc_albers", "--tz", "UTC",
            "--output", "{summaries}/shared.json",
        ],
    ),
    (
        "generate_shared_ls7",
        &[
            "generate", "--datasets", TWO_PRODUCTS, "--product", "ls7_fc_albers", "--tz", "UTC",
            "--output", "{summaries}/shared.json",
        ],
    ),
    (
        "summary_shared_ls5",
        &[
            "summary", "--product", "ls5_fc_albers", "--summaries", "{summaries}/shared.json",
        ],
    ),
    (
        "summary_shared_ls7",
        &[
            "summary", "--product", "ls7_fc_albers", "--summaries", "{summaries}/shared.json",
        ],
    ),
];

fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

fn fixture_dir() -> PathBuf {
    project_root().join("fixtures")
}

fn golden_dir() -> PathBuf {
    project_root().join("golden")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cubesummary-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).expect("Failed to create scratch directory");
    dir
}

fn update_golden() -> bool {
    std::env::var("UPDATE_GOLDEN").is_ok()
}

fn diff_strings(expected: &str, actual: &str) -> String {
    let diff = TextDiff::from_lines(expected, actual);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        out.push_str(&format!("{sign}{change}"));
    }
    out
}

fn run_cli(args: &[String]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cubesummary"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("CUBESUMMARY_CONFIG")
        .output()
        .expect("Failed to execute cubesummary")
}

fn expand(args: &[&str], summaries: &Path) -> Vec<String> {
    let fixtures = fixture_dir();
    args.iter()
        .map(|a| {
            a.replace("{fixtures}", &fixtures.display().to_string())
                .replace("{summaries}", &summaries.display().to_string())
        })
        .collect()
}

#[test]
fn golden_text_output() {
    let golden = golden_dir();
    let summaries = scratch_dir("golden");

    for (name, args) in CASES {
        let golden_path = golden.join(format!("{name}.txt"));
        let output = run_cli(&expand(args, &summaries));

        assert!(
            output.status.success(),
            "cubesummary failed for {}: {}",
            name,
            String::from_utf8_lossy(&output.stderr)
        );

        let actual = String::from_utf8(output.stdout).expect("Output is not valid UTF-8");

        if update_golden() {
            fs::create_dir_all(&golden).ok();
            fs::write(&golden_path, &actual)
                .unwrap_or_else(|e| panic!("Failed to write golden file {golden_path:?}: {e}"));
            eprintln!("Updated golden file: {golden_path:?}");
            continue;
        }

        let expected = fs::read_to_string(&golden_path).unwrap_or_else(|e| {
            panic!(
                "Golden file {golden_path:?} not found: {e}\n\
                 Hint: Run with UPDATE_GOLDEN=1 to generate golden files"
            )
        });

        if actual != expected {
            let diff = diff_strings(&expected, &actual);
            panic!(
                "Golden test mismatch for {name}:\n\n\
                 {diff}\n\n\
                 Run with UPDATE_GOLDEN=1 to refresh snapshots"
            );
        }
    }

    fs::remove_dir_all(&summaries).ok();
}

#[test]
fn day_without_month_is_input_error() {
    let summaries = scratch_dir("invalid");
    let output = run_cli(&expand(
        &[
            "summary", "--product", "ls5_fc_albers", "--year", "2010", "--day", "30",
            "--summaries", "{summaries}/none.json",
        ],
        &summaries,
    ));

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error: "), "unexpected stderr: {stderr}");

    fs::remove_dir_all(&summaries).ok();
}

#[test]
fn missing_summary_file_is_runtime_error() {
    let summaries = scratch_dir("missing");
    let output = run_cli(&expand(
        &[
            "summary", "--product", "ls5_fc_albers", "--summaries", "{summaries}/none.json",
            "--output-format", "json",
        ],
        &summaries,
    ));

    assert_eq!(output.status.code(), Some(3));
    let envelope: serde_json::Value =
        serde_json::from_slice(&output.stderr).expect("error envelope is JSON");
    assert_eq!(envelope["exit_code"], 3);

    fs::remove_dir_all(&summaries).ok();
}

#[test]
fn json_search_rows_carry_utc_label() {
    let summaries = scratch_dir("json");
    let output = run_cli(&expand(
        &[
            "search", "--datasets", SAMPLE, "--product", "ls5_fc_albers", "--begin",
            "2010-12-31", "--end", "2011-01-01", "--tz", "America/Chicago", "--output-format",
            "json",
        ],
        &summaries,
    ));

    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let rows = rows.as_array().expect("array of rows");

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["center_time"]["local"], "2010-12-31 17:09:49");
    assert_eq!(
        rows[0]["center_time"]["utc_label"],
        "Time UTC: 2010-12-31 23:09:49"
    );
    assert!(rows[0]["footprint"].is_object());

    fs::remove_dir_all(&summaries).ok();
}

#[test]
fn generate_json_reports_malformed_line() {
    let summaries = scratch_dir("generate-json");
    let output = run_cli(&expand(
        &[
            "generate", "--datasets", SAMPLE, "--tz", "America/Chicago", "--output",
            "{summaries}/out.json", "--output-format", "json",
        ],
        &summaries,
    ));

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");

    assert_eq!(report["ingest"]["added"], 5);
    assert_eq!(report["ingest"]["failures"][0]["line"], 7);
    assert_eq!(report["products"][0]["periods"], 5);
    assert!(summaries.join("out.json").exists());

    fs::remove_dir_all(&summaries).ok();
}

#[test]
fn product_update_keeps_zone_of_existing_file() {
    let summaries = scratch_dir("zone-update");
    let generate = |product: &str, tz: &str| {
        run_cli(&expand(
            &[
                "generate", "--datasets", TWO_PRODUCTS, "--product", product, "--tz", tz,
                "--output", "{summaries}/shared.json",
            ],
            &summaries,
        ))
    };

    assert!(generate("ls5_fc_albers", "UTC").status.success());
    let before = fs::read_to_string(summaries.join("shared.json")).unwrap();

    let output = generate("ls7_fc_albers", "America/Chicago");
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(fs::read_to_string(summaries.join("shared.json")).unwrap(), before);

    fs::remove_dir_all(&summaries).ok();
}

#[test]
fn max_failures_rejects_malformed_input() {
    let summaries = scratch_dir("max-failures");
    let output = run_cli(&expand(
        &[
            "generate", "--datasets", SAMPLE, "--output", "{summaries}/out.json",
            "--max-failures", "0",
        ],
        &summaries,
    ));

    assert_eq!(output.status.code(), Some(2));
    assert!(!summaries.join("out.json").exists());

    fs::remove_dir_all(&summaries).ok();
}
