//! Fixture runner: build every `samples/*.json` and compare with its
//! `*.expected.json` sidecar.
//!
//! usage: dev-test-runner [GLOB]   (default: samples/*.json)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Deserialize;

use json_efmap::codegen::{self, RenderConfig};
use json_efmap::config::parse_date;
use json_efmap::build_from_str;

const EXPECTED_SUFFIX: &str = ".expected.json";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Expectation {
    #[serde(default)]
    root_name: String,
    #[serde(default)]
    prefix: String,
    /// class names in model order
    #[serde(default)]
    classes: Vec<String>,
    /// files that must be rendered
    #[serde(default)]
    files: Vec<String>,
    /// `BuildError::kind()` when the build must fail
    error: Option<String>,
}

fn expectation_path(sample: &Path) -> PathBuf {
    let stem = sample.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    sample.with_file_name(format!("{stem}{EXPECTED_SUFFIX}"))
}

fn check(sample: &Path) -> Result<()> {
    let source = std::fs::read_to_string(sample)?;
    let expected_path = expectation_path(sample);
    let expected_src = std::fs::read_to_string(&expected_path)
        .with_context(|| format!("missing {}", expected_path.display()))?;
    let expected: Expectation = json_efmap::path_de::from_str_with_path(&expected_src)
        .map_err(anyhow::Error::msg)?;

    let outcome = build_from_str(&source, &expected.root_name, &expected.prefix);
    match (outcome, expected.error.as_deref()) {
        (Err(error), Some(kind)) if error.kind() == kind => Ok(()),
        (Err(error), _) => anyhow::bail!("build failed: {error}"),
        (Ok(_), Some(kind)) => anyhow::bail!("expected a {kind} error, build succeeded"),
        (Ok(model), None) => {
            let names: Vec<&str> = model.class_names().collect();
            anyhow::ensure!(names == expected.classes, "classes {names:?} != {:?}", expected.classes);

            let config = RenderConfig {
                prefix: expected.prefix.clone(),
                project_name: "Fixtures".to_string(),
                author: "dev-test-runner".to_string(),
                date: parse_date("2024-01-01")?,
            };
            let files = codegen::render(&model, &config);
            for file in &expected.files {
                anyhow::ensure!(files.contains_key(file), "file {file} was not rendered");
            }
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let pattern = std::env::args().nth(1).unwrap_or_else(|| "samples/*.json".to_string());
    let mut failed = 0usize;
    let mut total = 0usize;
    for entry in glob::glob(&pattern)? {
        let sample = entry?;
        if sample.to_string_lossy().ends_with(EXPECTED_SUFFIX) {
            continue;
        }
        total += 1;
        match check(&sample) {
            Ok(()) => eprintln!("✅ {}", sample.display()),
            Err(error) => {
                failed += 1;
                eprintln!("❌ {} {}", sample.display(), format!("{error:#}").red());
            }
        }
    }
    let summary = format!("{} passed, {failed} failed", total - failed);
    if failed > 0 {
        eprintln!("{}", summary.red().bold());
        std::process::exit(1);
    }
    eprintln!("{}", summary.green().bold());
    Ok(())
}
