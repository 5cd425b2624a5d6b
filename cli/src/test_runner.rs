use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use dry::DocumentNode;

#[derive(Debug, Deserialize)]
pub struct TestConfig {
    /// Human-readable case description.
    #[serde(default)]
    pub description: Option<String>,

    /// Expected parse error: the error message must contain this substring.
    #[serde(default)]
    pub expect_error: Option<String>,

    /// If set, the error must be reported on this 1-based line of the body.
    #[serde(default)]
    pub expect_error_line: Option<usize>,

    #[serde(default)]
    pub expect_id: Option<String>,

    #[serde(default)]
    pub expect_type: Option<String>,

    /// Number of sections directly under the file.
    #[serde(default)]
    pub expect_sections: Option<usize>,

    /// Number of entries in the file's own options block.
    #[serde(default)]
    pub expect_options: Option<usize>,

    /// Exact file content.
    #[serde(default)]
    pub expect_content: Option<String>,
}

/// Split a `.test.dry` file into its TOML config and DRY body.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}'); // strip BOM

    if !content.starts_with("---") {
        return Err("missing opening --- frontmatter delimiter".into());
    }

    let after_open = &content[3..];
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest_start = close_pos + 4; // skip \n---
    let source = after_open[rest_start..]
        .strip_prefix("\r\n")
        .or_else(|| after_open[rest_start..].strip_prefix('\n'))
        .unwrap_or(&after_open[rest_start..]);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

fn run_single_test(path: &Path) -> TestResult {
    // 1. Read file
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("cannot read file: {}", e)),
            };
        }
    };

    // 2. Parse frontmatter
    let (config, source) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("frontmatter error: {}", e)),
            };
        }
    };

    let description = config.description.clone();

    // 3. Parse the body under the case file's own name
    let result = dry::parse_from_content(&path.to_string_lossy(), source);

    let outcome = match (&config.expect_error, result) {
        (Some(expected), Err(err)) => check_error(&config, expected, &err),
        (Some(expected), Ok(_)) => Some(format!(
            "expected error containing \"{}\", but parsing succeeded",
            expected
        )),
        (None, Err(err)) => Some(format!("unexpected parse error: {}", err)),
        (None, Ok(doc)) => check_document(&config, &doc),
    };

    TestResult {
        path: path.to_path_buf(),
        description,
        outcome: match outcome {
            Some(reason) => TestOutcome::Fail(reason),
            None => TestOutcome::Pass,
        },
    }
}

/// Returns `Some(reason)` if the error does not match the expectations.
fn check_error(config: &TestConfig, expected: &str, err: &dry::ParseError) -> Option<String> {
    if !err.message.contains(expected) {
        return Some(format!(
            "expected error containing \"{}\", got: {}",
            expected, err.message
        ));
    }
    match (config.expect_error_line, err.line) {
        (Some(expected_line), Some(line)) if expected_line != line => Some(format!(
            "expected error on line {}, but it is on line {}",
            expected_line, line
        )),
        (Some(expected_line), None) => Some(format!(
            "expected error on line {}, but the error has no line",
            expected_line
        )),
        _ => None,
    }
}

/// Returns `Some(reason)` on the first expectation the document misses.
fn check_document(config: &TestConfig, doc: &DocumentNode) -> Option<String> {
    if let Some(id) = &config.expect_id {
        if doc.id != *id {
            return Some(format!("id mismatch\n  expected: {}\n  actual:   {}", id, doc.id));
        }
    }

    if let Some(doc_type) = &config.expect_type {
        if doc.doc_type.as_deref() != Some(doc_type.as_str()) {
            return Some(format!(
                "type mismatch\n  expected: {}\n  actual:   {:?}",
                doc_type, doc.doc_type
            ));
        }
    }

    if let Some(count) = config.expect_sections {
        if doc.sections.len() != count {
            return Some(format!(
                "expected {} section(s), got {}",
                count,
                doc.sections.len()
            ));
        }
    }

    if let Some(count) = config.expect_options {
        let actual = doc.options.as_ref().map_or(0, |o| o.len());
        if actual != count {
            return Some(format!("expected {} option(s), got {}", count, actual));
        }
    }

    if let Some(content) = &config.expect_content {
        let expected = content.trim_end_matches('\n');
        if doc.content != expected {
            return Some(format!(
                "content mismatch\n  expected: {:?}\n  actual:   {:?}",
                expected, doc.content
            ));
        }
    }

    None
}

/// Find `.test.dry` files under `root`, keyed by the folder they sit in
/// relative to `root` ("" for `root` itself). Sorted by category, then path.
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_cases(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_cases(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|entry| entry.path()) {
        if path.is_dir() {
            collect_cases(&path, root, out);
            continue;
        }
        let is_case = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(CASE_SUFFIX));
        if is_case {
            let category = path
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            out.entry(category).or_default().push(path);
        }
    }
}

const CASE_SUFFIX: &str = ".test.dry";

fn category_label(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
}

/// List available categories for the given case path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no {} files found in {}", CASE_SUFFIX, path.display());
        return;
    }

    eprintln!("available categories:");
    for (category, files) in &categories {
        eprintln!("  {} ({} cases)", category_label(category), files.len());
    }
}

/// Terminal styling for the report.
struct Style {
    no_color: bool,
}

impl Style {
    fn paint(&self, text: &str, code: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        }
    }

    fn pass(&self) -> String {
        self.paint("PASS", "32")
    }

    fn fail(&self) -> String {
        self.paint("FAIL", "31")
    }

    fn bold(&self, text: &str) -> String {
        self.paint(text, "1")
    }
}

/// Pick the categories to run. Unknown names are reported and skipped.
fn select_categories<'a>(
    all: &'a BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<&'a str, &'a Vec<PathBuf>> {
    if requested.is_empty() {
        return all.iter().map(|(k, v)| (k.as_str(), v)).collect();
    }

    let mut selected = BTreeMap::new();
    for requested in requested {
        let wanted = requested.trim_matches('/');
        let before = selected.len();
        for (category, files) in all {
            if category == wanted || category.starts_with(&format!("{}/", wanted)) {
                selected.insert(category.as_str(), files);
            }
        }
        if selected.len() == before {
            let available: Vec<&str> = all.keys().map(|k| category_label(k)).collect();
            eprintln!(
                "warning: category '{}' not found (available: {})",
                wanted,
                available.join(", ")
            );
        }
    }
    selected
}

/// Run all `.test.dry` files under `path` (or a single file).
/// If `categories` is non-empty, only run cases in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let style = Style { no_color };

    let groups: Vec<(String, Vec<PathBuf>)> = if path.is_file() {
        vec![(String::new(), vec![path.to_path_buf()])]
    } else {
        let all = discover_categorized(path);
        if all.is_empty() {
            eprintln!("no {} files found in {}", CASE_SUFFIX, path.display());
            return 1;
        }
        let selected = select_categories(&all, categories);
        if selected.is_empty() {
            eprintln!("no matching categories found");
            return 1;
        }
        selected
            .into_iter()
            .map(|(category, files)| (category.to_string(), files.clone()))
            .collect()
    };

    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (category, files) in &groups {
        if !path.is_file() {
            eprintln!();
            eprintln!("{}", style.bold(category_label(category)));
        }

        for file in files {
            let result = run_single_test(file);
            let label = result.description.clone().unwrap_or_else(|| {
                file.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
            match result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", style.pass(), label);
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", style.fail(), label);
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for failure in &failures {
            eprintln!();
            eprintln!("  --- {} ---", failure.path.display());
            if let TestOutcome::Fail(reason) = &failure.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    if failures.is_empty() {
        eprintln!("test result: {}. {} passed, 0 failed", style.paint("ok", "32"), passed);
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            style.paint("FAILED", "31"),
            passed,
            failures.len(),
            passed + failures.len()
        );
        1
    }
}
