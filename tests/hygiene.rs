//! Hygiene: source-level budgets checked at test time.
//!
//! Scans `src/` (minus `_test.rs` files) for constructs that panic or drop
//! errors on the floor. Every budget is zero; fix an existing hit before
//! raising one.
//!
//! Also pins the browser boundary: only the canvas backend and the engine
//! shell may name `web_sys`.

use std::fs;
use std::path::Path;

struct SourceFile {
    path: String,
    content: String,
}

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const PANICS: &[Budget] = &[
    Budget { pattern: ".unwrap()", max: 0, why: "panics on None/Err" },
    Budget { pattern: ".expect(", max: 0, why: "panics on None/Err" },
    Budget { pattern: "panic!(", max: 0, why: "aborts the host page" },
    Budget { pattern: "unreachable!(", max: 0, why: "aborts the host page" },
    Budget { pattern: "todo!(", max: 0, why: "unfinished code" },
    Budget { pattern: "unimplemented!(", max: 0, why: "unfinished code" },
];

const SILENT_LOSS: &[Budget] = &[
    Budget { pattern: "let _ =", max: 0, why: "discards a value without inspecting it" },
    Budget { pattern: ".ok()", max: 0, why: "turns an error into None" },
    Budget { pattern: "#[allow(dead_code)]", max: 0, why: "hides unused code" },
];

/// Files allowed to touch the DOM.
const BROWSER_FILES: &[&str] = &["canvas2d.rs", "engine.rs"];

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .map(|f| (f.path.clone(), f.content.lines().filter(|l| l.contains(pattern)).count()))
        .filter(|(_, n)| *n > 0)
        .collect()
}

fn check(budgets: &[Budget]) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found under src/");

    let mut failures = Vec::new();
    for budget in budgets {
        let found = hits(&files, budget.pattern);
        let count: usize = found.iter().map(|(_, n)| n).sum();
        if count > budget.max {
            let listing: Vec<String> = found.iter().map(|(p, n)| format!("    {p}: {n}")).collect();
            failures.push(format!(
                "`{}` ({}): found {count}, max {}\n{}",
                budget.pattern,
                budget.why,
                budget.max,
                listing.join("\n")
            ));
        }
    }
    assert!(failures.is_empty(), "budget exceeded:\n{}", failures.join("\n"));
}

#[test]
fn panic_budgets() {
    check(PANICS);
}

#[test]
fn silent_loss_budgets() {
    check(SILENT_LOSS);
}

#[test]
fn dom_access_stays_in_backend() {
    let offenders: Vec<String> = source_files()
        .into_iter()
        .filter(|f| f.content.contains("web_sys::"))
        .filter(|f| !BROWSER_FILES.iter().any(|name| f.path.ends_with(name)))
        .map(|f| f.path)
        .collect();
    assert!(offenders.is_empty(), "web_sys used outside the canvas backend: {offenders:?}");
}
