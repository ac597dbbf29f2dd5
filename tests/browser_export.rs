//! Browser export tests: rendering in real Chrome and the PDF it produces.
//!
//! Run with: `cargo test --test browser_export -- --ignored`

use cvpress::export::{ChromeRasterizer, Rasterizer};
use cvpress::model::{Cv, Locale};
use cvpress::render::render_document;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, OnceLock};
use tempfile::TempDir;

const FIXTURE_ID: &str = "cv_fixture_jane";

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/jane.json")
}

fn fixture_cv() -> Cv {
    let raw = std::fs::read_to_string(fixture_path()).expect("missing fixture");
    serde_json::from_str(&raw).expect("fixture is not a CV")
}

fn cvpress(data_dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_cvpress"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .output()
        .expect("failed to run cvpress")
}

/// Data directory with the fixture imported, shared across tests.
fn data_dir() -> &'static Path {
    static DIR: OnceLock<TempDir> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = TempDir::new().expect("failed to create data dir");
        let out = cvpress(dir.path(), &["import", fixture_path().to_str().unwrap()]);
        assert!(out.status.success(), "import failed: {:?}", out);
        dir
    })
    .path()
}

fn browser() -> &'static Browser {
    static B: OnceLock<Browser> = OnceLock::new();
    B.get_or_init(|| {
        Browser::new(LaunchOptions {
            window_size: Some((1280, 800)),
            ..Default::default()
        })
        .expect("failed to launch Chrome")
    })
}

fn load_preview(locale: &str) -> Arc<Tab> {
    let file = data_dir().join(format!("preview-{locale}.html"));
    let out = cvpress(
        data_dir(),
        &[
            "preview",
            FIXTURE_ID,
            "--locale",
            locale,
            "--out",
            file.to_str().unwrap(),
        ],
    );
    assert!(out.status.success(), "preview failed: {:?}", out);

    let tab = browser().new_tab().unwrap();
    tab.navigate_to(&format!("file://{}", file.display()))
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    tab
}

fn eval(tab: &Tab, js: &str) -> serde_json::Value {
    tab.evaluate(js, false)
        .expect("failed to evaluate JS")
        .value
        .expect("no value returned")
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn page_is_a4_width() {
    let tab = load_preview("en");
    let width = eval(&tab, "document.querySelector('.cv-page').offsetWidth");
    assert_eq!(width.as_f64(), Some(794.0));
}

#[test]
#[ignore]
fn english_preview_has_section_headings() {
    let tab = load_preview("en");
    let headings = eval(
        &tab,
        "Array.from(document.querySelectorAll('h2')).map(h => h.textContent).join('|')",
    );
    let headings = headings.as_str().unwrap();
    assert!(headings.contains("Work Experience"), "headings: {}", headings);
    assert!(headings.contains("Skills"), "headings: {}", headings);
}

#[test]
#[ignore]
fn korean_preview_uses_korean_labels() {
    let tab = load_preview("ko");
    let lang = eval(&tab, "document.documentElement.lang");
    assert_eq!(lang.as_str(), Some("ko"));
    let headings = eval(
        &tab,
        "Array.from(document.querySelectorAll('h2')).map(h => h.textContent).join('|')",
    );
    assert!(headings.as_str().unwrap().contains("경력 사항"));
}

#[test]
#[ignore]
fn blank_skills_are_not_rendered() {
    let tab = load_preview("en");
    let count = eval(&tab, "document.querySelectorAll('.skill-list .skill').length");
    assert_eq!(count.as_f64(), Some(4.0));
}

// ---------------------------------------------------------------------------
// Rasterization and export
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn rasterizer_captures_at_twice_css_width() {
    let html = render_document(&fixture_cv(), Locale::English).into_string();
    let bitmap = ChromeRasterizer::new()
        .rasterize(&html, 794, 2.0)
        .expect("rasterization failed");
    assert_eq!(bitmap.width(), 794 * 2);
    assert!(bitmap.height() > 0);
}

#[test]
#[ignore]
fn cli_export_writes_pdf() {
    let out_dir = TempDir::new().unwrap();
    let out = cvpress(
        data_dir(),
        &[
            "export",
            FIXTURE_ID,
            "--out-dir",
            out_dir.path().to_str().unwrap(),
        ],
    );
    assert!(out.status.success(), "export failed: {:?}", out);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("Generating PDF…"), "stdout: {}", stdout);

    let pdf = out_dir.path().join("Jane_Doe_Backend_CV.pdf");
    let bytes = std::fs::read(&pdf).expect("PDF not written");
    assert!(bytes.starts_with(b"%PDF"));
    let doc = lopdf::Document::load_mem(&bytes).expect("PDF does not parse");
    assert!(!doc.get_pages().is_empty());
}
