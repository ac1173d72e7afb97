//! Command-line behavior of the `visura` binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use predicates::prelude::*;
use tempfile::TempDir;

fn build_pdf(lines: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 9.into()]));
        operations.push(Operation::new("Td", vec![30.into(), (800 - (i as i64) * 20).into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        operations.push(Operation::new("ET", vec![]));
    }
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Workspace with a config pinned to the in-process lopdf backend.
fn workspace() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"backends": {"order": ["lopdf"]}}"#).unwrap();
    (dir, config)
}

fn write_visura(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let pdf = build_pdf(&[
        "Denominazione: IMMOBILIARE ESEMPIO S.R.L.",
        "Partita IVA: 04837181009",
        "Codice ATECO: 68.31",
        "Oggetto sociale: INTERMEDIAZIONE, SERVIZI E CONSULENZE IN MATERIA DI COMPRAVENDITA IMMOBILIARE",
        "CAPITALE SOCIALE: 10.000,00 EURO",
    ]);
    std::fs::write(&path, pdf).unwrap();
    path
}

fn visura(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("visura").unwrap();
    cmd.arg("-c").arg(config);
    cmd
}

#[test]
fn test_help() {
    Command::cargo_bin("visura")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("batch"));
}

#[test]
fn test_process_visura_json() {
    let (dir, config) = workspace();
    let input = write_visura(dir.path(), "visura.pdf");

    let output = visura(&config).arg("process").arg(&input).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["method"], "full+lopdf");
    assert_eq!(json["data"]["partita_iva"], "04837181009");
    assert_eq!(json["data"]["codice_ateco"], "68.31");
    assert_eq!(json["data"]["confidence"]["score"], 100);
    assert_eq!(json["data"]["denominazione"], "IMMOBILIARE ESEMPIO S.R.L.");
}

#[test]
fn test_process_text_format() {
    let (dir, config) = workspace();
    let input = write_visura(dir.path(), "visura.pdf");

    visura(&config)
        .args(["process", "-f", "text"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Partita IVA:     04837181009"))
        .stdout(predicate::str::contains("Confidence: 100%"));
}

#[test]
fn test_process_rejects_non_pdf() {
    let (dir, config) = workspace();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, "Partita IVA: 04837181009").unwrap();

    visura(&config)
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stdout(predicate::str::contains("INVALID_FILE_TYPE"));
}

#[test]
fn test_process_rejects_empty_file() {
    let (dir, config) = workspace();
    let input = dir.path().join("empty.pdf");
    std::fs::write(&input, b"").unwrap();

    visura(&config)
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stdout(predicate::str::contains("EMPTY_FILE"));
}

#[test]
fn test_batch_with_summary() {
    let (dir, config) = workspace();
    write_visura(dir.path(), "a.pdf");
    write_visura(dir.path(), "b.pdf");
    let out = dir.path().join("out");
    let pattern = format!("{}/*.pdf", dir.path().display());

    visura(&config)
        .args(["batch", &pattern, "--summary", "-j", "2"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful, 0 failed"));

    assert!(out.join("a.json").exists());
    assert!(out.join("b.json").exists());
    let summary = std::fs::read_to_string(out.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 3);
    assert!(summary.contains("04837181009"));
}

#[test]
fn test_batch_failure_handling() {
    let (dir, config) = workspace();
    write_visura(dir.path(), "a.pdf");
    std::fs::write(dir.path().join("bad.pdf"), b"").unwrap();
    let pattern = format!("{}/*.pdf", dir.path().display());

    visura(&config)
        .args(["batch", &pattern, "-j", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("EMPTY_FILE"));

    visura(&config)
        .args(["batch", &pattern, "-j", "1", "--continue-on-error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful, 1 failed"))
        .stdout(predicate::str::contains("bad.pdf"));
}

#[test]
fn test_ateco_lookup() {
    let (_dir, config) = workspace();

    visura(&config)
        .args(["ateco", "62,01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("62.01"))
        .stdout(predicate::str::contains("ict"));

    visura(&config)
        .args(["ateco", "2024"])
        .assert()
        .failure();
}

#[test]
fn test_config_get() {
    let (_dir, config) = workspace();

    visura(&config)
        .args(["config", "get", "backends.order"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lopdf"));
}
