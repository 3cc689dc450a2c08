//! End-to-end test for the discogen CLI against a local document file.

use std::process::Command;

use anyhow::{bail, Context, Result};

const FIXTURE: &str = r#"{
    "id": "mini:v1",
    "name": "mini",
    "version": "v1",
    "title": "Mini API",
    "rootUrl": "https://mini.example.com/",
    "resources": {
        "things": {
            "methods": {
                "list": {
                    "httpMethod": "GET",
                    "path": "things",
                    "response": {"$ref": "ThingList"}
                }
            }
        }
    },
    "schemas": {
        "ThingList": {
            "id": "ThingList",
            "type": "object",
            "properties": {
                "count": {"type": "integer"}
            }
        }
    }
}"#;

#[test]
fn test_generate_from_local_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let doc_path = dir.path().join("mini.json");
    let out_path = dir.path().join("mini.ts");
    std::fs::write(&doc_path, FIXTURE)?;

    let output = Command::new(env!("CARGO_BIN_EXE_discogen"))
        .arg("generate")
        .arg(&doc_path)
        .arg("--output")
        .arg(&out_path)
        .output()
        .context("Failed to execute discogen")?;

    if !output.status.success() {
        bail!(
            "generate failed with status {}\nstdout: {}\nstderr: {}",
            output.status,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let module = std::fs::read_to_string(&out_path).context("Output module should exist")?;
    assert!(module.contains("export class Mini {"));
    assert!(module.contains("async thingsList(): Promise<ThingList> {"));
    assert!(module.contains("export interface ThingList {"));
    Ok(())
}

#[test]
fn test_generate_to_stdout() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let doc_path = dir.path().join("mini.json");
    std::fs::write(&doc_path, FIXTURE)?;

    let output = Command::new(env!("CARGO_BIN_EXE_discogen"))
        .arg("generate")
        .arg(&doc_path)
        .arg("--output")
        .arg("-")
        .output()
        .context("Failed to execute discogen")?;

    if !output.status.success() {
        bail!("generate failed with status {}", output.status);
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("export class Mini {"));
    Ok(())
}

#[test]
fn test_invalid_document_fails() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let doc_path = dir.path().join("broken.json");
    // Missing `title` and `rootUrl`: generation preflight must reject it
    std::fs::write(&doc_path, r#"{"id": "broken:v1", "name": "broken"}"#)?;

    let output = Command::new(env!("CARGO_BIN_EXE_discogen"))
        .arg("generate")
        .arg(&doc_path)
        .output()
        .context("Failed to execute discogen")?;

    assert!(!output.status.success());
    Ok(())
}
