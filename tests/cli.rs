#![cfg(feature = "cli")]

use std::process::Command;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_curriculum-pdf"))
}

#[test]
fn query_and_only_are_mutually_exclusive() {
    let out = cli()
        .args(["render", "--query", "exp", "--only", "cursos"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("cannot be used with"), "{stderr}");
}

#[test]
fn render_writes_the_active_profile() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("store.json");
    std::fs::write(
        &store,
        r#"{"profiles": [{"id": 1, "first_names": "Ana", "last_names": "Loor",
            "national_id": "1312345678", "active": true, "printing_allowed": true}]}"#,
    )
    .unwrap();
    let output = dir.path().join("cv.pdf");

    let out = cli()
        .arg("--store")
        .arg(&store)
        .arg("--media")
        .arg(dir.path())
        .args(["render", "--only", "exp", "-o"])
        .arg(&output)
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(std::fs::read(&output).unwrap().starts_with(b"%PDF-"));
}
