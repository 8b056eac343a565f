use std::fs;
use std::path::{Path, PathBuf};

fn rs_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|s| s.to_str()) == Some("rs") {
                out.push(path);
            }
        }
    }
    out.sort();
    out
}

fn rel(path: &Path) -> String {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let rel = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string();
    rel.replace('\\', "/")
}

#[test]
fn parsers_never_spawn_processes() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/smi");
    let mut violations = Vec::new();

    for file in [root.join("process.rs"), root.join("memory.rs")] {
        let content = fs::read_to_string(&file).unwrap_or_default();
        for forbidden in ["Command", "tokio", "crate::system"] {
            if content.contains(forbidden) {
                violations.push(format!(
                    "{} references forbidden dependency `{}`",
                    rel(&file),
                    forbidden
                ));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Parser purity violations:\n{}",
        violations.join("\n")
    );
}

#[test]
fn only_the_runner_spawns_nvidia_smi() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    let mut violations = Vec::new();

    for file in rs_files(&root) {
        let content = fs::read_to_string(&file).unwrap_or_default();
        if !content.contains("Command::new") {
            continue;
        }
        let rel_path = rel(&file);
        if rel_path != "src/smi/runner.rs" {
            violations.push(format!("{rel_path} spawns a command outside the runner"));
        }
    }

    assert!(
        violations.is_empty(),
        "Process spawning boundary violations:\n{}",
        violations.join("\n")
    );
}

#[test]
fn only_kill_talks_to_sysinfo() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    let mut users = Vec::new();

    for file in rs_files(&root) {
        let content = fs::read_to_string(&file).unwrap_or_default();
        if content.contains("sysinfo::") {
            users.push(rel(&file));
        }
    }

    assert_eq!(
        users,
        vec!["src/system/kill.rs".to_string()],
        "sysinfo must only be used by the signalling layer"
    );
}
