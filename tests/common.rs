// tests/common.rs

use std::fs;
use std::path::Path;
use std::process::Command;

// Helper function to get the binary command
#[allow(dead_code)] // Used by the CLI tests, not by the library tests.
pub fn sential_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("sential"))
}

/// Writes `content` to `relative_path` under `root`, creating parent directories.
#[allow(dead_code)]
pub fn create_file(root: &Path, relative_path: &str, content: &str) -> std::io::Result<()> {
    let file_path = root.join(relative_path);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)
}

/// Installs a stand-in tagger script that prints one `function` tag per file argument.
#[cfg(unix)]
#[allow(dead_code)]
pub fn install_fake_ctags(dir: &Path) -> std::io::Result<std::path::PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-ctags");
    fs::write(
        &script,
        "#!/bin/sh\n\
         for arg in \"$@\"; do\n\
         \x20 case \"$arg\" in\n\
         \x20   -*) ;;\n\
         \x20   *) printf '{\"_type\": \"tag\", \"name\": \"entry\", \"path\": \"%s\", \"kind\": \"function\"}\\n' \"$arg\" ;;\n\
         \x20 esac\n\
         done\n",
    )?;
    let mut permissions = fs::metadata(&script)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&script, permissions)?;
    Ok(script)
}
