use std::path::Path;
use std::process;
use tracing::{debug, warn};

/// Runs `rustfmt` over a freshly written file. Formatting is cosmetic, so a
/// missing or failing `rustfmt` only produces a warning.
pub fn format_file(path: &Path) {
    let output = process::Command::new("rustfmt")
        .arg("--edition")
        .arg("2021")
        .arg(path)
        .output();

    match output {
        Ok(output) if output.status.success() => debug!(path = %path.display(), "formatted"),
        Ok(output) => warn!(
            path = %path.display(),
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "rustfmt rejected generated file"
        ),
        Err(err) => warn!(path = %path.display(), error = %err, "cannot run rustfmt"),
    }
}
