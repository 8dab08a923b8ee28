use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Fresh directory under the system temp dir, unique per test.
pub fn test_dir(label: &str) -> io::Result<PathBuf> {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join("plynk-tests").join(format!(
        "{}-{}-{}",
        std::process::id(),
        id,
        label
    ));
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Writes an executable shell script standing in for a plink binary.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> io::Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}"))?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

/// A fake plink2 that reports a 2.0 version and echoes its arguments.
#[cfg(unix)]
pub fn fake_plink2(dir: &Path) -> io::Result<PathBuf> {
    write_script(
        dir,
        "plink2",
        concat!(
            "if [ \"$1\" = \"--version\" ]; then\n",
            "  echo \"PLINK v2.0.0-a.6.9LM 64-bit (2 Oct 2024)\"\n",
            "  exit 0\n",
            "fi\n",
            "echo \"args: $@\"\n",
        ),
    )
}

/// A fake plink2 that passes the version probe but fails every real run
/// with a fixed diagnostic on stderr.
#[cfg(unix)]
pub fn failing_plink2(dir: &Path) -> io::Result<PathBuf> {
    write_script(
        dir,
        "plink2",
        concat!(
            "if [ \"$1\" = \"--version\" ]; then\n",
            "  echo \"PLINK v2.0.0-a.6.9LM 64-bit (2 Oct 2024)\"\n",
            "  exit 0\n",
            "fi\n",
            "printf 'ERROR: bad flag' >&2\n",
            "exit 1\n",
        ),
    )
}
