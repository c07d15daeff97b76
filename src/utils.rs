use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Build `<dir>/<title>.<ext>`, keeping the title verbatim apart from path separators.
pub fn artifact_path(dir: &Path, title: &str, ext: &str) -> PathBuf {
    let name: String = title
        .chars()
        .map(|c| if c == '/' || c == '\\' || c == '\0' { '_' } else { c })
        .collect();
    dir.join(format!("{}.{}", name, ext))
}

/// Remove everything inside `dir`, leaving the directory itself in place.
pub fn clear_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        info!("Created directory '{}'", dir.display());
        return Ok(());
    }

    info!("Clearing directory '{}'", dir.display());
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        debug!("Removing {}", path.display());
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_path_keeps_colons_and_spaces() {
        let path = artifact_path(Path::new("tmp"), "Revision 5: Launch", "mp3");
        assert_eq!(path, PathBuf::from("tmp/Revision 5: Launch.mp3"));
    }

    #[test]
    fn artifact_path_replaces_separators() {
        let path = artifact_path(Path::new("out"), "CSS/JS Special", "mp4");
        assert_eq!(path, PathBuf::from("out/CSS_JS Special.mp4"));
    }

    #[test]
    fn clear_dir_empties_contents() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("tmp");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("a.mp3"), b"audio").unwrap();
        fs::write(dir.join("nested/b.png"), b"image").unwrap();

        clear_dir(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn clear_dir_creates_missing_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("out");

        clear_dir(&dir).unwrap();

        assert!(dir.is_dir());
    }
}
