use std::{fs, io, path::Path, path::PathBuf};

/// The regular files inside a directory, sorted by path so that processing
/// order (and with it, seeded output) is stable across runs.
pub fn files_in_directory(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if fs::metadata(&path)?.file_type().is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
