use std::io;
use std::path::Path;

/// Reads every regular file of `dir`, ordered by file name.
pub(crate) fn read_all_files(dir: &Path) -> io::Result<Vec<Vec<u8>>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    paths.iter().map(std::fs::read).collect()
}

/// Reads the first file of `dir`, ordered by file name.
pub(crate) fn read_first_file(dir: &Path) -> io::Result<String> {
    let Some(first) = read_all_files(dir)?.into_iter().next() else {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is empty", dir.display()),
        ));
    };
    String::from_utf8(first).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub(crate) fn read_pem(path: &Path) -> io::Result<String> {
    let data = std::fs::read(path)?;
    String::from_utf8(data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
