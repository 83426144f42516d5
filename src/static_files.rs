use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Serves files from a directory. URL paths are mapped component by component, so `..`,
/// absolute paths and drive prefixes never escape the root.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    base_dir: PathBuf,
}

impl StaticFiles {
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self {
            base_dir: base.into(),
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn map_path(&self, url_path: &str) -> Option<PathBuf> {
        let mut pb = self.base_dir.clone();
        for comp in Path::new(url_path.trim_start_matches('/')).components() {
            match comp {
                Component::Normal(s) => {
                    // Backslashes are separators on Windows; reject them everywhere.
                    if s.to_string_lossy().contains('\\') {
                        return None;
                    }
                    pb.push(s);
                }
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(pb)
    }

    /// Best-effort content type from the file extension.
    #[must_use]
    pub fn content_type(path: &Path) -> &'static str {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase()
            .as_str()
        {
            "html" | "htm" => "text/html",
            "css" => "text/css",
            "js" | "mjs" => "application/javascript",
            "json" => "application/json",
            "txt" => "text/plain",
            "svg" => "image/svg+xml",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "ico" => "image/x-icon",
            "wasm" => "application/wasm",
            _ => "application/octet-stream",
        }
    }

    /// Read the file at `url_path` (relative to the root).
    ///
    /// # Errors
    ///
    /// `NotFound` for traversal attempts, missing files and directories; other I/O errors
    /// are passed through.
    pub fn load(&self, url_path: &str) -> io::Result<(Vec<u8>, &'static str)> {
        let path = self
            .map_path(url_path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "invalid path"))?;
        if !path.is_file() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        }
        let bytes = fs::read(&path)?;
        Ok((bytes, Self::content_type(&path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_path_prevents_traversal() {
        let sf = StaticFiles::new("static");
        assert!(sf.map_path("../Cargo.toml").is_none());
        assert!(sf.map_path("css/../../Cargo.toml").is_none());
        assert!(sf.map_path("..\\..\\Cargo.toml").is_none());
    }

    #[test]
    fn test_map_path_strips_leading_slash() {
        let sf = StaticFiles::new("static");
        assert_eq!(
            sf.map_path("/css/./main.css"),
            Some(PathBuf::from("static/css/main.css"))
        );
    }

    #[test]
    fn test_content_type() {
        assert_eq!(StaticFiles::content_type(Path::new("a/main.css")), "text/css");
        assert_eq!(StaticFiles::content_type(Path::new("INDEX.HTML")), "text/html");
        assert_eq!(
            StaticFiles::content_type(Path::new("blob")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_load_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.txt"), "Hello\n").unwrap();
        let sf = StaticFiles::new(dir.path());
        let (bytes, ct) = sf.load("hello.txt").unwrap();
        assert_eq!(ct, "text/plain");
        assert_eq!(String::from_utf8(bytes).unwrap(), "Hello\n");
    }

    #[test]
    fn test_directory_is_not_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("css")).unwrap();
        let sf = StaticFiles::new(dir.path());
        let err = sf.load("css").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
