//! Uploaded media storage.
//!
//! Files land under `<data_dir>/media` with a uuid prefix and are served
//! back at `/media/<file>`. Lookups use only the final path component, so
//! a crafted URL cannot escape the media directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Handle to the on-disk media directory.
#[derive(Debug, Clone)]
pub struct MediaStore {
    dir: PathBuf,
}

impl MediaStore {
    pub fn new(dir: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist uploaded bytes and return the public URL path.
    pub fn save(&self, name_hint: &str, bytes: &[u8]) -> io::Result<String> {
        let file_name = format!("{}-{}", uuid::Uuid::new_v4(), sanitize(name_hint));
        fs::write(self.dir.join(&file_name), bytes)?;
        Ok(format!("/media/{file_name}"))
    }

    /// Read a stored file back by its public URL path.
    pub fn open(&self, url: &str) -> io::Result<(Vec<u8>, String)> {
        let file_name = Path::new(url)
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Empty media path"))?;
        let path = self.dir.join(file_name);
        let bytes = fs::read(&path)?;
        let mime = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .to_string();
        Ok((bytes, mime))
    }
}

/// Keep the extension readable but strip anything path-like.
fn sanitize(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_open_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = MediaStore::new(tmp.path().join("media")).unwrap();

        let url = store.save("photo.jpg", b"jpegbytes").unwrap();
        assert!(url.starts_with("/media/"));
        assert!(url.ends_with("photo.jpg"));

        let (bytes, mime) = store.open(&url).unwrap();
        assert_eq!(bytes, b"jpegbytes");
        assert_eq!(mime, "image/jpeg");
    }

    #[test]
    fn open_ignores_directory_components() {
        let tmp = tempfile::tempdir().unwrap();
        let store = MediaStore::new(tmp.path().join("media")).unwrap();
        let url = store.save("a.png", b"png").unwrap();
        let file_name = url.rsplit('/').next().unwrap();

        let traversal = format!("/media/../../{file_name}");
        let (bytes, _) = store.open(&traversal).unwrap();
        assert_eq!(bytes, b"png");
    }

    #[test]
    fn sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize("../../etc/passwd"), "passwd");
        assert_eq!(sanitize("my photo (1).jpg"), "my_photo__1_.jpg");
    }
}
