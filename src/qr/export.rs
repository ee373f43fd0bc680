use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use super::Surface;
use crate::error::{Error, Result};

/// Name a download gets unless configured otherwise
pub const DEFAULT_FILE_NAME: &str = "qrcode.png";

/// Encode the surface's raster as PNG bytes
pub fn encode_png(surface: &Surface) -> Result<Vec<u8>> {
    let image = surface.image();
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(bytes)
}

/// The `n`th name tried for `file_name` in `dir`, numbering duplicates the
/// way browsers do: `qrcode.png`, `qrcode (1).png`, `qrcode (2).png`, ...
pub fn candidate_path(dir: &Path, file_name: &str, n: u32) -> PathBuf {
    if n == 0 {
        return dir.join(file_name);
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string());
    match name.extension() {
        Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext.to_string_lossy())),
        None => dir.join(format!("{} ({})", stem, n)),
    }
}

/// Write the surface as a PNG into `dir`, returning where it landed.
/// Existing files are never touched; the first name that can be created
/// fresh wins.
pub async fn save(surface: &Surface, dir: &Path, file_name: &str) -> Result<PathBuf> {
    let bytes = encode_png(surface)?;

    tokio::fs::create_dir_all(dir).await.map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for n in 0u32.. {
        let path = candidate_path(dir, file_name, n);
        let opened = OpenOptions::new().write(true).create_new(true).open(&path).await;
        let mut file = match opened {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(source) => return Err(Error::Io { path, source }),
        };

        let written = match file.write_all(&bytes).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        written.map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!("Saved {} ({} bytes)", path.display(), bytes.len());
        return Ok(path);
    }

    Err(Error::Io {
        path: dir.join(file_name),
        source: std::io::Error::new(ErrorKind::AlreadyExists, "no free file name left"),
    })
}

/// Write PNG bytes to an exact path, overwriting whatever is there
pub async fn write_to(path: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(path, bytes).await.map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{Color, FormState};
    use crate::qr::{render, RenderOptions};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("qrsmith-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn surface(size: u32) -> Surface {
        let form = FormState {
            text: "https://example.com".to_string(),
            fg_color: Color::from_hex("#112233").unwrap(),
            bg_color: Color::WHITE,
            size,
        };
        render(&form, &RenderOptions::default()).unwrap().unwrap()
    }

    #[test]
    fn test_png_decodes_to_same_raster() {
        let surface = surface(250);
        let bytes = encode_png(&surface).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (250, 250));
        assert_eq!(decoded.as_raw(), surface.image().as_raw());
    }

    #[test]
    fn test_candidate_names_number_duplicates() {
        let dir = PathBuf::from("/downloads");
        assert_eq!(candidate_path(&dir, "qrcode.png", 0), dir.join("qrcode.png"));
        assert_eq!(candidate_path(&dir, "qrcode.png", 1), dir.join("qrcode (1).png"));
        assert_eq!(candidate_path(&dir, "qrcode.png", 2), dir.join("qrcode (2).png"));
        assert_eq!(candidate_path(&dir, "code", 1), dir.join("code (1)"));
        assert_eq!(candidate_path(&dir, "my.code.png", 3), dir.join("my.code (3).png"));
    }

    #[tokio::test]
    async fn test_save_skips_files_that_already_exist() {
        let dir = scratch_dir("existing");
        std::fs::write(dir.join("qrcode.png"), b"first").unwrap();
        std::fs::write(dir.join("qrcode (1).png"), b"second").unwrap();

        let path = save(&surface(100), &dir, DEFAULT_FILE_NAME).await.unwrap();

        assert_eq!(path, dir.join("qrcode (2).png"));
        assert_eq!(std::fs::read(dir.join("qrcode.png")).unwrap(), b"first");
        assert_eq!(std::fs::read(dir.join("qrcode (1).png")).unwrap(), b"second");
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (100, 100));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_save_writes_png_and_never_overwrites() {
        let dir = scratch_dir("save").join("nested");

        let first = save(&surface(100), &dir, DEFAULT_FILE_NAME).await.unwrap();
        let second = save(&surface(120), &dir, DEFAULT_FILE_NAME).await.unwrap();

        assert_eq!(first, dir.join("qrcode.png"));
        assert_eq!(second, dir.join("qrcode (1).png"));

        let img = image::open(&first).unwrap();
        assert_eq!((img.width(), img.height()), (100, 100));
        let img = image::open(&second).unwrap();
        assert_eq!((img.width(), img.height()), (120, 120));

        let _ = std::fs::remove_dir_all(dir.parent().unwrap());
    }
}
