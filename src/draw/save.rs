use crate::draw::composite::flatten_over_background;
use crate::draw::model::Color;
use crate::draw::surface::Surface;
use anyhow::{anyhow, Context, Result};
use image::{ImageOutputFormat, RgbaImage};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXPORT_FILE_NAME: &str = "drawing.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub background: Color,
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

/// An encoded PNG ready to hand to a download or write to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("create export folder {}", dir.display()))?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)
            .with_context(|| format!("write exported image {}", path.display()))?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "drawing exported");
        Ok(path)
    }
}

/// The surface composited over `background`, as an image buffer.
pub fn flatten(surface: &Surface, background: Color) -> Result<RgbaImage> {
    let rgba = flatten_over_background(surface.pixels(), background);
    RgbaImage::from_raw(surface.width(), surface.height(), rgba).ok_or_else(|| {
        anyhow!(
            "surface buffer does not match {}x{}",
            surface.width(),
            surface.height()
        )
    })
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageOutputFormat::Png)
        .context("encode png")?;
    Ok(cursor.into_inner())
}

pub fn export_surface(surface: &Surface, config: &ExportConfig) -> Result<ExportArtifact> {
    let flattened = flatten(surface, config.background)?;
    let bytes = encode_png(&flattened)?;
    Ok(ExportArtifact {
        file_name: config.file_name.clone(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::surface::PixelRect;

    #[test]
    fn export_is_opaque_over_configured_background() {
        let mut surface = Surface::new(4, 2);
        surface.fill_region(PixelRect::new(0, 0, 1, 1), Color::rgb(0, 255, 0));
        let config = ExportConfig {
            background: Color::rgb(10, 20, 30),
            ..ExportConfig::default()
        };

        let artifact = export_surface(&surface, &config).expect("export");
        assert_eq!(artifact.file_name, DEFAULT_EXPORT_FILE_NAME);

        let decoded = image::load_from_memory(&artifact.bytes)
            .expect("decode png")
            .to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(decoded.get_pixel(3, 1).0, [10, 20, 30, 255]);
        assert!(decoded.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn artifact_is_written_under_its_file_name() {
        let dir = tempfile::tempdir().expect("temp dir");
        let surface = Surface::new(2, 2);
        let artifact = export_surface(&surface, &ExportConfig::default()).expect("export");
        let path = artifact
            .write_to_dir(&dir.path().join("exports"))
            .expect("write");
        assert!(path.ends_with("exports/drawing.png"));
        assert_eq!(std::fs::read(&path).expect("read back"), artifact.bytes);
    }
}
