//! Insect image assets: default images discovered from an asset directory and
//! user-uploaded overrides. The core never interprets pixels; it only stores
//! decoded images for the presentation layer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbaImage;
use log::warn;

const IMAGE_EXTENSIONS: &[&str] = &["png", "PNG", "jpg", "JPG", "jpeg", "JPEG", "webp", "WEBP"];

/// A decoded insect image, normalized to RGBA.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub rgba: RgbaImage,
}

impl ImageAsset {
    /// Decode arbitrary uploaded bytes. Unsupported or corrupt input is an
    /// error for the caller to surface; it never aborts the session.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes).context("failed to decode image bytes")?;
        Ok(Self {
            rgba: decoded.to_rgba8(),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let decoded = image::open(path)
            .with_context(|| format!("failed to decode image at {}", path.display()))?;
        Ok(Self {
            rgba: decoded.to_rgba8(),
        })
    }
}

/// Probe the asset directory for `<basename>.<ext>` across the supported
/// extensions, first hit wins.
pub fn find_image_file(asset_dir: &Path, basename: &str) -> Option<PathBuf> {
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| asset_dir.join(format!("{basename}.{ext}")))
        .find(|p| p.exists())
}

/// Load the default image for every catalog insect that has one on disk.
/// Missing files are skipped; undecodable files are logged and skipped.
pub fn load_default_images(asset_dir: &Path) -> HashMap<String, ImageAsset> {
    let mut images = HashMap::new();
    for kind in crate::catalog::all() {
        let Some(path) = find_image_file(asset_dir, kind.id) else {
            continue;
        };
        match ImageAsset::from_path(&path) {
            Ok(asset) => {
                images.insert(kind.id.to_string(), asset);
            }
            Err(err) => warn!("skipping default image for {}: {err:#}", kind.id),
        }
    }
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::new(width, height);
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_valid_png_bytes() {
        let asset = ImageAsset::from_bytes(&png_bytes(4, 4)).unwrap();
        assert_eq!(asset.rgba.dimensions(), (4, 4));
    }

    #[test]
    fn rejects_garbage_bytes() {
        assert!(ImageAsset::from_bytes(b"not an image").is_err());
    }

    #[test]
    fn probes_extensions_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ladybug.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("ladybug.png"), b"x").unwrap();

        let found = find_image_file(dir.path(), "ladybug").unwrap();
        assert_eq!(found, dir.path().join("ladybug.png"));
    }

    #[test]
    fn load_default_images_skips_missing_and_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("firefly.png"), png_bytes(2, 2)).unwrap();
        std::fs::write(dir.path().join("stag.png"), b"corrupt").unwrap();

        let images = load_default_images(dir.path());
        assert!(images.contains_key("firefly"));
        assert!(!images.contains_key("stag"));
        assert_eq!(images.len(), 1);
    }
}
