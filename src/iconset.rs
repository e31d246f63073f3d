//! Iconset generation: one source image → the fixed desktop icon set.
//!
//! The packaging step consumes exactly these sizes, so the set is a constant
//! rather than configuration. Lanczos3 is the resampling filter worth using
//! for icons: box/triangle filters visibly blur the small sizes.

use crate::config::IconsetConfig;
use crate::error::ReleasePrepError;
use image::imageops::FilterType;
use std::path::PathBuf;
use tracing::{debug, info};

/// Edge lengths (px) of the emitted square icons.
pub const ICON_SIZES: [u32; 8] = [16, 24, 32, 48, 64, 128, 256, 512];

/// Generate the icon set from `config.source` into `config.out_dir`.
///
/// Emits one `icon_{N}x{N}.png` per entry of [`ICON_SIZES`], overwriting any
/// previous set. A source smaller than the largest target is upscaled — the
/// packaging step needs the complete set either way. Returns the written
/// paths in size order.
pub fn generate_iconset(config: &IconsetConfig) -> Result<Vec<PathBuf>, ReleasePrepError> {
    let source =
        image::open(&config.source).map_err(|e| ReleasePrepError::SourceImageDecode {
            path: config.source.clone(),
            source: e,
        })?;
    let source = source.to_rgba8();
    info!(
        "Loaded {} ({}x{})",
        config.source.display(),
        source.width(),
        source.height()
    );

    std::fs::create_dir_all(&config.out_dir).map_err(|e| ReleasePrepError::AssetsDirCreate {
        path: config.out_dir.clone(),
        source: e,
    })?;

    let mut written = Vec::with_capacity(ICON_SIZES.len());
    for &size in &ICON_SIZES {
        let resized = image::imageops::resize(&source, size, size, FilterType::Lanczos3);
        let path = config.out_dir.join(format!("icon_{size}x{size}.png"));
        resized.save(&path).map_err(|e| ReleasePrepError::IconWrite {
            path: path.clone(),
            source: e,
        })?;
        debug!("wrote {}", path.display());
        written.push(path);
    }

    info!(
        "Iconset written to {} ({} sizes)",
        config.out_dir.display(),
        written.len()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_source(dir: &std::path::Path, edge: u32) -> PathBuf {
        let path = dir.join("source.png");
        RgbaImage::from_pixel(edge, edge, Rgba([10, 120, 200, 255]))
            .save(&path)
            .expect("write source image");
        path
    }

    #[test]
    fn generates_the_full_fixed_set() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write_source(dir.path(), 512);
        let out_dir = dir.path().join("icons");

        let written =
            generate_iconset(&IconsetConfig::new(&source, &out_dir)).expect("generate");

        assert_eq!(written.len(), ICON_SIZES.len());
        for (&size, path) in ICON_SIZES.iter().zip(&written) {
            assert_eq!(
                path.file_name().unwrap().to_string_lossy(),
                format!("icon_{size}x{size}.png")
            );
            let img = image::open(path).expect("decodable icon");
            assert_eq!(img.width(), size);
            assert_eq!(img.height(), size);
        }
    }

    #[test]
    fn small_sources_are_upscaled() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write_source(dir.path(), 64);
        let out_dir = dir.path().join("icons");

        generate_iconset(&IconsetConfig::new(&source, &out_dir)).expect("generate");

        let largest = image::open(out_dir.join("icon_512x512.png")).expect("decodable");
        assert_eq!(largest.width(), 512);
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = generate_iconset(&IconsetConfig::new(
            dir.path().join("nope.png"),
            dir.path().join("icons"),
        ));
        assert!(matches!(
            result,
            Err(ReleasePrepError::SourceImageDecode { .. })
        ));
    }
}
