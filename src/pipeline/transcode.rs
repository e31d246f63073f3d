//! Transcoding and the content-addressed asset cache.
//!
//! Fetched bytes are decoded, re-encoded as JPEG at a fixed quality, and
//! persisted under a filename derived from the MD5 of the *encoded* bytes.
//! Hashing the output rather than the input means two sources that re-encode
//! to identical bytes collide to one cached file, and a cached file never
//! needs rewriting: if the name exists, the content is already right.
//!
//! The existence-check-then-write is a single best-effort attempt, no
//! locking. Two concurrent runs racing on a new filename both write identical
//! bytes, so the race cannot corrupt the cache.

use md5::{Digest, Md5};
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Extension of every cached asset. The cache re-encodes everything it
/// stores, so the extension is a property of the cache, not of the source.
pub const TARGET_EXTENSION: &str = "jpg";

/// Decode `bytes` as an image and re-encode as JPEG at `quality`.
///
/// Alpha is flattened by conversion to RGB before encoding; JPEG has no
/// alpha channel. Errors cover both undecodable input (corrupt download,
/// HTML error page saved as `.png`) and encoder failures.
pub fn transcode_to_jpeg(bytes: &[u8], quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let rgb = image::load_from_memory(bytes)?.to_rgb8();
    let mut buf = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
    rgb.write_with_encoder(encoder)?;
    Ok(buf)
}

/// Content-addressed filename for `encoded` bytes: lowercase-hex MD5 plus
/// [`TARGET_EXTENSION`].
pub fn asset_filename(encoded: &[u8]) -> String {
    let digest = Md5::digest(encoded);
    format!("{}.{}", hex::encode(digest), TARGET_EXTENSION)
}

/// Store `encoded` in `assets_dir` under its content-addressed name.
///
/// Returns the file path and whether the file was newly written. An existing
/// file is never touched. A write error is re-checked against existence so a
/// concurrent writer finishing first counts as a cache hit rather than a
/// failure.
pub fn store_asset(assets_dir: &Path, encoded: &[u8]) -> io::Result<(PathBuf, bool)> {
    let path = assets_dir.join(asset_filename(encoded));

    if path.exists() {
        debug!("cache hit: {}", path.display());
        return Ok((path, false));
    }

    match std::fs::write(&path, encoded) {
        Ok(()) => {
            debug!("cached {} ({} bytes)", path.display(), encoded.len());
            Ok((path, true))
        }
        Err(_) if path.exists() => Ok((path, false)),
        Err(e) => Err(e),
    }
}

/// Render `asset_path` relative to `document_dir` as a markdown-ready
/// reference: forward slashes on every host, `./`-prefixed unless it already
/// reads as a relative or absolute reference.
pub fn relative_reference(asset_path: &Path, document_dir: &Path) -> String {
    let rel = relative_to(asset_path, document_dir);

    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    if joined.starts_with("./") || joined.starts_with("../") || joined.starts_with('/') {
        joined
    } else {
        format!("./{joined}")
    }
}

/// Compute `path` relative to `base` by walking the shared component prefix.
///
/// Both paths are interpreted against the same working directory; `.`
/// components are ignored on both sides.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path_parts: Vec<Component<'_>> = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let base_parts: Vec<Component<'_>> = base
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base_parts.len() {
        rel.push("..");
    }
    for part in &path_parts[common..] {
        rel.push(part.as_os_str());
    }
    rel
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn sample_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(8, 8, Rgba([200, 40, 40, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .expect("png encode");
        buf
    }

    #[test]
    fn transcode_produces_decodable_jpeg() {
        let encoded = transcode_to_jpeg(&sample_png(), 80).expect("transcode");
        let back = image::load_from_memory(&encoded).expect("decodable");
        assert_eq!(back.width(), 8);
        assert_eq!(back.height(), 8);
    }

    #[test]
    fn transcode_rejects_garbage() {
        assert!(transcode_to_jpeg(b"<html>not found</html>", 80).is_err());
    }

    #[test]
    fn filename_is_32_hex_chars_plus_extension() {
        let name = asset_filename(b"some encoded bytes");
        let (stem, ext) = name.split_once('.').expect("has extension");
        assert_eq!(ext, TARGET_EXTENSION);
        assert_eq!(stem.len(), 32);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn filename_is_deterministic() {
        assert_eq!(asset_filename(b"abc"), asset_filename(b"abc"));
        assert_ne!(asset_filename(b"abc"), asset_filename(b"abd"));
    }

    #[test]
    fn store_is_write_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (path, written) = store_asset(dir.path(), b"payload").expect("store");
        assert!(written);
        assert!(path.exists());

        let (path2, written2) = store_asset(dir.path(), b"payload").expect("store again");
        assert_eq!(path, path2);
        assert!(!written2, "second store of identical bytes must be a cache hit");

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn relative_reference_from_repo_root() {
        let asset = Path::new("docs/changelog-assets/abc.jpg");
        let rel = relative_reference(asset, Path::new(""));
        assert_eq!(rel, "./docs/changelog-assets/abc.jpg");
    }

    #[test]
    fn relative_reference_from_dot_base() {
        let asset = Path::new("./docs/changelog-assets/abc.jpg");
        let rel = relative_reference(asset, Path::new("."));
        assert_eq!(rel, "./docs/changelog-assets/abc.jpg");
    }

    #[test]
    fn relative_reference_walks_up() {
        let asset = Path::new("assets/abc.jpg");
        let rel = relative_reference(asset, Path::new("docs"));
        assert_eq!(rel, "../assets/abc.jpg");
    }

    #[test]
    fn relative_reference_same_directory() {
        let asset = Path::new("docs/abc.jpg");
        let rel = relative_reference(asset, Path::new("docs"));
        assert_eq!(rel, "./abc.jpg");
    }

    #[test]
    fn relative_reference_uses_forward_slashes() {
        let asset = Path::new("docs").join("changelog-assets").join("abc.jpg");
        let rel = relative_reference(&asset, Path::new(""));
        assert!(!rel.contains('\\'));
        assert!(rel.contains('/'));
    }
}
