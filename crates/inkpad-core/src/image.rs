//! Image intake: deciding what pasted, dropped or picked content becomes an
//! image, and reading image files into `data:` URLs.
//!
//! ## Learning: Async File Reads
//!
//! Each file is read by its own future. The UI spawns one task per file and
//! inserts each image as its task finishes, so a large file never holds up
//! a small one and the event loop never blocks on disk.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Result type for image operations
pub type ImageResult<T> = Result<T, ImageError>;

/// Why a file could not be turned into an image.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("{0} is not an image")]
    NotAnImage(PathBuf),

    #[error("{path} is {size} bytes, over the {limit} byte limit")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// File extensions recognised as images.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "3dv", "ai", "amf", "art", "ase", "awg", "blp", "bmp", "bw", "cd5", "cdr", "cgm", "cit",
    "cmx", "cpt", "cr2", "cur", "cut", "dds", "dib", "djvu", "dxf", "e2d", "ecw", "egt", "emf",
    "eps", "exif", "fs", "gbr", "gif", "gpl", "grf", "hdp", "heic", "heif", "icns", "ico",
    "iff", "int", "inta", "jfif", "jng", "jp2", "jpeg", "jpg", "jps", "jxr", "lbm", "liff",
    "max", "miff", "mng", "msp", "nef", "nitf", "nrrd", "odg", "ota", "pam", "pbm", "pc1",
    "pc2", "pc3", "pcf", "pct", "pcx", "pdd", "pdn", "pgf", "pgm", "pi1", "pi2", "pi3", "pict",
    "png", "pnm", "pns", "ppm", "psb", "psd", "psp", "px", "pxm", "pxr", "qfx", "ras", "raw",
    "rgb", "rgba", "rle", "sct", "sgi", "sid", "stl", "sun", "svg", "sxd", "tga", "tif",
    "tiff", "v2d", "vnd", "vrml", "vtf", "wdp", "webp", "wmf", "x3d", "xar", "xbm", "xcf",
    "xpm",
];

/// Returns true if `text` is an absolute URL whose path ends in `.ext` for
/// one of `extensions`, ignoring case.
///
/// Only the path is tested, so `…/cat.png?size=2` counts while `…/heart`
/// does not, even though it ends in "art".
pub fn is_image_url(text: &str, extensions: &[String]) -> bool {
    let Ok(url) = url::Url::parse(text.trim()) else {
        return false;
    };
    let path = url.path().to_ascii_lowercase();
    extensions
        .iter()
        .any(|ext| path.ends_with(&format!(".{}", ext.to_ascii_lowercase())))
}

/// Guesses a media type from a file's extension.
pub fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" | "dib" => "image/bmp",
        "svg" => "image/svg+xml",
        "ico" | "cur" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "txt" | "md" => "text/plain",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(media_type)
}

/// Returns true for `image/*` media types.
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// Content offered by a paste or a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    Files(Vec<PathBuf>),
    Text(String),
}

/// What to do with a [`Transfer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intake {
    /// Read these image files and insert each one
    ReadFiles(Vec<PathBuf>),
    /// Insert an image pointing at this URL
    InsertUrl(String),
    /// Not an image; handle as ordinary content
    PassThrough(Transfer),
}

/// Decides how a transfer is handled. Non-image files are dropped from the
/// list; if none remain the result is an empty `ReadFiles`.
pub fn classify(transfer: Transfer, extensions: &[String]) -> Intake {
    match transfer {
        Transfer::Files(files) => Intake::ReadFiles(
            files
                .into_iter()
                .filter(|path| {
                    let keep = media_type_for(path).is_some_and(is_image_media_type);
                    if !keep {
                        tracing::debug!("Skipping non-image file {}", path.display());
                    }
                    keep
                })
                .collect(),
        ),
        Transfer::Text(text) if is_image_url(&text, extensions) => {
            Intake::InsertUrl(text.trim().to_string())
        }
        other => Intake::PassThrough(other),
    }
}

/// Builds a `data:` URL from raw bytes.
pub fn data_url(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

/// Reads an image file into a `data:` URL.
pub async fn read_data_url(path: PathBuf, max_bytes: u64) -> ImageResult<String> {
    let media_type = media_type_for(&path)
        .filter(|media_type| is_image_media_type(media_type))
        .ok_or_else(|| ImageError::NotAnImage(path.clone()))?;

    let metadata = tokio::fs::metadata(&path).await.map_err(|source| ImageError::Read {
        path: path.clone(),
        source,
    })?;
    if metadata.len() > max_bytes {
        return Err(ImageError::TooLarge {
            path,
            size: metadata.len(),
            limit: max_bytes,
        });
    }

    let bytes = tokio::fs::read(&path).await.map_err(|source| ImageError::Read {
        path: path.clone(),
        source,
    })?;
    tracing::debug!("Read {} ({} bytes)", path.display(), bytes.len());
    Ok(data_url(media_type, &bytes))
}

/// Splits a `data:` URL into its media type and decoded bytes.
pub fn decode_data_url(src: &str) -> Option<(&str, Vec<u8>)> {
    let rest = src.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let media_type = header.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload).ok()?;
    Some((media_type, bytes))
}
