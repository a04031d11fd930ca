use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};

#[derive(Debug, thiserror::Error)]
pub enum DerivativeError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

fn open_reader(path: &Path) -> Result<ImageReader<std::io::BufReader<fs::File>>, DerivativeError> {
    // Content is sniffed rather than trusted to the extension.
    ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|source| DerivativeError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Reads width and height without decoding the pixel data.
pub fn image_dimensions(path: &Path) -> Result<(u32, u32), DerivativeError> {
    open_reader(path)?
        .into_dimensions()
        .map_err(|source| DerivativeError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Renders `source` as an exact `size`x`size` square at `target`.
///
/// A thumbnail-style fit is tried first; when the source is not square that
/// leaves one side short, so the image is instead enlarged to cover the
/// square and centre-cropped. The output is always encoded from RGB so the
/// JPEG encoder accepts sources with an alpha channel.
pub fn make_derivative(source: &Path, target: &Path, size: u32) -> Result<(), DerivativeError> {
    let img = open_reader(source)?
        .decode()
        .map_err(|source_err| DerivativeError::Decode {
            path: source.to_path_buf(),
            source: source_err,
        })?;

    let mut rendered = img.thumbnail(size, size);
    if rendered.width() != size || rendered.height() != size {
        rendered = img.resize_to_fill(size, size, FilterType::Lanczos3);
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|source| DerivativeError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    DynamicImage::ImageRgb8(rendered.to_rgb8())
        .save(target)
        .map_err(|source| DerivativeError::Write {
            path: target.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        let img = RgbaImage::from_pixel(w, h, Rgba([200, 40, 40, 128]));
        img.save_with_format(&path, ImageFormat::Png).unwrap();
        path
    }

    #[test]
    fn output_is_exact_square_for_any_aspect_ratio() {
        let dir = tempfile::tempdir().unwrap();
        for (i, (w, h)) in [(300, 100), (90, 640), (500, 500), (37, 53)].into_iter().enumerate() {
            let src = write_png(dir.path(), &format!("src-{}.png", i), w, h);
            for size in [200, 400] {
                let target = dir.path().join(format!("out-{}-{}.jpg", i, size));
                make_derivative(&src, &target, size).unwrap();
                assert_eq!(image_dimensions(&target).unwrap(), (size, size), "source {}x{}", w, h);
            }
        }
    }

    #[test]
    fn missing_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_png(dir.path(), "src.png", 120, 80);
        let target = dir.path().join("a/b/c/thumb.jpg");
        make_derivative(&src, &target, 200).unwrap();
        assert!(target.exists());
    }

    #[test]
    fn extension_does_not_decide_the_decoder() {
        let dir = tempfile::tempdir().unwrap();
        let png = write_png(dir.path(), "src.png", 64, 64);
        let misnamed = dir.path().join("photo-original.jpg");
        fs::rename(&png, &misnamed).unwrap();
        assert_eq!(image_dimensions(&misnamed).unwrap(), (64, 64));
    }

    #[test]
    fn unreadable_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.jpg");
        fs::write(&bogus, b"definitely not an image").unwrap();
        let err = make_derivative(&bogus, &dir.path().join("out.jpg"), 200).unwrap_err();
        assert!(matches!(err, DerivativeError::Decode { .. }));

        let missing = make_derivative(&dir.path().join("nope.png"), &dir.path().join("out.jpg"), 200);
        assert!(matches!(missing, Err(DerivativeError::Open { .. })));
    }
}
