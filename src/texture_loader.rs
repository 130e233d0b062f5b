use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use exif::{In, Reader, Tag};
use raylib::prelude::*;
use tracing::{debug, warn};

use crate::constants::DECODABLE_EXTENSIONS;

/// Whether `load_texture_with_exif_rotation` can decode this file type.
pub fn is_decodable(image_path: &Path) -> bool {
    image_path
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| DECODABLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

// --- Load Image, Apply EXIF Orientation, Create Texture ---
pub fn load_texture_with_exif_rotation(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    image_path: &Path,
) -> Result<Texture2D> {
    let file_bytes = fs::read(image_path)
        .with_context(|| format!("failed to read {:?}", image_path))?;

    let extension = image_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    // EXIF is only read reliably from JPEG containers
    let orientation = if extension == "jpg" || extension == "jpeg" {
        read_orientation(&file_bytes, image_path)
    } else {
        1
    };

    let mut image = Image::load_image_from_mem(&format!(".{}", extension), &file_bytes)
        .map_err(|e| anyhow!("failed to decode {:?}: {}", image_path, e))?;

    apply_orientation(&mut image, orientation);
    if orientation != 1 {
        debug!("applied EXIF orientation {} to {:?}", orientation, image_path);
    }

    let texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| anyhow!("failed to create texture for {:?}: {}", image_path, e))?;

    Ok(texture)
}

/// EXIF orientation tag (1..=8), or 1 when there is none.
pub fn read_orientation(file_bytes: &[u8], image_path: &Path) -> u32 {
    match Reader::new().read_from_container(&mut Cursor::new(file_bytes)) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .filter(|o| (1..=8).contains(o))
            .unwrap_or(1),
        Err(e) => {
            warn!("no EXIF data for {:?}: {}", image_path, e);
            1
        }
    }
}

// 1 = normal, 2 = mirrored, 3 = 180, 4 = flipped,
// 5 = transposed, 6 = 90 CW, 7 = transversed, 8 = 90 CCW
fn apply_orientation(image: &mut Image, orientation: u32) {
    match orientation {
        2 => image.flip_horizontal(),
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        4 => image.flip_vertical(),
        5 => {
            image.rotate_cw();
            image.flip_horizontal();
        }
        6 => image.rotate_cw(),
        7 => {
            image.rotate_cw();
            image.flip_vertical();
        }
        8 => image.rotate_ccw(),
        _ => {}
    }
}
