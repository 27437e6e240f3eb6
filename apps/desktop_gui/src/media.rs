//! Image decoding for profile avatars.

/// Avatars are shown at most this many pixels wide or tall.
pub const AVATAR_MAX_DIMENSION: u32 = 256;

#[derive(Clone)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

pub fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = dynamic
        .thumbnail(AVATAR_MAX_DIMENSION, AVATAR_MAX_DIMENSION)
        .to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PreviewImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}
