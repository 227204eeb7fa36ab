use crate::error::{OcrLinkError, Result};
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};

/// Prepare image bytes for OCR.
///
/// Applies, in order:
/// 1. Downscale so neither side exceeds `max_dimension` (aspect ratio kept)
/// 2. Grayscale conversion, which also drops any alpha channel
/// 3. Histogram stretch for contrast
///
/// Returns the result encoded as PNG.
pub fn preprocess_image(bytes: &[u8], max_dimension: u32) -> Result<Vec<u8>> {
    let img = ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| OcrLinkError::Recognition(format!("Failed to read image: {e}")))?
        .decode()
        .map_err(|e| OcrLinkError::Recognition(format!("Failed to decode image: {e}")))?;

    let img = resize_if_needed(img, max_dimension);
    let gray = enhance_contrast(img.to_luma8());

    let mut output = Vec::new();
    DynamicImage::ImageLuma8(gray)
        .write_to(&mut std::io::Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| OcrLinkError::Recognition(format!("Failed to encode image: {e}")))?;

    Ok(output)
}

/// Uses Lanczos3 for downscaling
fn resize_if_needed(img: DynamicImage, max_dim: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= max_dim && height <= max_dim {
        return img;
    }

    let ratio = max_dim as f32 / width.max(height) as f32;
    let new_width = ((width as f32 * ratio) as u32).max(1);
    let new_height = ((height as f32 * ratio) as u32).max(1);

    img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
}

/// Maps the darkest pixel to 0 and the lightest to 255.
fn enhance_contrast(gray: image::GrayImage) -> image::GrayImage {
    let (min_val, max_val) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));

    // flat image
    if max_val <= min_val {
        return gray;
    }

    let range = (max_val - min_val) as f32;
    image::GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let value = gray.get_pixel(x, y)[0];
        let normalized = (value - min_val) as f32 / range;
        image::Luma([(normalized * 255.0) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut output = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut output), format)
            .unwrap();
        output
    }

    fn decode(bytes: &[u8]) -> DynamicImage {
        image::load_from_memory(bytes).unwrap()
    }

    #[test]
    fn test_preprocess_outputs_grayscale_png() {
        let input = encode(DynamicImage::new_rgba8(120, 80), ImageFormat::Png);

        let processed = preprocess_image(&input, 4096).unwrap();

        assert_eq!(image::guess_format(&processed).unwrap(), ImageFormat::Png);
        let img = decode(&processed);
        assert_eq!(img.dimensions(), (120, 80));
        assert!(matches!(img, DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn test_preprocess_accepts_jpeg() {
        let input = encode(DynamicImage::new_rgb8(64, 64), ImageFormat::Jpeg);
        assert!(preprocess_image(&input, 4096).is_ok());
    }

    #[test]
    fn test_preprocess_downscales_keeping_aspect_ratio() {
        let input = encode(DynamicImage::new_rgb8(1000, 200), ImageFormat::Png);

        let processed = preprocess_image(&input, 500).unwrap();

        assert_eq!(decode(&processed).dimensions(), (500, 100));
    }

    #[test]
    fn test_preprocess_rejects_garbage() {
        let result = preprocess_image(&[0u8, 1, 2, 3, 4, 5], 4096);
        assert!(matches!(result, Err(OcrLinkError::Recognition(_))));
    }

    #[test]
    fn test_contrast_stretch_spans_full_range() {
        let gray = image::GrayImage::from_fn(4, 1, |x, _| image::Luma([100 + x as u8 * 10]));

        let stretched = enhance_contrast(gray);

        assert_eq!(stretched.get_pixel(0, 0)[0], 0);
        assert_eq!(stretched.get_pixel(3, 0)[0], 255);
    }

    #[test]
    fn test_contrast_leaves_flat_image_alone() {
        let gray = image::GrayImage::from_pixel(3, 3, image::Luma([42]));
        let stretched = enhance_contrast(gray.clone());
        assert_eq!(stretched, gray);
    }
}
