use image::{imageops, DynamicImage, Rgb, RgbImage};
use tract_onnx::prelude::*;

// ImageNet normalization constants
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Scales to fit inside `width x height` and pads the rest with black.
pub fn letterbox(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if image.width() * height == image.height() * width {
        return image.resize_exact(width, height, imageops::FilterType::Triangle);
    }

    let (w, h) = (image.width() as f32, image.height() as f32);
    let scale = (width as f32 / w).min(height as f32 / h);
    let new_w = ((w * scale) as u32).clamp(1, width);
    let new_h = ((h * scale) as u32).clamp(1, height);

    let scaled = image
        .resize_exact(new_w, new_h, imageops::FilterType::Triangle)
        .to_rgb8();
    let mut padded = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));
    let x_offset = (width - new_w) / 2;
    let y_offset = (height - new_h) / 2;
    imageops::replace(&mut padded, &scaled, x_offset as i64, y_offset as i64);

    DynamicImage::ImageRgb8(padded)
}

/// NCHW float tensor, ImageNet-normalized.
pub fn image_to_tensor(image: &DynamicImage) -> Tensor {
    let rgb = image.to_rgb8();
    let (w, h) = (rgb.width() as usize, rgb.height() as usize);
    tract_ndarray::Array4::from_shape_fn((1, 3, h, w), |(_, c, y, x)| {
        let pixel = rgb.get_pixel(x as u32, y as u32);
        (pixel[c] as f32 / 255.0 - MEAN[c]) / STD[c]
    })
    .into_tensor()
}

pub fn letterbox_to_tensor(image: &DynamicImage, width: u32, height: u32) -> Tensor {
    image_to_tensor(&letterbox(image, width, height))
}

/// Reduces a backbone output to a flat embedding.
///
/// `[1, C, H, W]` feature maps are averaged over the spatial axes; `[1, C]`
/// (and `[C]`) outputs are already pooled.
pub fn pool_embedding(
    shape: &[usize],
    data: &[f32],
) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
    match shape {
        [1, c, h, w] => {
            let area = h * w;
            if area == 0 {
                return Err("Backbone output has empty spatial dims".into());
            }
            Ok((0..*c)
                .map(|ch| data[ch * area..(ch + 1) * area].iter().sum::<f32>() / area as f32)
                .collect())
        }
        [1, c] | [c] => Ok(data[..*c].to_vec()),
        [1, c, 1] => Ok(data[..*c].to_vec()),
        other => Err(format!("Unsupported backbone output shape {:?}", other).into()),
    }
}
