use image::DynamicImage;

/// Fixed-length feature vector summarizing one frame.
pub type Embedding = Vec<f32>;

/// Pretrained backbone used as an opaque frame -> embedding function.
pub trait FeatureExtractor {
    fn embedding_size(&self) -> usize;
    fn extract(&self, frame: &DynamicImage) -> Result<Embedding, Box<dyn std::error::Error + Send + Sync>>;
}
