use crate::feature_extractor::interface::{Embedding, FeatureExtractor};
use crate::library::logger::interface::Logger;
use image::{imageops, DynamicImage};
use std::sync::Arc;

const GRID: u32 = 4;

/// Deterministic stand-in for a pretrained backbone.
///
/// Averages each channel over a 4x4 grid of cells and tiles those 48 values
/// up to the requested width, so identical frames give identical embeddings
/// and differently coloured frames are separable.
pub struct FeatureExtractorFake {
    logger: Arc<dyn Logger + Send + Sync>,
    embedding_size: usize,
}

impl FeatureExtractorFake {
    pub fn new(embedding_size: usize, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("feature_extractor").with_namespace("fake"),
            embedding_size,
        }
    }
}

impl FeatureExtractor for FeatureExtractorFake {
    fn embedding_size(&self) -> usize {
        self.embedding_size
    }

    fn extract(&self, frame: &DynamicImage) -> Result<Embedding, Box<dyn std::error::Error + Send + Sync>> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err("Empty frame".into());
        }
        let cells = frame
            .resize_exact(GRID, GRID, imageops::FilterType::Triangle)
            .to_rgb8();
        let base: Vec<f32> = cells
            .pixels()
            .flat_map(|p| p.0.into_iter().map(|c| c as f32 / 255.0))
            .collect();

        let embedding: Embedding = base.iter().copied().cycle().take(self.embedding_size).collect();
        if embedding.len() != self.embedding_size {
            self.logger.warn("Embedding shorter than requested")?;
        }
        Ok(embedding)
    }
}
