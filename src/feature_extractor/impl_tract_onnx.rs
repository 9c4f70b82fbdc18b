use crate::feature_extractor::interface::{Embedding, FeatureExtractor};
use crate::feature_extractor::tract::image::{letterbox_to_tensor, pool_embedding};
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;
use tract_onnx::prelude::*;

/// ONNX image backbone (e.g. MobileNetV2) run with tract.
pub struct FeatureExtractorTractOnnx {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    input_shape: (u32, u32),
    embedding_size: usize,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl FeatureExtractorTractOnnx {
    pub fn new(
        model_path: &Path,
        input_shape: (u32, u32),
        embedding_size: usize,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let logger = logger.with_namespace("feature_extractor").with_namespace("tract_onnx");
        logger.info(&format!("Loading backbone from {}", model_path.display()))?;

        let (height, width) = input_shape;
        let model = tract_onnx::onnx()
            .model_for_path(model_path)?
            .with_input_fact(0, f32::fact([1, 3, height as usize, width as usize]).into())?
            .into_optimized()?
            .into_runnable()?;

        logger.info("Backbone loaded")?;

        Ok(Self {
            model,
            input_shape,
            embedding_size,
            logger,
        })
    }
}

impl FeatureExtractor for FeatureExtractorTractOnnx {
    fn embedding_size(&self) -> usize {
        self.embedding_size
    }

    fn extract(&self, frame: &DynamicImage) -> Result<Embedding, Box<dyn std::error::Error + Send + Sync>> {
        let (height, width) = self.input_shape;
        let input = letterbox_to_tensor(frame, width, height);

        let outputs = self.model.run(tvec!(input.into_tvalue()))?;
        let output = outputs
            .first()
            .ok_or("Backbone produced no outputs")?
            .to_array_view::<f32>()?;
        let data: Vec<f32> = output.iter().copied().collect();
        let embedding = pool_embedding(output.shape(), &data)?;

        if embedding.len() != self.embedding_size {
            self.logger.warn(&format!(
                "Backbone produced {} features, expected {}",
                embedding.len(),
                self.embedding_size
            ))?;
            return Err(format!(
                "Embedding width {} does not match configured width {}",
                embedding.len(),
                self.embedding_size
            )
            .into());
        }

        Ok(embedding)
    }
}
