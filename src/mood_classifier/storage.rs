use std::fs;
use std::path::Path;

use super::error::ClassifierError;
use super::model::ClassifierModel;

/// Writes the classifier as pretty JSON, creating parent directories.
pub fn save_model(model: &ClassifierModel, path: &Path) -> Result<(), ClassifierError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ClassifierError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json =
        serde_json::to_string_pretty(model).map_err(|source| ClassifierError::Serialize { source })?;
    fs::write(path, json).map_err(|source| ClassifierError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a classifier and checks it against the embedding width in use.
pub fn load_model(path: &Path, expected_input: usize) -> Result<ClassifierModel, ClassifierError> {
    let bytes = fs::read(path).map_err(|source| ClassifierError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let model: ClassifierModel =
        serde_json::from_slice(&bytes).map_err(|source| ClassifierError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    model.validate()?;
    model.ensure_input_size(expected_input)?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood_classifier::label::MOOD_LABELS;
    use crate::mood_classifier::sample::Sample;
    use crate::mood_classifier::train::{train_classifier, TrainOptions};
    use tempfile::tempdir;

    fn trained_model() -> ClassifierModel {
        let samples: Vec<Sample> = MOOD_LABELS
            .iter()
            .enumerate()
            .map(|(i, label)| Sample::new(vec![i as f32, 1.0, -(i as f32)], *label))
            .collect();
        let options = TrainOptions {
            hidden1_size: 8,
            hidden2_size: 4,
            epochs: 3,
            ..TrainOptions::default()
        };
        train_classifier(&samples, 3, &options).unwrap().model
    }

    #[test]
    fn test_round_trip_gives_identical_predictions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("model.json");
        let model = trained_model();

        save_model(&model, &path).unwrap();
        let loaded = load_model(&path, 3).unwrap();

        assert_eq!(loaded, model);
        let embedding = [0.4, -1.2, 2.5];
        assert_eq!(
            loaded.predict_proba(&embedding).unwrap(),
            model.predict_proba(&embedding).unwrap()
        );
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let dir = tempdir().unwrap();
        let err = load_model(&dir.path().join("absent.json"), 3).unwrap_err();
        assert!(matches!(err, ClassifierError::Read { .. }));
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_model(&path, 3).unwrap_err(),
            ClassifierError::Parse { .. }
        ));
    }

    #[test]
    fn test_input_width_is_checked_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        save_model(&trained_model(), &path).unwrap();
        assert!(matches!(
            load_model(&path, 1280).unwrap_err(),
            ClassifierError::InputWidthMismatch {
                expected: 1280,
                actual: 3
            }
        ));
    }
}
