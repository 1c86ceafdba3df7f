use super::{FeatureBatch, FeatureConfig, Label};

/// A model that can assign a rhetorical role to every sentence in a feature batch
pub trait Classifier {
    /// The labels in the order of the model's output columns
    fn labels(&self) -> &[Label];

    /// The one-hot widths the model expects
    fn feature_config(&self) -> FeatureConfig {
        FeatureConfig::default()
    }

    /// Return one class distribution per sentence, in batch order
    fn predict_proba(&self, batch: &FeatureBatch) -> anyhow::Result<Vec<Vec<f32>>>;

    /// Return the most likely class index for every sentence, in batch order
    fn predict(&self, batch: &FeatureBatch) -> anyhow::Result<Vec<usize>> {
        let distributions = self.predict_proba(batch)?;

        let n_classes = self.labels().len();

        check_shape(&distributions, batch.len(), n_classes)?;

        let predictions = distributions
            .iter()
            .enumerate()
            .map(|(row, distribution)| {
                argmax(distribution).ok_or(ClassifierError::Undefined { row })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(predictions)
    }
}

/// The index of the largest value, resolving ties to the first. NaN values are never selected.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;

    for (index, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }

        match best {
            Some((_, max)) if value <= max => {}
            _ => best = Some((index, value)),
        }
    }

    best.map(|(index, _)| index)
}

fn check_shape(
    distributions: &[Vec<f32>],
    n_sentences: usize,
    n_classes: usize,
) -> Result<(), ClassifierError> {
    if distributions.len() != n_sentences {
        return Err(ClassifierError::RowCount {
            expected: n_sentences,
            actual: distributions.len(),
        });
    }

    if let Some((row, distribution)) = distributions
        .iter()
        .enumerate()
        .find(|(_, distribution)| distribution.len() != n_classes)
    {
        return Err(ClassifierError::ClassCount {
            row,
            expected: n_classes,
            actual: distribution.len(),
        });
    }

    Ok(())
}

/// Classifier Error
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ClassifierError {
    /// The model returned a different number of rows than there are sentences
    #[error("expected {expected} predictions but the model returned {actual}")]
    RowCount {
        /// Number of sentences in the batch
        expected: usize,

        /// Number of rows returned
        actual: usize,
    },

    /// A row doesn't have one score per label
    #[error("expected {expected} class scores for sentence {row} but got {actual}")]
    ClassCount {
        /// The sentence index
        row: usize,

        /// Number of labels
        expected: usize,

        /// Number of scores returned
        actual: usize,
    },

    /// A row has no usable scores
    #[error("no class scores to choose from for sentence {row}")]
    Undefined {
        /// The sentence index
        row: usize,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::pipelines::abstract_classification::segmenter::segment;

    struct Fixed(Vec<Vec<f32>>);

    impl Classifier for Fixed {
        fn labels(&self) -> &[Label] {
            &Label::ALL
        }

        fn predict_proba(&self, _batch: &FeatureBatch) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(self.0.clone())
        }
    }

    fn batch(text: &str) -> FeatureBatch {
        FeatureBatch::new(&segment(text), &FeatureConfig::default()).unwrap()
    }

    #[test]
    fn argmax_prefers_first_maximum() {
        assert_eq!(argmax(&[0.1, 0.4, 0.4, 0.1]), Some(1));
        assert_eq!(argmax(&[0.2, 0.2]), Some(0));
        assert_eq!(argmax(&[f32::NAN, 0.3, 0.7]), Some(2));
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[f32::NAN]), None);
    }

    #[test]
    fn predicts_one_class_per_sentence() {
        let classifier = Fixed(vec![
            vec![0.9, 0.1, 0.0, 0.0, 0.0],
            vec![0.0, 0.1, 0.5, 0.4, 0.0],
        ]);

        let predictions = classifier.predict(&batch("One. Two.")).unwrap();

        assert_eq!(predictions, vec![0, 2]);
    }

    #[test]
    fn rejects_misaligned_output() {
        let classifier = Fixed(vec![vec![0.9, 0.1, 0.0, 0.0, 0.0]]);

        let error = classifier.predict(&batch("One. Two.")).unwrap_err();

        assert_eq!(
            error.downcast_ref::<ClassifierError>(),
            Some(&ClassifierError::RowCount {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn rejects_wrong_class_count() {
        let classifier = Fixed(vec![vec![0.9, 0.1]]);

        let error = classifier.predict(&batch("One.")).unwrap_err();

        assert_eq!(
            error.downcast_ref::<ClassifierError>(),
            Some(&ClassifierError::ClassCount {
                row: 0,
                expected: 5,
                actual: 2
            })
        );
    }
}
