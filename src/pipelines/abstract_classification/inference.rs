use derive_new::new;

use super::{segmenter, Classifier, FeatureBatch, Formatted, Label, Sentence, Style};

/// A sentence together with its predicted role
#[derive(Clone, Debug, Eq, PartialEq, new)]
pub struct Classified {
    /// The sentence record
    pub sentence: Sentence,

    /// The predicted rhetorical role
    pub label: Label,
}

/// Split an abstract into sentences and label each one
pub fn classify<C: Classifier + ?Sized>(
    classifier: &C,
    text: &str,
) -> anyhow::Result<Vec<Classified>> {
    let sentences = segmenter::segment(text);

    if sentences.is_empty() {
        log::info!("No sentences found, skipping inference");

        return Ok(Vec::new());
    }

    let batch = FeatureBatch::new(&sentences, &classifier.feature_config())?;

    log::info!("Running inference on {} sentences...", batch.len());

    let predictions = classifier.predict(&batch)?;
    let labels = classifier.labels();

    sentences
        .into_iter()
        .zip(predictions)
        .map(|(sentence, class)| {
            let label = labels
                .get(class)
                .copied()
                .ok_or_else(|| anyhow!("Predicted class {} has no label", class))?;

            Ok(Classified::new(sentence, label))
        })
        .collect()
}

/// Label an abstract and lay it out with a header for every change of role
pub fn skim<C: Classifier + ?Sized>(
    classifier: &C,
    text: &str,
    style: Style,
) -> anyhow::Result<Formatted> {
    let classified = classify(classifier, text)?;

    Ok(Formatted::new(&classified, style))
}
