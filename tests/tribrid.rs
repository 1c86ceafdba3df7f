//! Integration tests for loading and running the tribrid classifier

use std::collections::BTreeMap;

use burn::backend::{ndarray::NdArrayDevice, NdArray};
use pretty_assertions::assert_eq;
use serde_json::json;
use skimlit::{
    models::tribrid::{self, ArtifactError, Tribrid},
    pipelines::abstract_classification::{
        classify, segmenter, skim, Classifier, FeatureBatch, Label, Style,
    },
};
use tokenizers::Tokenizer;

type B = NdArray;

const ABSTRACT: &str =
    "Background info here. We used X. We used X. Result was Y. We conclude Z.";

/// Creates a word-level tokenizer with padding and unknown tokens ahead of the given tokens
fn word_level(tokens: &[&str]) -> Tokenizer {
    let vocab: Vec<&str> = ["[PAD]", "[UNK]"].iter().chain(tokens).copied().collect();

    with_vocab(&vocab)
}

/// Creates a tokenizer that lowercases, splits on whitespace and numbers tokens in order
fn with_vocab(tokens: &[&str]) -> Tokenizer {
    let vocab: BTreeMap<String, usize> = tokens
        .iter()
        .enumerate()
        .map(|(id, token)| (token.to_string(), id))
        .collect();

    json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": { "type": "Lowercase" },
        "pre_tokenizer": { "type": "WhitespaceSplit" },
        "post_processor": null,
        "decoder": null,
        "model": { "type": "WordLevel", "vocab": vocab, "unk_token": "[UNK]" }
    })
    .to_string()
    .parse()
    .unwrap()
}

fn tokenizers() -> (Tokenizer, Tokenizer) {
    let words = word_level(&[
        "background",
        "info",
        "here",
        "we",
        "used",
        "x",
        "result",
        "was",
        "y",
        "conclude",
        "z",
    ]);

    let letters: Vec<String> = ('a'..='z').map(String::from).collect();
    let letters: Vec<&str> = letters.iter().map(String::as_str).collect();
    let chars = word_level(&letters);

    (words, chars)
}

/// A small, randomly initialised model
fn config() -> tribrid::Config {
    let (words, chars) = tokenizers();

    tribrid::Config::new(words.get_vocab_size(true), chars.get_vocab_size(true))
        .with_labels(Label::ALL.to_vec())
        .with_token_embedding_size(8)
        .with_char_embedding_size(4)
        .with_token_hidden_size(8)
        .with_char_hidden_size(4)
        .with_hybrid_hidden_size(8)
        .with_position_hidden_size(4)
}

fn build(config: tribrid::Config) -> Result<Tribrid<B>, ArtifactError> {
    let device = NdArrayDevice::Cpu;
    let (words, chars) = tokenizers();

    let model = config.init::<B>(&device);

    Tribrid::new(config, model, words, chars, device)
}

fn saved_artifact() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();

    build(config()).unwrap().save(dir.path()).unwrap();

    dir
}

#[test]
fn returns_a_distribution_per_sentence() {
    let classifier = build(config()).unwrap();

    let sentences = segmenter::segment(ABSTRACT);
    let batch = FeatureBatch::new(&sentences, &classifier.feature_config()).unwrap();

    let distributions = classifier.predict_proba(&batch).unwrap();

    assert_eq!(distributions.len(), 5);

    for distribution in distributions {
        assert_eq!(distribution.len(), Label::COUNT);

        let total: f32 = distribution.iter().sum();
        assert!((total - 1.0).abs() < 1e-3, "distribution sums to {total}");
    }
}

#[test]
fn loads_a_saved_artifact() {
    let dir = saved_artifact();

    let classifier = Tribrid::<B>::load(dir.path(), NdArrayDevice::Cpu).unwrap();

    assert_eq!(classifier.labels(), &Label::ALL);
    assert_eq!(classifier.config().line_number_depth, 15);
    assert_eq!(classifier.config().total_lines_depth, 20);

    let classified = classify(&classifier, ABSTRACT).unwrap();

    assert_eq!(classified.len(), 5);

    let line_numbers: Vec<_> = classified.iter().map(|c| c.sentence.line_number).collect();
    assert_eq!(line_numbers, vec![0, 1, 2, 3, 4]);
}

#[test]
fn reloading_gives_identical_predictions() {
    let dir = saved_artifact();

    let first = Tribrid::<B>::load(dir.path(), NdArrayDevice::Cpu).unwrap();
    let second = Tribrid::<B>::load(dir.path(), NdArrayDevice::Cpu).unwrap();

    let batch = FeatureBatch::new(&segmenter::segment(ABSTRACT), &first.feature_config()).unwrap();

    assert_eq!(first.predict(&batch).unwrap(), second.predict(&batch).unwrap());
    assert_eq!(first.predict(&batch).unwrap(), first.predict(&batch).unwrap());
}

#[test]
fn formats_a_whole_abstract() {
    let classifier = build(config()).unwrap();

    let formatted = skim(&classifier, ABSTRACT, Style::Plain).unwrap();
    let rendered = formatted.to_string();

    let first = formatted.sections()[0].label;
    assert!(rendered.starts_with(&format!("{first}: Background info here. ")));

    let sentences: usize = formatted.sections().iter().map(|s| s.sentences.len()).sum();
    assert_eq!(sentences, 5);
}

#[test]
fn unknown_words_still_classify() {
    let classifier = build(config()).unwrap();

    let classified = classify(&classifier, "Quantum flux 42 %. Zzz").unwrap();

    assert_eq!(classified.len(), 2);
}

#[test]
fn missing_artifact_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let error = Tribrid::<B>::load(dir.path().join("missing"), NdArrayDevice::Cpu)
        .err()
        .unwrap();

    assert!(matches!(error, ArtifactError::Config { .. }), "{error}");
}

#[test]
fn corrupt_weights_are_fatal() {
    let dir = saved_artifact();

    for entry in std::fs::read_dir(dir.path()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_string_lossy().to_string();

        if name.starts_with(tribrid::inference::WEIGHTS_FILE) {
            std::fs::write(&path, b"not a model").unwrap();
        }
    }

    let error = Tribrid::<B>::load(dir.path(), NdArrayDevice::Cpu).err().unwrap();

    assert!(matches!(error, ArtifactError::Weights { .. }), "{error}");
}

#[test]
fn rejects_configs_without_labels() {
    let device = NdArrayDevice::Cpu;
    let (words, chars) = tokenizers();

    let config = config();
    let model = config.init::<B>(&device);

    let error = Tribrid::new(config.with_labels(vec![]), model, words, chars, device)
        .err()
        .unwrap();

    assert!(matches!(error, ArtifactError::NoLabels));
}

#[test]
fn rejects_tokenizers_larger_than_the_embeddings() {
    let mut config = config();
    config.token_vocab_size = 4;

    let error = build(config).err().unwrap();

    assert!(matches!(
        error,
        ArtifactError::VocabMismatch { model: 4, .. }
    ));
}

#[test]
fn rejects_tokenizers_with_a_real_token_at_the_padding_id() {
    let device = NdArrayDevice::Cpu;
    let (words, _) = tokenizers();

    let mut letters: Vec<String> = ('a'..='z').map(String::from).collect();
    letters.extend(["[UNK]".to_string(), "[PAD]".to_string()]);
    let letters: Vec<&str> = letters.iter().map(String::as_str).collect();
    let chars = with_vocab(&letters);

    let config = config();
    let model = config.init::<B>(&device);

    let error = Tribrid::new(config, model, words, chars, device).err().unwrap();

    match error {
        ArtifactError::PadToken {
            name,
            id,
            expected,
            found,
        } => {
            assert_eq!(name, tribrid::inference::CHAR_TOKENIZER_FILE);
            assert_eq!(id, 0);
            assert_eq!(expected, "[PAD]");
            assert_eq!(found.as_deref(), Some("a"));
        }
        error => panic!("unexpected error: {error}"),
    }
}

#[test]
fn accepts_a_custom_padding_token() {
    let device = NdArrayDevice::Cpu;

    let words = with_vocab(&["<pad>", "[UNK]", "we", "used", "x"]);

    let mut letters: Vec<String> = vec!["<pad>".to_string(), "[UNK]".to_string()];
    letters.extend(('a'..='z').map(String::from));
    let letters: Vec<&str> = letters.iter().map(String::as_str).collect();
    let chars = with_vocab(&letters);

    let config = config().with_pad_token("<pad>".to_string());
    let model = config.init::<B>(&device);

    let classifier = Tribrid::new(config, model, words, chars, device).unwrap();

    assert_eq!(classify(&classifier, "We used X. We used Y.").unwrap().len(), 2);
}

#[test]
fn labels_in_the_config_are_validated_on_load() {
    let dir = saved_artifact();
    let path = dir.path().join(tribrid::inference::CONFIG_FILE);

    let config = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, config.replace("\"BACKGROUND\"", "\"background\"")).unwrap();

    let classifier = Tribrid::<B>::load(dir.path(), NdArrayDevice::Cpu).unwrap();
    assert_eq!(classifier.labels(), &Label::ALL);

    std::fs::write(&path, config.replace("\"BACKGROUND\"", "\"DISCUSSION\"")).unwrap();

    let error = Tribrid::<B>::load(dir.path(), NdArrayDevice::Cpu).err().unwrap();
    assert!(matches!(error, ArtifactError::Config { .. }), "{error}");
}
