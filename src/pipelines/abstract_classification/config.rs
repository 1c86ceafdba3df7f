/// The default location of the trained model artifacts
pub const DEFAULT_MODEL_DIR: &str = "skimlit_tribrid_model";

/// Define configuration struct for skimming abstracts
#[derive(burn::config::Config, Debug)]
pub struct Settings {
    /// The directory containing the model config, weights and tokenizers
    #[config(default = "DEFAULT_MODEL_DIR.to_string()")]
    pub model_dir: String,

    /// The device to run inference on (e.g., "cpu" or "cuda:0")
    #[config(default = "\"cpu\".to_string()")]
    pub device: String,

    /// Emphasise section headers with ANSI escape codes
    #[config(default = true)]
    pub color: bool,
}
