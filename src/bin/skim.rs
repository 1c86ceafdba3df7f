//! Command line tool for labelling the sentences of an abstract

use anyhow::anyhow;
use burn::{
    backend::{ndarray::NdArrayDevice, NdArray},
    config::Config as _,
    tensor::backend::Backend,
};
use pico_args::Arguments;
use skimlit::{
    cli::{prompt, Device},
    models::tribrid::{self, Tribrid},
    pipelines::abstract_classification::{self, Settings, Style},
};

const HELP: &str = "\
Usage: skim [OPTIONS] [ABSTRACT]

Arguments:
  ABSTRACT             The abstract to label (prompts for it when omitted)

Options:
  -h, --help           Print help
  -m, --model-dir      The directory containing the trained model (defaults to 'skimlit_tribrid_model')
  -c, --config         A JSON settings file
  -d, --device         The device to run on: 'cpu', 'cuda' or 'cuda:N' (defaults to 'cpu')
  --no-color           Don't use ANSI escape codes for section headers
";

#[derive(Debug)]
struct Args {
    model_dir: Option<String>,
    config: Option<String>,
    device: Option<String>,
    no_color: bool,
    text: Option<String>,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            model_dir: pargs.opt_value_from_str(["-m", "--model-dir"])?,
            config: pargs.opt_value_from_str(["-c", "--config"])?,
            device: pargs.opt_value_from_str(["-d", "--device"])?,
            no_color: pargs.contains("--no-color"),
            text: pargs.opt_free_from_str()?,
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            return Err(anyhow!("Unexpected arguments: {:?}", remaining));
        }

        Ok(Some(args))
    }

    /// Apply command line overrides on top of the settings
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)
                .map_err(|e| anyhow!("Unable to load settings file {}: {}", path, e))?,
            None => Settings::new(),
        };

        if let Some(model_dir) = &self.model_dir {
            settings.model_dir = model_dir.to_string();
        }

        if let Some(device) = &self.device {
            settings.device = device.to_string();
        }

        if self.no_color {
            settings.color = false;
        }

        Ok(settings)
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let Some(args) = Args::parse()? else {
        print!("{}", HELP);

        return Ok(());
    };

    let settings = args.settings()?;
    let device = Device::try_from(settings.device.as_str())?;

    log::info!(
        "Running the {} pipeline with the {} model on {}",
        abstract_classification::PIPELINE,
        tribrid::MODEL_TYPE,
        device
    );

    match device {
        Device::Cpu => run::<NdArray>(NdArrayDevice::Cpu, &settings, args.text),
        Device::Cuda(index) => run_cuda(index, &settings, args.text),
    }
}

#[cfg(feature = "tch")]
fn run_cuda(index: usize, settings: &Settings, text: Option<String>) -> anyhow::Result<()> {
    use burn::backend::{libtorch::LibTorchDevice, LibTorch};

    run::<LibTorch>(LibTorchDevice::Cuda(index), settings, text)
}

#[cfg(not(feature = "tch"))]
fn run_cuda(index: usize, _settings: &Settings, _text: Option<String>) -> anyhow::Result<()> {
    Err(anyhow!(
        "cuda:{} requested, but skim was built without the `tch` feature",
        index
    ))
}

fn run<B: Backend>(
    device: B::Device,
    settings: &Settings,
    text: Option<String>,
) -> anyhow::Result<()> {
    // The model must load before any input is read
    let classifier = Tribrid::<B>::load(&settings.model_dir, device)?;

    let text = match text {
        Some(text) => text,
        None => prompt::read_abstract(std::io::stdin().lock(), std::io::stdout())?,
    };

    let style = if settings.color {
        Style::Ansi
    } else {
        Style::Plain
    };

    let formatted = abstract_classification::skim(&classifier, &text, style)?;

    println!("\n\nAI formatted abstract is given below:\n");
    println!("{}", formatted);

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use skimlit::pipelines::abstract_classification::config::DEFAULT_MODEL_DIR;

    use super::*;

    fn settings_file(color: bool) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();

        std::fs::write(
            file.path(),
            format!(r#"{{ "model_dir": "from-file", "device": "cuda:1", "color": {color} }}"#),
        )
        .unwrap();

        file
    }

    fn no_flags(config: Option<&tempfile::NamedTempFile>) -> Args {
        Args {
            model_dir: None,
            config: config.map(|file| file.path().display().to_string()),
            device: None,
            no_color: false,
            text: None,
        }
    }

    #[test]
    fn flags_override_the_settings_file() {
        let file = settings_file(true);

        let args = Args {
            model_dir: Some("from-flag".to_string()),
            device: Some("cpu".to_string()),
            no_color: true,
            ..no_flags(Some(&file))
        };

        let settings = args.settings().unwrap();

        assert_eq!(settings.model_dir, "from-flag");
        assert_eq!(settings.device, "cpu");
        assert!(!settings.color);
    }

    #[test]
    fn settings_file_applies_without_flags() {
        for color in [true, false] {
            let file = settings_file(color);

            let settings = no_flags(Some(&file)).settings().unwrap();

            assert_eq!(settings.model_dir, "from-file");
            assert_eq!(settings.device, "cuda:1");
            assert_eq!(settings.color, color);
        }
    }

    #[test]
    fn flags_apply_over_defaults() {
        let settings = no_flags(None).settings().unwrap();

        assert_eq!(settings.model_dir, DEFAULT_MODEL_DIR);
        assert_eq!(settings.device, "cpu");
        assert!(settings.color);

        let args = Args {
            device: Some("cuda".to_string()),
            no_color: true,
            ..no_flags(None)
        };

        let settings = args.settings().unwrap();

        assert_eq!(settings.model_dir, DEFAULT_MODEL_DIR);
        assert_eq!(settings.device, "cuda");
        assert!(!settings.color);
    }

    #[test]
    fn unreadable_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let args = Args {
            config: Some(dir.path().join("missing.json").display().to_string()),
            ..no_flags(None)
        };

        let error = args.settings().unwrap_err();

        assert!(error.to_string().starts_with("Unable to load settings file"), "{error}");
    }
}
