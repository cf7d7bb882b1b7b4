//! Runtime configuration utilities for es-extract.
//!
//! Each binary loads only its own settings, so a bad value meant for one
//! tool never stops the other.

use std::{env, path::PathBuf, str::FromStr};

use anyhow::{bail, Context};

const DEFAULT_NER_REPO: &str = "mrm8488/bert-spanish-cased-finetuned-ner";
const DEFAULT_ZERO_SHOT_REPO: &str = "joeddav/xlm-roberta-large-xnli";
const DEFAULT_ONNX_FILE: &str = "onnx/model.onnx";
const DEFAULT_HYPOTHESIS_TEMPLATE: &str = "This example is {}.";

/// Which oracle backs the entity extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NerBackend {
    /// Token-classification transformer run through ONNX Runtime.
    Onnx,
    /// Tab-separated term list matched against the text.
    Gazetteer,
}

impl NerBackend {
    /// The transformer when this build links ONNX Runtime, the term list otherwise.
    pub fn build_default() -> Self {
        if cfg!(feature = "onnx") {
            Self::Onnx
        } else {
            Self::Gazetteer
        }
    }
}

impl FromStr for NerBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "onnx" => Ok(Self::Onnx),
            "gazetteer" => Ok(Self::Gazetteer),
            other => bail!("unknown NER backend `{other}` (expected `onnx` or `gazetteer`)"),
        }
    }
}

/// Where the files of a transformer model come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Directory holding `model.onnx`, `tokenizer.json` and `config.json`.
    Local(PathBuf),
    /// HuggingFace Hub repository plus the ONNX file path inside it.
    Hub { repo_id: String, onnx_file: String },
}

impl ModelSource {
    fn from_env(dir_var: &str, repo_var: &str, file_var: &str, default_repo: &str) -> Self {
        match env::var(dir_var) {
            Ok(dir) if !dir.trim().is_empty() => Self::Local(PathBuf::from(dir)),
            _ => Self::Hub {
                repo_id: env::var(repo_var).unwrap_or_else(|_| default_repo.to_string()),
                onnx_file: env::var(file_var).unwrap_or_else(|_| DEFAULT_ONNX_FILE.to_string()),
            },
        }
    }
}

/// Configuration of `extract-entities`, resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct NerSettings {
    /// Oracle used by `extract-entities`.
    pub backend: NerBackend,
    /// Token-classification model for the ONNX backend.
    pub model: ModelSource,
    /// Term list for the gazetteer backend.
    pub gazetteer_path: PathBuf,
}

impl NerSettings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let backend = env::var("NER_BACKEND")
            .ok()
            .map(|v| v.parse::<NerBackend>())
            .transpose()
            .context("reading NER_BACKEND")?
            .unwrap_or_else(NerBackend::build_default);
        let model = ModelSource::from_env(
            "NER_MODEL_DIR",
            "NER_MODEL_REPO",
            "NER_MODEL_FILE",
            DEFAULT_NER_REPO,
        );
        let gazetteer_path = env::var("NER_GAZETTEER")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./gazetteer.tsv"));

        Ok(Self {
            backend,
            model,
            gazetteer_path,
        })
    }
}

/// Configuration of `zero-shot`, resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct ZeroShotSettings {
    /// NLI model scoring the candidate labels.
    pub model: ModelSource,
    /// Hypothesis with a `{}` placeholder for the candidate label.
    pub hypothesis_template: String,
    /// Score labels independently instead of normalising across them.
    pub multi_label: bool,
}

impl ZeroShotSettings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let model = ModelSource::from_env(
            "ZERO_SHOT_MODEL_DIR",
            "ZERO_SHOT_MODEL_REPO",
            "ZERO_SHOT_MODEL_FILE",
            DEFAULT_ZERO_SHOT_REPO,
        );
        let hypothesis_template = env::var("ZERO_SHOT_HYPOTHESIS_TEMPLATE")
            .unwrap_or_else(|_| DEFAULT_HYPOTHESIS_TEMPLATE.to_string());
        if !hypothesis_template.contains("{}") {
            bail!("ZERO_SHOT_HYPOTHESIS_TEMPLATE must contain a `{{}}` placeholder");
        }
        let multi_label = env::var("ZERO_SHOT_MULTI_LABEL")
            .ok()
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            model,
            hypothesis_template,
            multi_label,
        })
    }
}
