//! ONNX Runtime plumbing shared by the transformer oracles.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::TensorRef;
use serde::Deserialize;
use tokenizers::{Encoding, Tokenizer};
use tracing::{debug, info};

use crate::{
    config::ModelSource,
    error::{NlpError, Result},
};

/// On-disk artefacts of one transformer model.
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub model: PathBuf,
    pub tokenizer: PathBuf,
    pub config: PathBuf,
}

impl ModelFiles {
    /// Locate the files, downloading from the Hub when needed.
    pub fn resolve(source: &ModelSource) -> Result<Self> {
        match source {
            ModelSource::Local(dir) => {
                let files = Self {
                    model: dir.join("model.onnx"),
                    tokenizer: dir.join("tokenizer.json"),
                    config: dir.join("config.json"),
                };
                for path in [&files.model, &files.tokenizer, &files.config] {
                    if !path.exists() {
                        return Err(NlpError::ModelLoad(format!(
                            "missing model artefact {}",
                            path.display()
                        )));
                    }
                }
                Ok(files)
            }
            ModelSource::Hub { repo_id, onnx_file } => download(repo_id, onnx_file),
        }
    }
}

fn download(repo_id: &str, onnx_file: &str) -> Result<ModelFiles> {
    use hf_hub::api::sync::Api;

    let api = Api::new().map_err(|e| NlpError::ModelLoad(format!("initialising HF Hub API: {e}")))?;
    let repo = api.model(repo_id.to_string());
    let fetch = |file: &str| {
        repo.get(file).map_err(|e| NlpError::ModelLoad(format!("fetching {repo_id}/{file}: {e}")))
    };

    let files = ModelFiles {
        model: fetch(onnx_file)?,
        tokenizer: fetch("tokenizer.json")?,
        config: fetch("config.json")?,
    };
    info!(repo = repo_id, model = %files.model.display(), "resolved hub model");
    Ok(files)
}

/// The parts of a HuggingFace `config.json` the oracles rely on.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub model_type: String,
    #[serde(default)]
    id2label: BTreeMap<String, String>,
    pub max_position_embeddings: Option<usize>,
    pub type_vocab_size: Option<usize>,
}

impl ModelConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| NlpError::ModelLoad(format!("reading {}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| NlpError::ModelLoad(format!("parsing {}: {e}", path.display())))
    }

    /// Labels indexed by class id.
    pub fn labels(&self) -> Result<Vec<String>> {
        let mut indexed = Vec::with_capacity(self.id2label.len());
        for (id, label) in &self.id2label {
            let id: usize = id
                .parse()
                .map_err(|_| NlpError::ModelLoad(format!("non-numeric label id `{id}`")))?;
            indexed.push((id, label.clone()));
        }
        indexed.sort_by_key(|(id, _)| *id);
        if indexed.iter().enumerate().any(|(pos, (id, _))| pos != *id) {
            return Err(NlpError::ModelLoad(
                "id2label ids are not contiguous".to_string(),
            ));
        }
        Ok(indexed.into_iter().map(|(_, label)| label).collect())
    }

    /// Longest token sequence the position embeddings accept.
    ///
    /// RoBERTa-family models reserve the first two positions for padding.
    pub fn max_tokens(&self) -> Option<usize> {
        let offset = if self.model_type.contains("roberta") {
            2
        } else {
            0
        };
        self.max_position_embeddings.map(|n| n.saturating_sub(offset))
    }

    pub fn uses_token_type_ids(&self) -> bool {
        self.type_vocab_size.unwrap_or(1) > 1
    }
}

/// A loaded session with its tokenizer and config.
pub struct OnnxModel {
    session: Session,
    pub tokenizer: Tokenizer,
    pub config: ModelConfig,
}

impl OnnxModel {
    pub fn load(source: &ModelSource) -> Result<Self> {
        let files = ModelFiles::resolve(source)?;
        let config = ModelConfig::from_file(&files.config)?;

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| NlpError::ModelLoad(format!("loading tokenizer: {e}")))?;
        encode_whole(&mut tokenizer)?;

        let session = build_session(&files.model)?;
        debug!(model_type = %config.model_type, "onnx model ready");
        Ok(Self {
            session,
            tokenizer,
            config,
        })
    }

    /// Reject encodings longer than the model can embed.
    pub fn check_length(&self, encoding: &Encoding) -> Result<()> {
        match self.config.max_tokens() {
            Some(limit) if encoding.len() > limit => Err(NlpError::Inference(format!(
                "input of {} tokens exceeds the model limit of {limit}",
                encoding.len()
            ))),
            _ => Ok(()),
        }
    }

    /// Run one encoding and return the `logits` output with its shape.
    pub fn logits(&mut self, encoding: &Encoding) -> Result<(Vec<usize>, Vec<f32>)> {
        self.check_length(encoding)?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let token_type_ids: Vec<i64> = encoding.get_type_ids().iter().map(|&t| t as i64).collect();
        let shape = [1_usize, input_ids.len()];

        let ids_tensor = tensor("input_ids", shape, &input_ids)?;
        let mask_tensor = tensor("attention_mask", shape, &attention_mask)?;

        let run = if self.config.uses_token_type_ids() {
            let type_tensor = tensor("token_type_ids", shape, &token_type_ids)?;
            self.session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
                "token_type_ids" => type_tensor,
            ])
        } else {
            self.session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
            ])
        };
        let outputs = run.map_err(|e| NlpError::Inference(format!("onnx run failed: {e}")))?;

        let logits = outputs
            .get("logits")
            .ok_or_else(|| NlpError::Inference("model produced no `logits` output".to_string()))?;
        let (dims, data) = logits
            .try_extract_tensor::<f32>()
            .map_err(|e| NlpError::Inference(format!("reading logits: {e}")))?;
        let dims = dims.iter().map(|&d| d as usize).collect();
        Ok((dims, data.to_vec()))
    }
}

/// Turn off truncation and padding shipped in `tokenizer.json`.
///
/// The whole text goes to the model; length limits are checked explicitly.
pub fn encode_whole(tokenizer: &mut Tokenizer) -> Result<()> {
    tokenizer
        .with_truncation(None)
        .map_err(|e| NlpError::ModelLoad(format!("disabling truncation: {e}")))?;
    tokenizer.with_padding(None);
    Ok(())
}

fn tensor<'a>(name: &str, shape: [usize; 2], data: &'a [i64]) -> Result<TensorRef<'a, i64>> {
    TensorRef::from_array_view((shape, data))
        .map_err(|e| NlpError::Inference(format!("building {name} tensor: {e}")))
}

fn build_session(model_path: &Path) -> Result<Session> {
    Session::builder()
        .map_err(|e| NlpError::ModelLoad(format!("creating session builder: {e}")))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| NlpError::ModelLoad(format!("setting optimization level: {e}")))?
        .commit_from_file(model_path)
        .map_err(|e| NlpError::ModelLoad(format!("loading {}: {e}", model_path.display())))
}
