//! Transformer NER oracle backed by a token-classification ONNX export.

use tracing::{debug, info};

use crate::{
    config::ModelSource,
    error::{NlpError, Result},
    nlp::{
        ner::{aggregate_tags, Ner, Span, TokenTag},
        onnx::OnnxModel,
        softmax,
    },
};

pub struct OnnxNer {
    model: OnnxModel,
    labels: Vec<String>,
}

impl OnnxNer {
    pub fn load(source: &ModelSource) -> Result<Self> {
        let model = OnnxModel::load(source)?;
        let labels = model.config.labels()?;
        if labels.is_empty() {
            return Err(NlpError::ModelLoad(
                "config.json has no id2label entries".to_string(),
            ));
        }
        info!(labels = ?labels, "loaded token-classification model");
        Ok(Self { model, labels })
    }
}

impl Ner for OnnxNer {
    fn infer(&mut self, text: &str) -> Result<Vec<Span>> {
        let encoding = self
            .model
            .tokenizer
            .encode(text, true)
            .map_err(|e| NlpError::Inference(format!("tokenization failed: {e}")))?;
        let (dims, logits) = self.model.logits(&encoding)?;

        let [_, seq_len, num_labels] = dims[..] else {
            return Err(NlpError::Inference(format!(
                "expected logits of rank 3, got shape {dims:?}"
            )));
        };
        if num_labels != self.labels.len() || seq_len != encoding.len() {
            return Err(NlpError::Inference(format!(
                "logits shape {dims:?} does not match {} tokens and {} labels",
                encoding.len(),
                self.labels.len()
            )));
        }

        let special = encoding.get_special_tokens_mask();
        let offsets = encoding.get_offsets();
        let mut tags = Vec::with_capacity(seq_len);
        for (idx, row) in logits.chunks(num_labels).enumerate() {
            if special[idx] == 1 {
                continue;
            }
            let probs = softmax(row);
            let (best, score) = probs
                .iter()
                .copied()
                .enumerate()
                .fold((0, f32::MIN), |acc, (i, p)| {
                    if p > acc.1 {
                        (i, p)
                    } else {
                        acc
                    }
                });
            let (start, end) = offsets[idx];
            tags.push(TokenTag {
                start,
                end,
                label: self.labels[best].clone(),
                score,
            });
        }
        debug!(tokens = tags.len(), "tagged tokens");
        Ok(aggregate_tags(text, &tags))
    }
}
