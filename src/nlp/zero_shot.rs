//! Zero-shot classification oracles.

use tracing::info;

use crate::{
    config::ZeroShotSettings,
    error::{NlpError, Result},
    nlp::softmax,
};

/// Labels ranked against a text, as returned by the oracle.
///
/// `labels` and `scores` are parallel and ordered by descending score.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub sequence: String,
    pub labels: Vec<String>,
    pub scores: Vec<f32>,
}

impl Classification {
    /// Sort `labels`/`scores` by descending score, keeping input order on ties.
    pub fn ranked(sequence: &str, labels: &[String], scores: &[f32]) -> Result<Self> {
        if labels.len() != scores.len() {
            return Err(NlpError::Inference(format!(
                "{} labels but {} scores",
                labels.len(),
                scores.len()
            )));
        }
        let mut pairs: Vec<(String, f32)> = labels
            .iter()
            .cloned()
            .zip(scores.iter().copied())
            .collect();
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
        let (labels, scores) = pairs.into_iter().unzip();
        Ok(Self {
            sequence: sequence.to_string(),
            labels,
            scores,
        })
    }
}

/// Trait for zero-shot implementations.
pub trait ZeroShot {
    fn infer(&mut self, text: &str, labels: &[String]) -> Result<Classification>;
}

/// Entailment and contradiction logits of one premise/hypothesis pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NliLogits {
    pub entailment: f32,
    pub contradiction: f32,
}

/// Turn per-label NLI logits into label scores.
///
/// Single-label mode normalises the entailment logits across all labels;
/// multi-label mode scores each label on its own entailment-vs-contradiction
/// odds.
pub fn label_scores(logits: &[NliLogits], multi_label: bool) -> Vec<f32> {
    if multi_label {
        logits
            .iter()
            .map(|l| softmax(&[l.contradiction, l.entailment])[1])
            .collect()
    } else {
        let entailment: Vec<f32> = logits.iter().map(|l| l.entailment).collect();
        softmax(&entailment)
    }
}

/// Expand the `{}` placeholder of a hypothesis template.
pub fn hypothesis(template: &str, label: &str) -> String {
    template.replacen("{}", label, 1)
}

/// Load the zero-shot oracle configured in `settings`.
pub fn load_model(settings: &ZeroShotSettings) -> Result<Box<dyn ZeroShot>> {
    let model = load_onnx(settings)?;
    info!(multi_label = settings.multi_label, "zero-shot model ready");
    Ok(model)
}

#[cfg(feature = "onnx")]
fn load_onnx(settings: &ZeroShotSettings) -> Result<Box<dyn ZeroShot>> {
    let classifier = onnx::OnnxZeroShot::load(
        &settings.model,
        &settings.hypothesis_template,
        settings.multi_label,
    )?;
    Ok(Box::new(classifier))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(_settings: &ZeroShotSettings) -> Result<Box<dyn ZeroShot>> {
    Err(NlpError::ModelLoad(
        "zero-shot classification needs the `onnx` feature; rebuild with --features onnx"
            .to_string(),
    ))
}

#[cfg(feature = "onnx")]
mod onnx {
    use tracing::debug;

    use super::{hypothesis, label_scores, Classification, NliLogits, ZeroShot};
    use crate::{
        config::ModelSource,
        error::{NlpError, Result},
        nlp::onnx::OnnxModel,
    };

    /// NLI cross-encoder scoring each label as a hypothesis.
    pub struct OnnxZeroShot {
        model: OnnxModel,
        template: String,
        multi_label: bool,
        entailment_id: usize,
        contradiction_id: usize,
        num_labels: usize,
    }

    impl OnnxZeroShot {
        pub fn load(source: &ModelSource, template: &str, multi_label: bool) -> Result<Self> {
            let model = OnnxModel::load(source)?;
            let labels = model.config.labels()?;
            let find = |prefix: &str| {
                labels
                    .iter()
                    .position(|l| l.to_ascii_lowercase().starts_with(prefix))
                    .ok_or_else(|| {
                        NlpError::ModelLoad(format!(
                            "config.json id2label {labels:?} has no `{prefix}` class"
                        ))
                    })
            };
            let entailment_id = find("entail")?;
            let contradiction_id = find("contra")?;
            Ok(Self {
                model,
                template: template.to_string(),
                multi_label,
                entailment_id,
                contradiction_id,
                num_labels: labels.len(),
            })
        }

        fn pair_logits(&mut self, premise: &str, label: &str) -> Result<NliLogits> {
            let hypothesis = hypothesis(&self.template, label);
            let encoding = self
                .model
                .tokenizer
                .encode((premise, hypothesis.as_str()), true)
                .map_err(|e| NlpError::Inference(format!("tokenization failed: {e}")))?;
            let (dims, logits) = self.model.logits(&encoding)?;
            if dims != [1, self.num_labels] {
                return Err(NlpError::Inference(format!(
                    "expected logits of shape [1, {}], got {dims:?}",
                    self.num_labels
                )));
            }
            Ok(NliLogits {
                entailment: logits[self.entailment_id],
                contradiction: logits[self.contradiction_id],
            })
        }
    }

    impl ZeroShot for OnnxZeroShot {
        fn infer(&mut self, text: &str, labels: &[String]) -> Result<Classification> {
            let logits = labels
                .iter()
                .map(|label| self.pair_logits(text, label))
                .collect::<Result<Vec<_>>>()?;
            let scores = label_scores(&logits, self.multi_label);
            debug!(labels = labels.len(), "scored candidate labels");
            Classification::ranked(text, labels, &scores)
        }
    }
}
