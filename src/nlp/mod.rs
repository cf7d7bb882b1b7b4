//! Natural language processing orchestration layer.

pub mod ner;
#[cfg(feature = "onnx")]
pub mod onnx;
#[cfg(feature = "onnx")]
pub mod token_classifier;
pub mod zero_shot;

use tracing::info;

use crate::{
    error::Result,
    output::{Entity, EntityCollection},
};
use ner::Ner;
use zero_shot::{Classification, ZeroShot};

/// Run the NER oracle once over `text` and keep its spans in order.
pub fn extract_entities(oracle: &mut dyn Ner, text: &str) -> Result<EntityCollection> {
    let spans = oracle.infer(text)?;
    let entities: Vec<Entity> = spans
        .into_iter()
        .map(|span| Entity {
            text: span.text,
            label: span.label,
        })
        .collect();
    info!(count = entities.len(), "extracted entities");
    Ok(EntityCollection { entities })
}

/// Score `labels` against `text`; the oracle's ranking is returned untouched.
pub fn classify(
    oracle: &mut dyn ZeroShot,
    text: &str,
    labels: &[String],
) -> Result<Classification> {
    let result = oracle.infer(text, labels)?;
    info!(labels = labels.len(), "classified text");
    Ok(result)
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|x| x / sum).collect()
}
