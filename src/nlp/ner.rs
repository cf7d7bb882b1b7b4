//! Named-entity oracles: the `Ner` capability, a gazetteer backend and the
//! IOB span aggregation used by the transformer backend.

use std::path::Path;

use tracing::{debug, info};

use crate::{
    config::{NerBackend, NerSettings},
    error::{NlpError, Result},
};

/// Extracted entity span with offsets relative to the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub text: String,
    pub score: f64,
}

/// Trait for NER implementations.
///
/// Spans come back in detection order.
pub trait Ner {
    fn infer(&mut self, text: &str) -> Result<Vec<Span>>;
}

/// Dictionary oracle over a fixed term list.
#[derive(Debug, Clone, Default)]
pub struct GazetteerNer {
    terms: Vec<(String, String)>,
}

impl GazetteerNer {
    pub fn new(terms: Vec<(String, String)>) -> Self {
        let terms = terms
            .into_iter()
            .filter(|(term, _)| !term.is_empty())
            .collect();
        Self { terms }
    }

    /// Parse `term<TAB>LABEL` lines; blank lines and `#` comments are skipped.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut terms = Vec::new();
        for (lineno, line) in contents.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let Some((term, label)) = line.split_once('\t') else {
                return Err(NlpError::ModelLoad(format!(
                    "gazetteer line {} has no tab separator",
                    lineno + 1
                )));
            };
            let (term, label) = (term.trim(), label.trim());
            if term.is_empty() || label.is_empty() {
                return Err(NlpError::ModelLoad(format!(
                    "gazetteer line {} has an empty term or label",
                    lineno + 1
                )));
            }
            terms.push((term.to_string(), label.to_string()));
        }
        Ok(Self::new(terms))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|err| {
            NlpError::ModelLoad(format!("reading gazetteer {}: {err}", path.display()))
        })?;
        let ner = Self::parse(&contents)?;
        info!(path = %path.display(), terms = ner.terms.len(), "loaded gazetteer");
        Ok(ner)
    }
}

impl Ner for GazetteerNer {
    fn infer(&mut self, text: &str) -> Result<Vec<Span>> {
        let mut candidates = Vec::new();
        for (term, label) in &self.terms {
            candidates.extend(find_term(text, term, label));
        }
        // Leftmost first, longer match first on ties.
        candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut spans: Vec<Span> = Vec::with_capacity(candidates.len());
        for span in candidates {
            if spans.last().map_or(true, |prev| span.start >= prev.end) {
                spans.push(span);
            }
        }
        Ok(spans)
    }
}

fn find_term(text: &str, term: &str, label: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut start_pos = 0;
    while let Some(pos) = text[start_pos..].find(term) {
        let start = start_pos + pos;
        let end = start + term.len();
        if is_word_boundary(text, start, end) {
            spans.push(Span {
                start,
                end,
                label: label.to_string(),
                text: text[start..end].to_string(),
                score: 1.0,
            });
        }
        // Step one char so overlapping occurrences are still considered.
        start_pos = start + text[start..].chars().next().map_or(1, char::len_utf8);
    }
    spans
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// Argmax prediction for one sub-word token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenTag {
    /// Byte offsets of the token in the input text.
    pub start: usize,
    pub end: usize,
    /// Raw model label, e.g. `B-ORG`, `I-LOC` or `O`.
    pub label: String,
    pub score: f32,
}

/// Group token predictions into entity spans using the IOB scheme.
///
/// `B-X` always opens a new span, `I-X` extends an open span of type `X` and
/// otherwise opens one, `O` closes. Labels without a prefix behave like `I-`.
/// Zero-width tokens are ignored. Span text is the slice of `text` covered by
/// the grouped tokens, minus surrounding whitespace.
pub fn aggregate_tags(text: &str, tags: &[TokenTag]) -> Vec<Span> {
    struct Open {
        start: usize,
        end: usize,
        kind: String,
        scores: Vec<f32>,
    }

    fn close(text: &str, open: Option<Open>, spans: &mut Vec<Span>) {
        let Some(open) = open else { return };
        let Some(raw) = text.get(open.start..open.end) else {
            return;
        };
        // Metaspace tokenizers fold the preceding blank into the token offsets.
        let slice = raw.trim();
        if slice.is_empty() {
            return;
        }
        let start = open.start + (raw.len() - raw.trim_start().len());
        let total = open.scores.iter().map(|s| *s as f64).sum::<f64>();
        let score = total / open.scores.len() as f64;
        spans.push(Span {
            start,
            end: start + slice.len(),
            label: open.kind,
            text: slice.to_string(),
            score,
        });
    }

    let mut spans = Vec::new();
    let mut current: Option<Open> = None;

    for tag in tags.iter().filter(|tag| tag.end > tag.start) {
        let (begins, kind) = match tag.label.as_str() {
            "O" => {
                close(text, current.take(), &mut spans);
                continue;
            }
            label => match label.split_once('-') {
                Some(("B", kind)) => (true, kind),
                Some(("I", kind)) => (false, kind),
                _ => (false, label),
            },
        };

        match current.as_mut() {
            Some(open) if !begins && open.kind == kind => {
                open.end = open.end.max(tag.end);
                open.scores.push(tag.score);
            }
            _ => {
                close(text, current.take(), &mut spans);
                current = Some(Open {
                    start: tag.start,
                    end: tag.end,
                    kind: kind.to_string(),
                    scores: vec![tag.score],
                });
            }
        }
    }
    close(text, current.take(), &mut spans);
    debug!(tokens = tags.len(), spans = spans.len(), "aggregated token tags");
    spans
}

/// Load the NER oracle selected in `settings`.
pub fn load_model(settings: &NerSettings) -> Result<Box<dyn Ner>> {
    match settings.backend {
        NerBackend::Gazetteer => {
            let ner = GazetteerNer::from_file(&settings.gazetteer_path)?;
            Ok(Box::new(ner))
        }
        NerBackend::Onnx => load_onnx(settings),
    }
}

#[cfg(feature = "onnx")]
fn load_onnx(settings: &NerSettings) -> Result<Box<dyn Ner>> {
    let ner = super::token_classifier::OnnxNer::load(&settings.model)?;
    Ok(Box::new(ner))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(_settings: &NerSettings) -> Result<Box<dyn Ner>> {
    Err(NlpError::ModelLoad(
        "the onnx NER backend needs the `onnx` feature; rebuild with --features onnx \
         or set NER_BACKEND=gazetteer"
            .to_string(),
    ))
}
