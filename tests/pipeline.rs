use es_extract::{
    nlp::{
        self,
        ner::{Ner, Span},
        zero_shot::{Classification, ZeroShot},
    },
    NlpError, Result,
};

/// Oracle replaying fixed (text, label) pairs in the given order.
struct Scripted {
    spans: Vec<(&'static str, &'static str)>,
    calls: usize,
}

impl Scripted {
    fn new(spans: Vec<(&'static str, &'static str)>) -> Self {
        Self { spans, calls: 0 }
    }
}

impl Ner for Scripted {
    fn infer(&mut self, text: &str) -> Result<Vec<Span>> {
        self.calls += 1;
        Ok(self
            .spans
            .iter()
            .map(|(span, label)| {
                let start = text.find(span).unwrap_or(0);
                Span {
                    start,
                    end: start + span.len(),
                    label: label.to_string(),
                    text: span.to_string(),
                    score: 0.5,
                }
            })
            .collect())
    }
}

struct Failing;

impl Ner for Failing {
    fn infer(&mut self, _text: &str) -> Result<Vec<Span>> {
        Err(NlpError::Inference("input too long".into()))
    }
}

#[test]
fn reference_example_serialises_exactly() {
    let mut oracle = Scripted::new(vec![("CONICET", "ORG"), ("UNCo", "ORG")]);
    let entities = nlp::extract_entities(&mut oracle, "CONICET financia a la UNCo.").unwrap();
    assert_eq!(
        entities.to_json_line().unwrap(),
        r#"{"entities": [{"text": "CONICET", "label": "ORG"}, {"text": "UNCo", "label": "ORG"}]}"#
    );
    assert_eq!(oracle.calls, 1);
}

#[test]
fn oracle_order_is_kept_and_nothing_is_deduplicated() {
    let mut oracle = Scripted::new(vec![
        ("UNCo", "ORG"),
        ("Bariloche", "LOC"),
        ("CONICET", "ORG"),
        ("UNCo", "ORG"),
        ("1985", "DATE"),
    ]);
    let entities = nlp::extract_entities(&mut oracle, "irrelevant").unwrap();
    let texts: Vec<&str> = entities.entities.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, ["UNCo", "Bariloche", "CONICET", "UNCo", "1985"]);
    let labels: Vec<&str> = entities.entities.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, ["ORG", "LOC", "ORG", "ORG", "DATE"]);
}

#[test]
fn no_spans_serialise_as_empty_list() {
    let mut oracle = Scripted::new(vec![]);
    let entities = nlp::extract_entities(&mut oracle, "Hoy llueve.").unwrap();
    assert_eq!(entities.to_json_line().unwrap(), r#"{"entities": []}"#);
}

#[test]
fn oracle_failure_propagates() {
    let err = nlp::extract_entities(&mut Failing, "texto").unwrap_err();
    assert!(matches!(err, NlpError::Inference(_)));
}

/// Oracle returning a deliberately unsorted result.
struct Unsorted {
    calls: usize,
}

impl ZeroShot for Unsorted {
    fn infer(&mut self, text: &str, labels: &[String]) -> Result<Classification> {
        self.calls += 1;
        Ok(Classification {
            sequence: text.to_string(),
            labels: labels.to_vec(),
            scores: (0..labels.len()).map(|i| 0.1 * (i as f32 + 1.0)).collect(),
        })
    }
}

#[test]
fn classification_is_passed_through_untouched() {
    let labels: Vec<String> = ["instituciones", "proyectos", "instituciones"]
        .iter()
        .map(|l| l.to_string())
        .collect();
    let mut oracle = Unsorted { calls: 0 };
    let result = nlp::classify(&mut oracle, "El INIBIOMA.", &labels).unwrap();
    assert_eq!(oracle.calls, 1);
    assert_eq!(result.labels, labels);
    assert_eq!(result.scores.len(), 3);
    assert!(result.scores[0] < result.scores[2]);
}

#[test]
fn classification_prints_as_debug_value() {
    let result = Classification {
        sequence: "texto".into(),
        labels: vec!["proyectos".into()],
        scores: vec![1.0],
    };
    assert_eq!(
        format!("{result:?}"),
        r#"Classification { sequence: "texto", labels: ["proyectos"], scores: [1.0] }"#
    );
}
