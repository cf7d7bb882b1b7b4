use es_extract::nlp::{
    softmax,
    zero_shot::{hypothesis, label_scores, Classification, NliLogits},
};

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn softmax_sums_to_one_and_keeps_order() {
    let probs = softmax(&[1.0, 2.0, 3.0]);
    let sum: f32 = probs.iter().sum();
    assert!((sum - 1.0).abs() < 1e-6);
    assert!(probs[2] > probs[1] && probs[1] > probs[0]);
}

#[test]
fn single_label_scores_are_normalised_across_labels() {
    let logits = [
        NliLogits {
            entailment: 2.0,
            contradiction: -1.0,
        },
        NliLogits {
            entailment: 0.5,
            contradiction: 0.0,
        },
        NliLogits {
            entailment: -1.0,
            contradiction: 3.0,
        },
    ];
    let scores = label_scores(&logits, false);
    let sum: f32 = scores.iter().sum();
    assert!((sum - 1.0).abs() < 1e-5);
    assert!(scores[0] > scores[1] && scores[1] > scores[2]);
}

#[test]
fn multi_label_scores_are_independent() {
    let logits = [
        NliLogits {
            entailment: 3.0,
            contradiction: -3.0,
        },
        NliLogits {
            entailment: 3.0,
            contradiction: -3.0,
        },
    ];
    let scores = label_scores(&logits, true);
    assert!(scores.iter().all(|s| *s > 0.99));
}

#[test]
fn ranking_sorts_descending_and_keeps_ties_stable() {
    let result = Classification::ranked(
        "texto",
        &labels(&["publicaciones", "instituciones", "proyectos", "instituciones"]),
        &[0.1, 0.4, 0.1, 0.4],
    )
    .unwrap();
    assert_eq!(
        result.labels,
        labels(&["instituciones", "instituciones", "publicaciones", "proyectos"])
    );
    assert_eq!(result.scores, vec![0.4, 0.4, 0.1, 0.1]);
    assert_eq!(result.sequence, "texto");
}

#[test]
fn ranking_rejects_mismatched_lengths() {
    assert!(Classification::ranked("t", &labels(&["a", "b"]), &[1.0]).is_err());
}

#[test]
fn empty_label_set_gives_empty_result() {
    assert!(label_scores(&[], false).is_empty());
    let result = Classification::ranked("t", &[], &[]).unwrap();
    assert!(result.labels.is_empty());
}

#[test]
fn hypothesis_fills_placeholder_once() {
    assert_eq!(
        hypothesis("This example is {}.", "proyectos"),
        "This example is proyectos."
    );
    assert_eq!(
        hypothesis("Este texto trata de {}.", "listado de personas"),
        "Este texto trata de listado de personas."
    );
}
