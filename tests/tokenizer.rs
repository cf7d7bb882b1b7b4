#![cfg(feature = "onnx")]

use std::str::FromStr;

use es_extract::nlp::onnx::encode_whole;
use tokenizers::{Tokenizer, TruncationParams};

const WORD_LEVEL: &str = r#"{
  "version": "1.0",
  "truncation": null,
  "padding": null,
  "added_tokens": [],
  "normalizer": null,
  "pre_tokenizer": {"type": "Whitespace"},
  "post_processor": null,
  "decoder": null,
  "model": {
    "type": "WordLevel",
    "vocab": {"[UNK]": 0, "CONICET": 1, "financia": 2, "a": 3, "la": 4, "UNCo": 5},
    "unk_token": "[UNK]"
  }
}"#;

#[test]
fn encode_whole_drops_configured_truncation() {
    let mut tokenizer = Tokenizer::from_str(WORD_LEVEL).expect("tokenizer json");
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: 2,
            ..Default::default()
        }))
        .expect("set truncation");

    encode_whole(&mut tokenizer).expect("disable limits");

    assert!(tokenizer.get_truncation().is_none());
    let encoding = tokenizer
        .encode("CONICET financia a la UNCo", false)
        .expect("encode");
    assert_eq!(encoding.get_ids(), &[1, 2, 3, 4, 5]);
}
