//! Seeded property test for spec.md §8's chunked-tokenization invariant:
//! splitting a document into two halves and tokenizing each half in turn
//! must produce the same token sequence as tokenizing it unsplit.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use scopedjson_json::{JsonTokenKind, JsonTokenizer};

fn random_document(rng: &mut StdRng, depth: usize) -> String {
    if depth == 0 || rng.gen_bool(0.3) {
        return match rng.gen_range(0..5) {
            0 => "null".to_string(),
            1 => "true".to_string(),
            2 => rng.gen_range(-100_000i64..100_000).to_string(),
            3 => format!("{:.3}", rng.gen_range(-1000.0f64..1000.0)),
            _ => format!("\"{}\"", random_string(rng)),
        };
    }
    if rng.gen_bool(0.5) {
        let n = rng.gen_range(0..4);
        let items: Vec<String> = (0..n).map(|_| random_document(rng, depth - 1)).collect();
        format!("[{}]", items.join(","))
    } else {
        let n = rng.gen_range(0..4);
        let items: Vec<String> = (0..n)
            .map(|_| format!("\"{}\":{}", random_string(rng), random_document(rng, depth - 1)))
            .collect();
        format!("{{{}}}", items.join(","))
    }
}

fn random_string(rng: &mut StdRng) -> String {
    let len = rng.gen_range(0..6);
    (0..len).map(|_| (b'a' + rng.gen_range(0..26)) as char).collect()
}

fn tokenize_all(input: &[u8]) -> Vec<(JsonTokenKind, String)> {
    let mut t = JsonTokenizer::new();
    t.feed(input);
    t.end_of_input();
    let mut out = Vec::new();
    loop {
        let tok = t.next_token();
        if tok.kind == JsonTokenKind::EndOfFile {
            break;
        }
        out.push((tok.kind, tok.text.clone()));
    }
    out
}

fn tokenize_split(input: &[u8], split: usize) -> Vec<(JsonTokenKind, String)> {
    let mut t = JsonTokenizer::new();
    t.feed(&input[..split]);
    let mut out = Vec::new();
    loop {
        let tok = t.next_token();
        match tok.kind {
            JsonTokenKind::EndOfBuffer | JsonTokenKind::EndOfFile => break,
            _ => out.push((tok.kind, tok.text.clone())),
        }
    }
    t.feed(&input[split..]);
    t.end_of_input();
    loop {
        let tok = t.next_token();
        if tok.kind == JsonTokenKind::EndOfFile {
            break;
        }
        out.push((tok.kind, tok.text.clone()));
    }
    out
}

#[test]
fn chunked_tokenization_matches_unsplit_for_random_documents() {
    for seed in 0u64..40 {
        let mut rng = StdRng::seed_from_u64(seed);
        let doc = random_document(&mut rng, 3);
        let bytes = doc.as_bytes();
        let unsplit = tokenize_all(bytes);

        for split in 0..=bytes.len() {
            let got = tokenize_split(bytes, split);
            assert_eq!(got, unsplit, "seed {seed} split {split} doc {doc:?}");
        }
    }
}
