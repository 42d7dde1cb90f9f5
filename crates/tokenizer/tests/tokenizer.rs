//! Integration tests for the word tokenizer.
//!
//! These tests exercise the public API end to end: loading model files,
//! tokenizing, saving, caching and sharing one instance across threads.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;
use std::thread;
use subword_tokenizer::{Token, Tokenizer, TokenizerError};

const VOCAB: &str = r#"{
    "<unk>": 0, "l": 1, "o": 2, "w": 3, "e": 4, "r": 5, "n": 6, "s": 7, "t": 8,
    "lo": 9, "low": 10, "er": 11, "lower": 12, "ne": 13, "new": 14, "st": 15,
    "est": 16, "newest": 17, "lowest": 18
}"#;

const MERGES: &str = "#version: 0.2 - Trained by `huggingface/tokenizers`
l o
lo w
e r
low er
n e
ne w
s t
e st
new est
low est
";

fn write_model(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let vocab = dir.join("vocab.json");
    let merges = dir.join("merges.txt");
    fs::write(&vocab, VOCAB).unwrap();
    fs::write(&merges, MERGES).unwrap();
    (vocab, merges)
}

fn load(dir: &Path) -> Tokenizer {
    let (vocab, merges) = write_model(dir);
    Tokenizer::from_files(&vocab, &merges).unwrap()
}

fn values(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.value.as_str()).collect()
}

fn random_word(rng: &mut StdRng, alphabet: &[char]) -> String {
    let len = rng.random_range(1..12);
    (0..len)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())])
        .collect()
}

#[test]
fn test_load_and_tokenize() {
    let dir = tempfile::tempdir().unwrap();
    let tokenizer = load(dir.path());

    assert_eq!(tokenizer.vocab_size(), 19);
    assert_eq!(tokenizer.unk_token(), Some("<unk>"));
    assert_eq!(values(&tokenizer.tokenize("lowest").unwrap()), vec!["lowest"]);
    assert_eq!(values(&tokenizer.tokenize("newer").unwrap()), vec!["new", "er"]);
    assert_eq!(
        tokenizer.tokenize("slow").unwrap(),
        vec![Token::new(7, "s", (0, 1)), Token::new(10, "low", (1, 4))]
    );
}

#[test]
fn test_unknown_characters_map_to_unk() {
    let dir = tempfile::tempdir().unwrap();
    let tokenizer = load(dir.path());

    assert_eq!(
        values(&tokenizer.tokenize("lo!?w").unwrap()),
        vec!["lo", "<unk>", "<unk>", "w"]
    );
}

#[test]
fn test_spans_cover_word_contiguously() {
    let dir = tempfile::tempdir().unwrap();
    let tokenizer = load(dir.path());
    let alphabet: Vec<char> = "lowernst".chars().collect();
    let mut rng = StdRng::seed_from_u64(0xB9E);

    for _ in 0..200 {
        let word = random_word(&mut rng, &alphabet);
        let tokens = tokenizer.tokenize(&word).unwrap();

        let mut cursor = 0;
        for token in &tokens {
            assert_eq!(token.offsets.0, cursor, "gap or overlap in {word:?}");
            assert_eq!(&word[token.offsets.0..token.offsets.1], token.value);
            cursor = token.offsets.1;
        }
        assert_eq!(cursor, word.len());

        let joined: String = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(joined, word);
    }
}

#[test]
fn test_stale_candidate_leaves_two_tokens() {
    let tokenizer = Tokenizer::builder()
        .vocab_and_merges([("a", 1), ("aa", 2)], [("a", "a")])
        .build()
        .unwrap();

    assert_eq!(
        tokenizer.tokenize("aaa").unwrap(),
        vec![Token::new(2, "aa", (0, 2)), Token::new(1, "a", (2, 3))]
    );
}

#[test]
fn test_save_and_reload_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let original = load(dir.path());

    let out = tempfile::tempdir().unwrap();
    let (vocab_path, merges_path) = original.save(out.path(), Some("model")).unwrap();
    assert_eq!(vocab_path, out.path().join("model-vocab.json"));
    assert_eq!(merges_path, out.path().join("model-merges.txt"));

    let merges = fs::read_to_string(&merges_path).unwrap();
    assert_eq!(merges, MERGES);

    let reloaded = Tokenizer::from_files(&vocab_path, &merges_path).unwrap();
    assert_eq!(reloaded.vocab_size(), original.vocab_size());
    for (id, token) in original.vocab().entries_by_id() {
        assert_eq!(reloaded.token_to_id(token), Some(id));
        assert_eq!(reloaded.id_to_token(id), Some(token));
    }
    for (pair, rank) in original.merges().pairs_by_rank() {
        assert_eq!(
            reloaded.merges().get(pair),
            original.merges().get(pair),
            "rank {rank}"
        );
    }
    for word in ["lowest", "newer", "lost", "snow"] {
        assert_eq!(
            reloaded.tokenize(word).unwrap(),
            original.tokenize(word).unwrap()
        );
    }
}

#[test]
fn test_hash_tokens_survive_save_and_reload() {
    let original = Tokenizer::builder()
        .vocab_and_merges(
            [("#", 1), ("##", 2), ("a", 3), ("##a", 4)],
            [("#", "#"), ("##", "a")],
        )
        .build()
        .unwrap();
    assert_eq!(values(&original.tokenize("##a").unwrap()), vec!["##a"]);

    let out = tempfile::tempdir().unwrap();
    let (vocab_path, merges_path) = original.save(out.path(), None).unwrap();
    let merges = fs::read_to_string(&merges_path).unwrap();
    assert!(merges.ends_with("\n# #\n## a\n"));

    let reloaded = Tokenizer::from_files(&vocab_path, &merges_path).unwrap();
    assert_eq!(reloaded.merges().len(), 2);
    assert_eq!(reloaded.merges().get((1, 1)), Some((0, 2)));
    assert_eq!(reloaded.merges().get((2, 3)), Some((1, 4)));
    for word in ["##a", "##", "#a", "a##"] {
        assert_eq!(
            reloaded.tokenize(word).unwrap(),
            original.tokenize(word).unwrap()
        );
    }
}

#[test]
fn test_load_errors() {
    let dir = tempfile::tempdir().unwrap();
    let (vocab, merges) = write_model(dir.path());

    fs::write(&merges, "#version: 0.2\nl o\nlo  w\n").unwrap();
    let err = Tokenizer::from_files(&vocab, &merges).unwrap_err();
    assert!(matches!(err, TokenizerError::InvalidMerge { line: 3, .. }));

    fs::write(&merges, "l q\n").unwrap();
    let err = Tokenizer::from_files(&vocab, &merges).unwrap_err();
    assert!(matches!(err, TokenizerError::UnknownToken(t) if t == "q"));

    fs::write(&merges, "w o\n").unwrap();
    let err = Tokenizer::from_files(&vocab, &merges).unwrap_err();
    assert!(matches!(err, TokenizerError::MergeTargetMissing(t) if t == "wo"));

    fs::write(&vocab, "not json").unwrap();
    let err = Tokenizer::from_files(&vocab, &merges).unwrap_err();
    assert!(matches!(err, TokenizerError::Load(_)));
}

#[test]
fn test_vocab_only_model() {
    let dir = tempfile::tempdir().unwrap();
    let (vocab, _) = write_model(dir.path());

    let tokenizer = Tokenizer::builder().files(&vocab, None).build().unwrap();
    assert!(tokenizer.merges().is_empty());
    assert_eq!(values(&tokenizer.tokenize("low").unwrap()), vec!["l", "o", "w"]);
}

#[test]
fn test_cached_word_renders_like_fresh_tokenization() {
    let dir = tempfile::tempdir().unwrap();
    let tokenizer = load(dir.path());

    for word in ["lowest", "newest", "slower", "tens"] {
        let first = tokenizer.tokenize(word).unwrap();
        let cached = tokenizer.cache().and_then(|c| c.get(word)).unwrap();
        let fresh = tokenizer.merge_word(word).unwrap();

        assert_eq!(cached, fresh);
        assert_eq!(tokenizer.word_to_tokens(&cached).unwrap(), first);
    }
}

#[test]
fn test_cache_stops_growing_at_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let (vocab, merges) = write_model(dir.path());
    let tokenizer = Tokenizer::builder()
        .files(&vocab, Some(merges))
        .cache_capacity(2)
        .build()
        .unwrap();

    for word in ["low", "new", "est", "lower"] {
        tokenizer.tokenize(word).unwrap();
    }

    let cache = tokenizer.cache().unwrap();
    assert_eq!(cache.len(), 2);
    assert!(cache.get("lower").is_none());
    // Uncached words still tokenize correctly.
    assert_eq!(values(&tokenizer.tokenize("lower").unwrap()), vec!["lower"]);

    tokenizer.clear_cache();
    assert!(cache.is_empty());
}

#[test]
fn test_full_dropout_never_merges() {
    let dir = tempfile::tempdir().unwrap();
    let (vocab, merges) = write_model(dir.path());
    let tokenizer = Tokenizer::builder()
        .files(&vocab, Some(merges))
        .dropout(1.0)
        .rng(StdRng::seed_from_u64(11))
        .build()
        .unwrap();

    for word in ["lowest", "newer"] {
        let tokens = tokenizer.tokenize(word).unwrap();
        assert_eq!(tokens.len(), word.chars().count());
    }
}

#[test]
fn test_zero_dropout_matches_plain_tokenization() {
    let dir = tempfile::tempdir().unwrap();
    let (vocab, merges) = write_model(dir.path());
    let plain = Tokenizer::from_files(&vocab, &merges).unwrap();
    let zero = Tokenizer::builder()
        .files(&vocab, Some(merges))
        .dropout(0.0)
        .seed(5)
        .build()
        .unwrap();

    for _ in 0..5 {
        for word in ["lowest", "newer", "stone", "wester"] {
            assert_eq!(zero.tokenize(word).unwrap(), plain.tokenize(word).unwrap());
        }
    }
}

#[test]
fn test_dropout_is_reproducible_for_a_seed() {
    let dir = tempfile::tempdir().unwrap();
    let (vocab, merges) = write_model(dir.path());
    let build = || {
        Tokenizer::builder()
            .files(&vocab, Some(merges.clone()))
            .dropout(0.4)
            .seed(1234)
            .build()
            .unwrap()
    };
    let (a, b) = (build(), build());

    for _ in 0..20 {
        let left = a.tokenize("lowest").unwrap();
        let right = b.tokenize("lowest").unwrap();
        assert_eq!(left, right);

        let joined: String = left.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(joined, "lowest");
    }
}

#[test]
fn test_shared_across_threads() {
    let dir = tempfile::tempdir().unwrap();
    let tokenizer = load(dir.path());
    let words = ["lowest", "newer", "slow", "tens", "lower", "newest"];
    let expected: Vec<Vec<Token>> = words
        .iter()
        .map(|w| tokenizer.merge_word(w).unwrap())
        .map(|w| tokenizer.word_to_tokens(&w).unwrap())
        .collect();

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..50 {
                    for (word, expected) in words.iter().zip(&expected) {
                        assert_eq!(&tokenizer.tokenize(word).unwrap(), expected);
                    }
                }
            });
        }
    });

    let batch = tokenizer.tokenize_batch(&words).unwrap();
    assert_eq!(batch, expected);
}

#[test]
fn test_decode_with_suffix() {
    let tokenizer = Tokenizer::builder()
        .vocab_and_merges(
            [("h", 1), ("i</w>", 2), ("hi</w>", 3)],
            [("h", "i</w>")],
        )
        .end_of_word_suffix("</w>")
        .build()
        .unwrap();

    let ids: Vec<u32> = ["hi", "hi"]
        .iter()
        .flat_map(|w| tokenizer.tokenize(w).unwrap())
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![3, 3]);
    assert_eq!(tokenizer.decode(&ids).unwrap(), "hi hi");
}
