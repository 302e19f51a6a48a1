//! Random key value generation.
//!
//! Values are drawn uniformly from 36 symbols (`A-Z`, `0-9`). At the default
//! length of 16 that is about 82.7 bits of entropy.

use rand::Rng;

/// Symbols a generated key may contain.
pub const KEY_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Source of fresh key values.
pub trait KeyGenerator: Send + Sync {
    /// Produce a new key value of `length` characters.
    fn generate(&self, length: usize) -> String;
}

/// Generator backed by the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomKeyGenerator;

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self, length: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())] as char)
            .collect()
    }
}

/// Whether `value` only uses characters from [`KEY_ALPHABET`].
pub fn is_alphabet_only(value: &str) -> bool {
    value.bytes().all(|b| KEY_ALPHABET.contains(&b))
}

/// Scripted generator for deterministic tests.
///
/// Hands out the given values in order and keeps repeating the last one once
/// the script runs out. The requested length is ignored.
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug)]
pub struct SequenceGenerator {
    values: Vec<String>,
    next: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-seams"))]
impl SequenceGenerator {
    /// Create a generator that yields `values` in order.
    ///
    /// # Panics
    /// Panics if `values` is empty.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        assert!(!values.is_empty(), "SequenceGenerator needs at least one value");
        Self {
            values,
            next: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Number of values handed out so far.
    pub fn calls(&self) -> usize {
        self.next.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl KeyGenerator for SequenceGenerator {
    fn generate(&self, _length: usize) -> String {
        let i = self.next.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.values[i.min(self.values.len() - 1)].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn random_values_have_requested_length_and_alphabet() {
        let generator = RandomKeyGenerator;
        for length in [1, 8, 16, 64] {
            let value = generator.generate(length);
            assert_eq!(value.len(), length);
            assert!(is_alphabet_only(&value), "unexpected symbol in {value}");
        }
    }

    #[test]
    fn random_values_do_not_repeat() {
        let generator = RandomKeyGenerator;
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(generator.generate(16)));
        }
    }

    #[test]
    fn random_values_cover_the_alphabet() {
        let generator = RandomKeyGenerator;
        let mut symbols = HashSet::new();
        for _ in 0..500 {
            symbols.extend(generator.generate(16).bytes());
        }
        assert_eq!(symbols.len(), KEY_ALPHABET.len());
    }

    #[test]
    fn alphabet_check_rejects_lowercase() {
        assert!(is_alphabet_only("ABC123"));
        assert!(!is_alphabet_only("abc123"));
        assert!(!is_alphabet_only("ABC-123"));
    }

    #[test]
    fn sequence_generator_replays_script() {
        let generator = SequenceGenerator::new(["AAAA", "BBBB"]);
        assert_eq!(generator.generate(16), "AAAA");
        assert_eq!(generator.generate(16), "BBBB");
        assert_eq!(generator.generate(16), "BBBB");
        assert_eq!(generator.calls(), 3);
    }
}
