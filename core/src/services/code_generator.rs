//! One-time code generation

use rand::{rngs::OsRng, Rng};

use crate::domain::entities::{VerificationCode, CODE_ALPHABET, CODE_LENGTH};

/// Produces one-time verification codes
pub trait CodeGenerator: Send + Sync {
    /// Generate a fresh code. Infallible and free of side effects.
    fn generate(&self) -> VerificationCode;
}

/// Draws each of the six letters independently and uniformly from `A`-`Z`
/// using the operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl RandomCodeGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> VerificationCode {
        let mut rng = OsRng;
        // gen_range samples without modulo bias
        VerificationCode::from_alphabet_indices(
            (0..CODE_LENGTH).map(|_| rng.gen_range(0..CODE_ALPHABET.len())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE_SIZE: usize = 10_000;

    #[test]
    fn test_generated_codes_are_well_formed() {
        let generator = RandomCodeGenerator::new();
        for _ in 0..1_000 {
            let code = generator.generate();
            assert_eq!(code.as_str().len(), CODE_LENGTH);
            assert!(code.as_str().bytes().all(|b| b.is_ascii_uppercase()));
            assert!(VerificationCode::is_well_formed(code.as_str()));
        }
    }

    #[test]
    fn test_no_code_dominates_the_sample() {
        let generator = RandomCodeGenerator::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..SAMPLE_SIZE {
            *counts.entry(generator.generate().as_str().to_string()).or_default() += 1;
        }

        let max = counts.values().copied().max().unwrap_or(0);
        // 26^6 possible codes; a handful of collisions at most
        assert!(max <= 3, "a single code appeared {} times", max);
        assert!(counts.len() > SAMPLE_SIZE * 99 / 100);
    }

    #[test]
    fn test_letter_frequencies_are_roughly_uniform() {
        let generator = RandomCodeGenerator::new();
        let mut counts = [0usize; 26];
        for _ in 0..SAMPLE_SIZE {
            for b in generator.generate().as_str().bytes() {
                counts[(b - b'A') as usize] += 1;
            }
        }

        // Expected ~2308 per letter, standard deviation ~47
        let expected = SAMPLE_SIZE * CODE_LENGTH / 26;
        for (i, count) in counts.iter().enumerate() {
            assert!(
                *count > expected * 8 / 10 && *count < expected * 12 / 10,
                "letter {} appeared {} times, expected about {}",
                (b'A' + i as u8) as char,
                count,
                expected
            );
        }
    }
}
