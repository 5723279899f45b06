//! Random invite code generator

use rand::Rng;

use super::INVITE_CHARS;
use crate::error::Result;

/// Generator for random candidate codes
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    chars: Vec<char>,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator {
    /// Create a generator over the 62-character invite alphabet
    pub fn new() -> Self {
        Self {
            chars: INVITE_CHARS.to_vec(),
        }
    }

    /// Create a generator over a custom alphabet
    pub fn with_charset(chars: impl IntoIterator<Item = char>) -> Result<Self> {
        let chars: Vec<char> = chars.into_iter().collect();
        if chars.is_empty() {
            return Err(crate::validation_error!("code alphabet must not be empty"));
        }
        Ok(Self { chars })
    }

    /// Alphabet in use
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Generate `n` codes with lengths drawn from `[min_length, max_length)`
    pub fn generate_codes(&self, n: usize, min_length: usize, max_length: usize) -> Result<Vec<String>> {
        self.generate_codes_with(&mut rand::thread_rng(), n, min_length, max_length)
    }

    /// Same as [`generate_codes`](Self::generate_codes) with a caller-supplied random source
    pub fn generate_codes_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n: usize,
        min_length: usize,
        max_length: usize,
    ) -> Result<Vec<String>> {
        if max_length <= min_length {
            return Err(crate::validation_error!(
                "max_length ({}) must be greater than min_length ({})",
                max_length,
                min_length
            ));
        }

        let codes = (0..n)
            .map(|_| {
                let length = rng.gen_range(min_length..max_length);
                (0..length)
                    .map(|_| self.chars[rng.gen_range(0..self.chars.len())])
                    .collect::<String>()
            })
            .collect();

        Ok(codes)
    }
}
