//! Deterministic, salted shortcode encoding.
//!
//! Maps counter values to short alphanumeric codes and back. The mapping is a
//! bijection between `u64` values and the codes [`CodeEncoder::encode`] produces:
//!
//! - The **alphabet** (base-62 by default) is permuted by the **salt** with a
//!   consistent shuffle, so two deployments with different salts hand out
//!   different codes for the same counter value.
//! - Each digit position additionally rotates the permuted alphabet by a
//!   salt-derived step, which keeps padded codes from looking like runs of the
//!   same symbol.
//! - Codes shorter than the **minimum length** are left-padded with zero digits.
//!   Padding never changes the decoded value, and [`CodeEncoder::decode`]
//!   rejects any code that `encode` would not have produced.
//!
//! Ambiguous glyphs (`0`/`O`, `1`/`l`) are not excluded from the default
//! alphabet.

/// Default base-62 alphabet.
pub const DEFAULT_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// Smallest alphabet accepted by [`CodeEncoder::new`].
pub const MIN_ALPHABET_LENGTH: usize = 16;

/// Largest minimum length accepted by [`CodeEncoder::new`].
pub const MAX_MIN_LENGTH: usize = 64;

/// Default minimum code length.
pub const DEFAULT_MIN_LENGTH: usize = 7;

/// Errors raised by encoder construction or by encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("alphabet must contain at least {min} symbols, got {0}", min = MIN_ALPHABET_LENGTH)]
    AlphabetTooShort(usize),

    #[error("alphabet contains duplicate symbol '{0}'")]
    DuplicateSymbol(char),

    #[error("alphabet symbol {0:?} is not allowed (use ASCII letters, digits, '-' or '_')")]
    InvalidSymbol(char),

    #[error("minimum length {0} exceeds the maximum of {max}", max = MAX_MIN_LENGTH)]
    MinLengthTooLarge(usize),

    #[error("cannot encode negative id {0}")]
    NegativeId(i64),

    #[error("code is empty")]
    EmptyCode,

    #[error("symbol {0:?} is not part of the alphabet")]
    UnknownSymbol(char),

    #[error("code exceeds the supported id range")]
    Overflow,

    #[error("code is not in canonical form")]
    NonCanonical,
}

/// Salted integer-to-shortcode encoder.
///
/// Immutable after construction, so a single instance can be shared across
/// request tasks behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct CodeEncoder {
    alphabet: Vec<u8>,
    index: [Option<u8>; 128],
    min_length: usize,
    step: usize,
}

impl CodeEncoder {
    /// Builds an encoder from an alphabet, a salt and a minimum output length.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::InvalidSymbol`] for symbols other than ASCII letters,
    ///   digits, `-` and `_`
    /// - [`EncodeError::DuplicateSymbol`] if a symbol repeats
    /// - [`EncodeError::AlphabetTooShort`] for fewer than [`MIN_ALPHABET_LENGTH`] symbols
    /// - [`EncodeError::MinLengthTooLarge`] if `min_length > MAX_MIN_LENGTH`
    pub fn new(alphabet: &str, salt: &str, min_length: usize) -> Result<Self, EncodeError> {
        if min_length > MAX_MIN_LENGTH {
            return Err(EncodeError::MinLengthTooLarge(min_length));
        }

        let mut symbols: Vec<u8> = Vec::with_capacity(alphabet.len());
        for ch in alphabet.chars() {
            if !(ch.is_ascii_alphanumeric() || ch == '-' || ch == '_') {
                return Err(EncodeError::InvalidSymbol(ch));
            }
            if symbols.contains(&(ch as u8)) {
                return Err(EncodeError::DuplicateSymbol(ch));
            }
            symbols.push(ch as u8);
        }

        if symbols.len() < MIN_ALPHABET_LENGTH {
            return Err(EncodeError::AlphabetTooShort(symbols.len()));
        }

        consistent_shuffle(&mut symbols, salt.as_bytes());

        let mut index = [None; 128];
        for (i, &symbol) in symbols.iter().enumerate() {
            index[symbol as usize] = Some(i as u8);
        }

        let step = position_step(salt.as_bytes(), symbols.len());

        Ok(Self {
            alphabet: symbols,
            index,
            min_length,
            step,
        })
    }

    /// Builds an encoder with the default alphabet and minimum length.
    pub fn with_salt(salt: &str) -> Result<Self, EncodeError> {
        Self::new(DEFAULT_ALPHABET, salt, DEFAULT_MIN_LENGTH)
    }

    /// Returns the configured minimum output length.
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Encodes `id` as a shortcode of at least [`Self::min_length`] symbols.
    pub fn encode(&self, id: u64) -> String {
        let base = self.alphabet.len() as u64;

        let mut digits = Vec::with_capacity(self.min_length.max(12));
        let mut rest = id;
        loop {
            digits.push((rest % base) as usize);
            rest /= base;
            if rest == 0 {
                break;
            }
        }
        digits.resize(digits.len().max(self.min_length), 0);

        digits
            .iter()
            .enumerate()
            .rev()
            .map(|(position, &digit)| self.symbol_at(position, digit) as char)
            .collect()
    }

    /// Decodes a shortcode back into the id it was produced from.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::EmptyCode`] for an empty string
    /// - [`EncodeError::UnknownSymbol`] if a symbol is not in the alphabet
    /// - [`EncodeError::Overflow`] if the value does not fit into `u64`
    /// - [`EncodeError::NonCanonical`] if `encode` would not produce `code`
    pub fn decode(&self, code: &str) -> Result<u64, EncodeError> {
        if code.is_empty() {
            return Err(EncodeError::EmptyCode);
        }

        let n = self.alphabet.len();
        let len = code.chars().count();
        let mut value: u64 = 0;

        for (i, ch) in code.chars().enumerate() {
            let index = self.index_of(ch).ok_or(EncodeError::UnknownSymbol(ch))?;
            let position = len - 1 - i;
            let digit = (index + n - self.offset(position)) % n;

            value = value
                .checked_mul(n as u64)
                .and_then(|v| v.checked_add(digit as u64))
                .ok_or(EncodeError::Overflow)?;
        }

        if self.encode(value) != code {
            return Err(EncodeError::NonCanonical);
        }

        Ok(value)
    }

    fn symbol_at(&self, position: usize, digit: usize) -> u8 {
        self.alphabet[(digit + self.offset(position)) % self.alphabet.len()]
    }

    fn offset(&self, position: usize) -> usize {
        let n = self.alphabet.len();
        (position % n) * self.step % n
    }

    fn index_of(&self, ch: char) -> Option<usize> {
        if !ch.is_ascii() {
            return None;
        }
        self.index[ch as usize].map(usize::from)
    }
}

/// Salt-driven permutation of the alphabet. Identity for an empty salt.
fn consistent_shuffle(symbols: &mut [u8], salt: &[u8]) {
    if salt.is_empty() {
        return;
    }

    let mut v = 0;
    let mut p = 0;
    for i in (1..symbols.len()).rev() {
        v %= salt.len();
        let n = salt[v] as usize;
        p += n;
        let j = (n + v + p) % i;
        symbols.swap(i, j);
        v += 1;
    }
}

/// Per-position rotation step in `1..alphabet_len`.
fn position_step(salt: &[u8], alphabet_len: usize) -> usize {
    let hash = salt
        .iter()
        .fold(0usize, |acc, &b| acc.wrapping_mul(31).wrapping_add(b as usize));
    1 + hash % (alphabet_len - 1)
}
