//! Canonical Huffman tables for the 17 lossless-JPEG magnitude categories.
//!
//! Tables are built from a category histogram with the procedure of
//! ITU T.81 Annex K.2: code sizes from repeated merging of the two least
//! frequent entries, length limiting to 16 bits, then canonical code
//! assignment (Annex C). One extra symbol with frequency 1 is reserved while
//! sizing so that no real codeword consists of only 1-bits.

use crate::image_pipeline::lossless::category::CATEGORY_COUNT;

/// Longest codeword allowed in a DHT segment.
pub const MAX_CODE_LENGTH: usize = 16;

/// Symbols taking part in code sizing: the categories plus the reserved one.
const SIZING_SYMBOLS: usize = CATEGORY_COUNT + 1;

/// Upper bound on code sizes before length limiting.
const MAX_UNLIMITED_LENGTH: usize = 32;

/// Codeword for one category.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HuffCode {
    /// Codeword length in bits; 0 means the category has no code
    pub len: u8,
    /// Codeword, right-aligned
    pub code: u16,
}

/// Huffman table for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: [HuffCode; CATEGORY_COUNT],
    /// `bits[i]` is the number of codes of length `i + 1`
    bits: [u8; MAX_CODE_LENGTH],
    /// Categories in order of increasing code length
    huffval: Vec<u8>,
}

impl CodeTable {
    /// Builds the table for a category histogram. Categories with a zero
    /// count get no code. An all-zero histogram gives an empty table.
    pub fn from_frequencies(freq: &[u64; CATEGORY_COUNT]) -> Self {
        let sizes = code_sizes(freq);
        let huffval = sort_by_size(&sizes);
        let bits = count_bits(&sizes);

        let mut codes = [HuffCode::default(); CATEGORY_COUNT];
        let mut code: u32 = 0;
        let mut k = 0;
        for (len_index, &count) in bits.iter().enumerate() {
            let len = len_index + 1;
            for _ in 0..count {
                codes[huffval[k] as usize] = HuffCode { len: len as u8, code: code as u16 };
                code += 1;
                k += 1;
            }
            code <<= 1;
        }

        Self { codes, bits, huffval }
    }

    /// Codeword for `category`.
    #[inline]
    pub fn code(&self, category: u8) -> HuffCode {
        self.codes[category as usize]
    }

    pub fn codes(&self) -> &[HuffCode; CATEGORY_COUNT] {
        &self.codes
    }

    /// Code counts per length, as serialized in a DHT segment.
    pub fn bits(&self) -> &[u8; MAX_CODE_LENGTH] {
        &self.bits
    }

    /// Symbol list, as serialized in a DHT segment.
    pub fn huffval(&self) -> &[u8] {
        &self.huffval
    }

    pub fn is_empty(&self) -> bool {
        self.huffval.is_empty()
    }
}

/// Annex K.1: code size of every symbol, reserved symbol last.
fn code_sizes(freq: &[u64; CATEGORY_COUNT]) -> [usize; SIZING_SYMBOLS] {
    let mut freq_work = [0u64; SIZING_SYMBOLS];
    freq_work[..CATEGORY_COUNT].copy_from_slice(freq);
    freq_work[CATEGORY_COUNT] = 1;

    let mut sizes = [0usize; SIZING_SYMBOLS];
    let mut others: [Option<usize>; SIZING_SYMBOLS] = [None; SIZING_SYMBOLS];

    loop {
        let Some(v1) = least_frequent(&freq_work, None) else { break };
        let Some(v2) = least_frequent(&freq_work, Some(v1)) else { break };

        freq_work[v1] += freq_work[v2];
        freq_work[v2] = 0;

        let mut node = v1;
        sizes[node] += 1;
        while let Some(next) = others[node] {
            node = next;
            sizes[node] += 1;
        }
        others[node] = Some(v2);

        let mut node = v2;
        sizes[node] += 1;
        while let Some(next) = others[node] {
            node = next;
            sizes[node] += 1;
        }
    }
    sizes
}

/// Smallest nonzero frequency, ties resolved toward the larger symbol.
fn least_frequent(freq: &[u64; SIZING_SYMBOLS], exclude: Option<usize>) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (symbol, &f) in freq.iter().enumerate() {
        if f == 0 || Some(symbol) == exclude {
            continue;
        }
        if best.is_none_or(|b| f <= freq[b]) {
            best = Some(symbol);
        }
    }
    best
}

/// Annex K.2 / K.3: codes per length, limited to 16 bits, with the reserved
/// code point removed.
fn count_bits(sizes: &[usize; SIZING_SYMBOLS]) -> [u8; MAX_CODE_LENGTH] {
    let mut bits = [0u32; MAX_UNLIMITED_LENGTH + 1];
    for &size in sizes.iter().filter(|&&s| s > 0) {
        bits[size] += 1;
    }

    let mut i = MAX_UNLIMITED_LENGTH;
    while i > MAX_CODE_LENGTH {
        if bits[i] > 0 {
            let mut j = i - 2;
            while bits[j] == 0 {
                j -= 1;
            }
            bits[i] -= 2;
            bits[i - 1] += 1;
            bits[j + 1] += 2;
            bits[j] -= 1;
        } else {
            i -= 1;
        }
    }

    if let Some(longest) = (1..=MAX_CODE_LENGTH).rev().find(|&len| bits[len] > 0) {
        bits[longest] -= 1;
    }

    let mut limited = [0u8; MAX_CODE_LENGTH];
    for (len_index, slot) in limited.iter_mut().enumerate() {
        *slot = bits[len_index + 1] as u8;
    }
    limited
}

/// Annex K.4: categories in order of code size, then category value.
fn sort_by_size(sizes: &[usize; SIZING_SYMBOLS]) -> Vec<u8> {
    let mut huffval = Vec::with_capacity(CATEGORY_COUNT);
    for len in 1..=MAX_UNLIMITED_LENGTH {
        for (category, &size) in sizes[..CATEGORY_COUNT].iter().enumerate() {
            if size == len {
                huffval.push(category as u8);
            }
        }
    }
    huffval
}
