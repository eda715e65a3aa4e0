use crate::salsa::salsa20_8;

/// ROMix over one 128·r-byte slice of `B`.
///
/// `v` is the N-cell table (32·r words per cell) and `xy` the two-cell
/// scratch region. Both must be sized by the caller; the parameter guard
/// has already bounded them. `n` is a power of two for every envelope the
/// encoder emits, and the mask below stays in range even for legacy
/// envelopes where it is not.
#[allow(clippy::many_single_char_names)]
pub fn scrypt_ro_mix(b: &mut [u8], v: &mut [u32], xy: &mut [u32], n: usize) {
    let words = b.len() / 4;
    let (x, y) = xy.split_at_mut(words);
    for (word, chunk) in x.iter_mut().zip(b.chunks_exact(4)) {
        *word = u32::from_le_bytes(chunk.try_into().unwrap());
    }
    for cell in v.chunks_exact_mut(words) {
        cell.copy_from_slice(x);
        block_mix(cell, x);
    }
    for _ in 0..n {
        let j = integerify(x, n);
        let cell = &v[j * words..(j + 1) * words];
        for ((out, lhs), rhs) in y.iter_mut().zip(x.iter()).zip(cell) {
            *out = lhs ^ rhs;
        }
        block_mix(y, x);
    }
    for (chunk, word) in b.chunks_exact_mut(4).zip(x.iter()) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
}

// One mixing pass over 32·r words: even-indexed outputs land in the first
// half, odd-indexed ones in the second.
fn block_mix(input: &[u32], output: &mut [u32]) {
    let mut x = [0; 16];
    x.copy_from_slice(&input[input.len() - 16..]);
    let half = input.len() / 2;
    for (i, chunk) in input.chunks_exact(16).enumerate() {
        for (word, mixed) in x.iter_mut().zip(chunk) {
            *word ^= mixed;
        }
        salsa20_8(&mut x);
        let pos = if i % 2 == 0 {
            i / 2 * 16
        } else {
            i / 2 * 16 + half
        };
        output[pos..pos + 16].copy_from_slice(&x);
    }
}

// The first two words of the last 64-byte sub-block, read as a 64-bit
// little-endian integer and reduced mod n.
#[allow(clippy::cast_possible_truncation)]
fn integerify(x: &[u32], n: usize) -> usize {
    let base = x.len() - 16;
    let t = u64::from(x[base + 1]) << 32 | u64::from(x[base]);
    (t & (n as u64 - 1)) as usize
}
