const STATE_WORDS: usize = 16;
const DOUBLE_ROUNDS: usize = 4;

/// Salsa20/8: the 8-round Salsa20 core used as the block hash inside
/// BlockMix. Operates on sixteen little-endian words in place; the
/// byte-to-word boundary belongs to the caller.
pub fn salsa20_8(block: &mut [u32; STATE_WORDS]) {
    let mut x = *block;
    for _ in 0..DOUBLE_ROUNDS {
        quarter_round(0, 4, 8, 12, &mut x);
        quarter_round(5, 9, 13, 1, &mut x);
        quarter_round(10, 14, 2, 6, &mut x);
        quarter_round(15, 3, 7, 11, &mut x);
        quarter_round(0, 1, 2, 3, &mut x);
        quarter_round(5, 6, 7, 4, &mut x);
        quarter_round(10, 11, 8, 9, &mut x);
        quarter_round(15, 12, 13, 14, &mut x);
    }
    for (out, mixed) in block.iter_mut().zip(x.iter()) {
        *out = out.wrapping_add(*mixed);
    }
}

#[inline]
const fn quarter_round(a: usize, b: usize, c: usize, d: usize, state: &mut [u32; STATE_WORDS]) {
    state[b] ^= state[a].wrapping_add(state[d]).rotate_left(7);
    state[c] ^= state[b].wrapping_add(state[a]).rotate_left(9);
    state[d] ^= state[c].wrapping_add(state[b]).rotate_left(13);
    state[a] ^= state[d].wrapping_add(state[c]).rotate_left(18);
}
