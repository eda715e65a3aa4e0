use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// PBKDF2 with HMAC-SHA256 as the PRF (RFC 2898). The key schedule is
/// built from `password` once and cloned for every block and round; the
/// scrypt driver calls this with a single round on both sides of ROMix.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub fn pbkdf2(password: &[u8], salt: &[u8], rounds: u32, res: &mut [u8]) {
    let mac = HmacSha256::new_from_slice(password).expect("hmac-sha256 takes keys of any length");
    for (i, chunk) in res.chunks_mut(32).enumerate() {
        inner(i as u32, chunk, &mac, salt, rounds);
    }
}

#[inline(always)]
fn inner(i: u32, chunk: &mut [u8], mac: &HmacSha256, salt: &[u8], rounds: u32) {
    let mut prf = mac.clone();
    prf.update(salt);
    prf.update(&(i + 1).to_be_bytes());
    let mut prev = prf.finalize().into_bytes();
    chunk.copy_from_slice(&prev[..chunk.len()]);
    for _ in 1..rounds {
        let mut prf = mac.clone();
        prf.update(&prev);
        prev = prf.finalize().into_bytes();
        for (out, u) in chunk.iter_mut().zip(prev.iter()) {
            *out ^= u;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_encoding::HEXLOWER;

    fn check(password: &[u8], salt: &[u8], rounds: u32, expected_hex: &[u8]) {
        let expected = HEXLOWER.decode(expected_hex).unwrap();
        let mut out = vec![0; expected.len()];
        pbkdf2(password, salt, rounds, &mut out);
        assert_eq!(out, expected);
    }

    // RFC 7914 section 11
    #[test]
    fn rfc7914_single_round() {
        check(
            b"passwd",
            b"salt",
            1,
            b"55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc\
              49ca9cccf179b645991664b39d77ef317c71b845b1e30bd509112041d3a19783",
        );
    }

    #[test]
    fn rfc7914_many_rounds() {
        check(
            b"Password",
            b"NaCl",
            80000,
            b"4ddcd8f60b98be21830cee5ef22701f9641a4418d04c0414aeff08876b34ab56\
              a1d425a1225833549adb841b51c9b3176a272bdebba1d078478f62b397f33c8d",
        );
    }

    #[test]
    fn truncates_to_the_requested_length() {
        let mut long = [0; 40];
        let mut short = [0; 17];
        pbkdf2(b"pw", b"salt", 3, &mut long);
        pbkdf2(b"pw", b"salt", 3, &mut short);
        assert_eq!(long[..17], short);
    }
}
