//! Password hashing built on the scrypt memory-hard KDF, with a
//! self-describing `$sN$` text envelope so stored hashes carry their own
//! work factors, salt and format version.
#![deny(
    dead_code,
    deprecated,
    future_incompatible,
    missing_copy_implementations,
    missing_debug_implementations,
    nonstandard_style,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::inline_always
)]

mod ct;
mod encoder;
mod envelope;
mod error;
mod params;
mod pbkdf2;
mod romix;
mod salsa;

pub use encoder::{Encoder, DK_LEN, SALT_LEN};
pub use envelope::{Envelope, Version};
pub use error::Error;
pub use params::Params;
use pbkdf2::pbkdf2;
use zeroize::Zeroize;

/// The scrypt key derivation function.
///
/// Fills `output` (any non-empty length up to (2^32 − 1)·32 bytes) from
/// `password` and `salt` under the work factors in `params`. The envelope
/// layer always asks for 32 bytes; the full range exists for callers that
/// use the KDF directly. Transient buffers are zeroed before return.
pub fn scrypt(
    password: &[u8],
    salt: &[u8],
    params: &Params,
    output: &mut [u8],
) -> Result<(), Error> {
    if output.is_empty() || output.len() / 32 > 0xffff_ffff {
        return Err(Error::InvalidParameter("bad derived key length"));
    }
    let n = params.n() as usize;
    let r128 = params.r() as usize * 128;
    let mut b = zeroed(params.p() as usize * r128)?;
    pbkdf2(password, salt, 1, &mut b);
    let mut v = zeroed::<u32>(n * r128 / 4)?;
    let mut xy = zeroed::<u32>(r128 / 2)?;
    for chunk in b.chunks_mut(r128) {
        romix::scrypt_ro_mix(chunk, &mut v, &mut xy, n);
    }
    pbkdf2(password, &b, 1, output);
    b.zeroize();
    v.zeroize();
    xy.zeroize();
    Ok(())
}

// The table allocation is the one place this crate can reasonably run out
// of memory, so it is made fallible instead of aborting.
fn zeroed<T: Clone + Default>(len: usize) -> Result<Vec<T>, Error> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| Error::OutOfMemory)?;
    buf.resize(len, T::default());
    Ok(buf)
}
