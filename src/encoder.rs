use crate::{ct, envelope::Envelope, error::Error, params::Params, scrypt};
use rand_core::{CryptoRng, OsRng, RngCore};

/// Salt length for newly produced envelopes. Verification accepts
/// whatever length the parsed envelope carries.
pub const SALT_LEN: usize = 32;

/// Derived key length; fixed for the envelope even though the underlying
/// [`scrypt`] driver can produce arbitrary lengths.
pub const DK_LEN: usize = 32;

/// Produces and verifies self-describing password hash envelopes.
///
/// The salt source is injected at construction; [`OsRng`] is the default
/// and is safe to share across threads. Anything implementing
/// [`RngCore`] + [`CryptoRng`] can stand in for it.
#[derive(Debug)]
pub struct Encoder<R = OsRng> {
    params: Params,
    rng: R,
}

impl Encoder<OsRng> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(Params::recommended())
    }

    #[must_use]
    pub const fn with_params(params: Params) -> Self {
        Self {
            params,
            rng: OsRng,
        }
    }
}

impl Default for Encoder<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> Encoder<R> {
    pub const fn with_rng(params: Params, rng: R) -> Self {
        Self { params, rng }
    }

    /// Hashes `password` under the configured work factors with a fresh
    /// 32-byte salt and returns the v2 envelope.
    pub fn encode(&mut self, password: &str) -> Result<String, Error> {
        if password.is_empty() {
            return Err(Error::InvalidArgument("password must not be empty"));
        }
        let mut salt = [0; SALT_LEN];
        self.rng
            .try_fill_bytes(&mut salt)
            .map_err(|_| Error::InvalidArgument("salt source produced no bytes"))?;
        let mut dk = [0; DK_LEN];
        scrypt(password.as_bytes(), &salt, &self.params, &mut dk)?;
        Ok(Envelope::v2(self.params, salt.to_vec(), dk.to_vec()).to_string())
    }

    /// Re-derives under the parameters, salt and version carried by
    /// `hashed` and compares the re-emitted envelope against the stored
    /// one in constant time. Comparing the formatted strings rather than
    /// the raw keys also pins the parameters and salt.
    ///
    /// Structural or parameter problems in `hashed` surface as errors so
    /// a wrong password is distinguishable from a corrupt stored hash.
    pub fn compare(&self, password: &str, hashed: &str) -> Result<bool, Error> {
        if password.is_empty() {
            return Err(Error::InvalidArgument("password must not be empty"));
        }
        let parsed = Envelope::parse(hashed)?;
        let params = parsed.params()?;
        let mut dk = [0; DK_LEN];
        scrypt(password.as_bytes(), parsed.salt(), &params, &mut dk)?;
        let derived = parsed.with_dk(dk.to_vec()).to_string();
        Ok(ct::eq(derived.as_bytes(), hashed.as_bytes()))
    }

    /// Structural validity of `hashed`; never errors.
    #[must_use]
    pub fn is_valid(&self, hashed: &str) -> bool {
        Envelope::is_valid(hashed)
    }
}
