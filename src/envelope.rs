use crate::{error::Error, params::Params};
use data_encoding::BASE64;
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// Deprecated packed-hex format, accepted for verification only. Its
    /// parameters are not held to the power-of-two check.
    V0,
    /// Deprecated packed-hex format, accepted for verification only.
    V1,
    /// The current format; the only one `encode` emits.
    V2,
}

/// A parsed hash string.
///
/// The envelope is self-contained: version, work factors, salt and
/// derived key all travel inside the string, so verification needs
/// nothing but the password candidate. Values are immutable once parsed
/// or built; re-displaying one reproduces a canonical envelope in its own
/// version's format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    version: Version,
    n: u32,
    r: u32,
    p: u32,
    salt: Vec<u8>,
    dk: Vec<u8>,
}

impl Envelope {
    pub(crate) fn v2(params: Params, salt: Vec<u8>, dk: Vec<u8>) -> Self {
        Self {
            version: Version::V2,
            n: params.n(),
            r: params.r(),
            p: params.p(),
            salt,
            dk,
        }
    }

    pub fn parse(hashed: &str) -> Result<Self, Error> {
        let fields: Vec<&str> = hashed.split('$').collect();
        if fields.len() < 2 || !fields[0].is_empty() {
            return Err(Error::InvalidEnvelope("expected a leading `$`"));
        }
        let (version, count) = match fields[1] {
            "s0" => (Version::V0, 5),
            "s1" => (Version::V1, 5),
            "s2" => (Version::V2, 7),
            _ => return Err(Error::InvalidEnvelope("unrecognised version tag")),
        };
        if fields.len() != count {
            return Err(Error::InvalidEnvelope("wrong field count"));
        }
        let (n, r, p, salt_field, dk_field) = if version == Version::V2 {
            (
                parse_decimal(fields[2])?,
                parse_decimal(fields[3])?,
                parse_decimal(fields[4])?,
                fields[5],
                fields[6],
            )
        } else {
            // N<<16 | r<<8 | p, lowercase hex. The historical v0 encoder
            // packed N itself here, the same as v1.
            let packed = u32::from_str_radix(fields[2], 16)
                .map_err(|_| Error::InvalidEnvelope("bad packed parameter field"))?;
            (
                packed >> 16,
                packed >> 8 & 0xff,
                packed & 0xff,
                fields[3],
                fields[4],
            )
        };
        let salt = BASE64
            .decode(salt_field.as_bytes())
            .map_err(|_| Error::InvalidEnvelope("bad base64 in the salt field"))?;
        let dk = BASE64
            .decode(dk_field.as_bytes())
            .map_err(|_| Error::InvalidEnvelope("bad base64 in the derived key field"))?;
        Ok(Self {
            version,
            n,
            r,
            p,
            salt,
            dk,
        })
    }

    /// Structural acceptance check: leading empty field, an `sN` version
    /// tag, and the field count that version demands. Never errors and
    /// decodes nothing.
    #[must_use]
    pub fn is_valid(hashed: &str) -> bool {
        let fields: Vec<&str> = hashed.split('$').collect();
        if fields.len() < 2 || !fields[0].is_empty() {
            return false;
        }
        let tag = fields[1].as_bytes();
        if tag.len() != 2 || tag[0] != b's' {
            return false;
        }
        match tag[1] {
            b'0' | b'1' => fields.len() == 5,
            b'2' => fields.len() == 7,
            _ => false,
        }
    }

    /// The embedded work factors, run through the guard appropriate to
    /// this envelope's version. Called before any table allocation.
    pub fn params(&self) -> Result<Params, Error> {
        match self.version {
            Version::V0 => Params::new_legacy(self.n, self.r, self.p),
            Version::V1 | Version::V2 => Params::new(self.n, self.r, self.p),
        }
    }

    pub(crate) fn with_dk(&self, dk: Vec<u8>) -> Self {
        Self {
            version: self.version,
            n: self.n,
            r: self.r,
            p: self.p,
            salt: self.salt.clone(),
            dk,
        }
    }

    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    #[must_use]
    pub const fn n(&self) -> u32 {
        self.n
    }

    #[must_use]
    pub const fn r(&self) -> u32 {
        self.r
    }

    #[must_use]
    pub const fn p(&self) -> u32 {
        self.p
    }

    #[must_use]
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    #[must_use]
    pub fn dk(&self) -> &[u8] {
        &self.dk
    }
}

impl Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            Version::V2 => write!(
                f,
                "$s2${}${}${}${}${}",
                self.n,
                self.r,
                self.p,
                BASE64.encode(&self.salt),
                BASE64.encode(&self.dk)
            ),
            Version::V0 | Version::V1 => {
                let tag = if self.version == Version::V0 { "s0" } else { "s1" };
                let packed = self.n << 16 | self.r << 8 | self.p;
                write!(
                    f,
                    "${tag}${packed:x}${}${}",
                    BASE64.encode(&self.salt),
                    BASE64.encode(&self.dk)
                )
            }
        }
    }
}

fn parse_decimal(field: &str) -> Result<u32, Error> {
    field
        .parse()
        .map_err(|_| Error::InvalidEnvelope("bad decimal parameter field"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const V1_ENVELOPE: &str =
        "$s1$40000801$5ScyYcGbFmSF5P+A64cThg+c6rFtsfyxDHkWWCt97xI=$U+7EMhBXHjNHudmn/sgvX4VZ6ddoSKLkL0nDOSKYLaQ=";

    #[test]
    fn accepts_each_version_shape() {
        assert!(Envelope::is_valid(V1_ENVELOPE));
        assert!(Envelope::is_valid("$s0$40000801$AAAA$BBBB"));
        assert!(Envelope::is_valid("$s2$16384$8$1$AAAA$BBBB"));
    }

    #[test]
    fn rejects_foreign_shapes() {
        assert!(!Envelope::is_valid(""));
        assert!(!Envelope::is_valid("$e1$adasdasd$asdasdsd"));
        assert!(!Envelope::is_valid("$s3$16384$8$1$AAAA$BBBB"));
        assert!(!Envelope::is_valid("s2$16384$8$1$AAAA$BBBB"));
        assert!(!Envelope::is_valid("x$s2$16384$8$1$AAAA$BBBB"));
        // field counts swapped between the formats
        assert!(!Envelope::is_valid("$s2$40000801$AAAA$BBBB"));
        assert!(!Envelope::is_valid("$s1$16384$8$1$AAAA$BBBB"));
    }

    #[test]
    fn unpacks_legacy_parameters() {
        let envelope = Envelope::parse(V1_ENVELOPE).unwrap();
        assert_eq!(envelope.version(), Version::V1);
        assert_eq!(envelope.n(), 16384);
        assert_eq!(envelope.r(), 8);
        assert_eq!(envelope.p(), 1);
        assert_eq!(envelope.salt().len(), 32);
        assert_eq!(envelope.dk().len(), 32);
    }

    #[test]
    fn legacy_round_trips_byte_for_byte() {
        let envelope = Envelope::parse(V1_ENVELOPE).unwrap();
        assert_eq!(envelope.to_string(), V1_ENVELOPE);
    }

    #[test]
    fn v2_round_trips_byte_for_byte() {
        let hashed = "$s2$16384$8$1$VGhpcnR5LXR3byBieXRlcyBvZiBzYWx0IHBhZGRpbmc=$VGhpcnR5LXR3byBieXRlcyBvZiBrZXkgcGFkZGluZy4=";
        let envelope = Envelope::parse(hashed).unwrap();
        assert_eq!(envelope.version(), Version::V2);
        assert_eq!(envelope.to_string(), hashed);
    }

    #[test]
    fn parse_failures_name_the_field() {
        assert_eq!(
            Envelope::parse("$s2$zzz$8$1$AAAA$BBBB"),
            Err(Error::InvalidEnvelope("bad decimal parameter field"))
        );
        assert_eq!(
            Envelope::parse("$s1$nothex$AAAA$BBBB"),
            Err(Error::InvalidEnvelope("bad packed parameter field"))
        );
        assert_eq!(
            Envelope::parse("$s2$16384$8$1$!!!$BBBB"),
            Err(Error::InvalidEnvelope("bad base64 in the salt field"))
        );
        assert_eq!(
            Envelope::parse("$s2$16384$8$1$AAAA$!!!"),
            Err(Error::InvalidEnvelope("bad base64 in the derived key field"))
        );
        assert_eq!(
            Envelope::parse("no dollars at all"),
            Err(Error::InvalidEnvelope("expected a leading `$`"))
        );
    }

    #[test]
    fn legacy_guard_policy_follows_the_version() {
        // 1000 is not a power of two: v1 rejects, v0 accepts
        let v1 = Envelope::parse("$s1$3e80801$AAAA$BBBB").unwrap();
        assert!(v1.params().is_err());
        let v0 = Envelope::parse("$s0$3e80801$AAAA$BBBB").unwrap();
        let params = v0.params().unwrap();
        assert_eq!((params.n(), params.r(), params.p()), (1000, 8, 1));
    }
}
