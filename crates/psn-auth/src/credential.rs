use std::fmt;

use zeroize::Zeroizing;

use crate::config::NPSSO_LEN;
use crate::errors::CredentialError;

/// Check the shape of an npsso value without touching the network
pub fn validate(npsso: &str) -> Result<(), CredentialError> {
    if npsso.is_empty() {
        return Err(CredentialError::Empty);
    }

    let len = npsso.len();
    if len != NPSSO_LEN {
        return Err(CredentialError::WrongLength { len });
    }

    Ok(())
}

/// The npsso session cookie value, validated and zeroized on drop.
///
/// Only ever sent as the `npsso` cookie to the authorize endpoint.
#[derive(Clone)]
pub struct Npsso(Zeroizing<String>);

impl Npsso {
    pub fn new(value: impl Into<String>) -> Result<Self, CredentialError> {
        let value = Zeroizing::new(value.into());
        validate(&value)?;
        Ok(Self(value))
    }

    pub(crate) fn cookie(&self) -> String {
        format!("npsso={}", self.0.as_str())
    }
}

impl fmt::Debug for Npsso {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Npsso").field(&"[REDACTED]").finish()
    }
}

impl std::str::FromStr for Npsso {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
