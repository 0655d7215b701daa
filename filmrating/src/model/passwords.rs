// Film rating
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! The `Password` and `HashedPassword` data types.

use filmrating_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use subtle::ConstantTimeEq;

/// Number of random salt bytes prepended to every derived key.
pub(crate) const SALT_LENGTH: usize = 10;

/// Number of bytes in a derived key.
const KEY_LENGTH: usize = 32;

/// Number of PBKDF2 iterations used to derive a key from a password.
const PBKDF2_ROUNDS: u32 = 100_000;

/// Maximum length of a password, in bytes.
const MAX_PASSWORD_LENGTH: usize = 1024;

/// A well-formed hash that stands in for missing users.  Its all-zero key is not expected to be
/// the derivation of any password.
const UNMATCHABLE_HASH: [u8; SALT_LENGTH + KEY_LENGTH] = [0; SALT_LENGTH + KEY_LENGTH];

/// An opaque type to hold a password, protecting it from leaking into logs.
#[derive(Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
#[cfg_attr(test, derive(Clone))]
pub struct Password(String);

impl Password {
    /// Creates a new password from a literal string.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.len() > MAX_PASSWORD_LENGTH {
            return Err(ModelError("Password is too long".to_owned()));
        }
        Ok(Password(s))
    }

    /// Returns a string view of the password.
    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives the key for this password and the given `salt`.
    fn derive(&self, salt: &[u8]) -> [u8; KEY_LENGTH] {
        let mut key = [0u8; KEY_LENGTH];
        pbkdf2::pbkdf2_hmac::<Sha256>(self.0.as_bytes(), salt, PBKDF2_ROUNDS, &mut key);
        key
    }

    /// Hashes the password with a freshly-generated random salt.  Consumes the password because
    /// there is no context in which keeping the password alive once we have generated its hash
    /// is correct.
    pub fn hash(self) -> HashedPassword {
        let salt = rand::random::<[u8; SALT_LENGTH]>();
        self.hash_with_salt(salt)
    }

    /// Hashes the password with a caller-provided `salt`.
    fn hash_with_salt(self, salt: [u8; SALT_LENGTH]) -> HashedPassword {
        let key = self.derive(&salt);
        let mut bytes = Vec::with_capacity(SALT_LENGTH + KEY_LENGTH);
        bytes.extend_from_slice(&salt);
        bytes.extend_from_slice(&key);
        HashedPassword::new(bytes)
    }

    /// Verifies if this password matches a given `hash`.
    ///
    /// Hashes that are too short to contain a salt and a key never match.
    pub fn verify(self, hash: &HashedPassword) -> bool {
        let bytes = hash.as_slice();
        if bytes.len() <= SALT_LENGTH {
            return false;
        }
        let (salt, exp_key) = bytes.split_at(SALT_LENGTH);
        self.derive(salt).as_slice().ct_eq(exp_key).into()
    }

    /// Rejects this password after doing the same amount of work as `verify`.
    ///
    /// Used when there is no stored hash to check against, so that response times do not reveal
    /// whether a login exists.
    pub fn verify_missing(self) -> bool {
        self.verify(&HashedPassword::new(UNMATCHABLE_HASH.to_vec()))
    }
}

#[cfg(test)]
impl From<&'static str> for Password {
    /// Creates a new password from a hardcoded string, which must be valid.
    fn from(s: &'static str) -> Self {
        Password::new(s).expect("Hardcoded passwords must be valid")
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed password")
    }
}

/// An opaque type to hold a hashed password, protecting it from leaking into logs.
///
/// The contents are the salt followed by the derived key.  Values read back from the database are
/// not validated, so this may hold arbitrary bytes.
#[derive(Clone, PartialEq)]
pub struct HashedPassword(Vec<u8>);

impl HashedPassword {
    /// Creates a new hashed password from raw bytes.
    pub fn new<B: Into<Vec<u8>>>(bytes: B) -> Self {
        HashedPassword(bytes.into())
    }

    /// Returns a view of the raw bytes of the hash.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed hash")
    }
}
