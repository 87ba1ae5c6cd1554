use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use super::CryptoError;
use crate::config::{BLOCK_HASH_LEN, OPERATION_HASH_LEN, PROPOSAL_HASH_LEN};

macro_rules! base58_hash {
    ($name:ident, $len:expr, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Validates base58 decodability and the bit-exact length from spec §6.
            pub fn parse(raw: &str) -> Result<Self, CryptoError> {
                if raw.len() != $len {
                    return Err(CryptoError::UnexpectedLength {
                        kind: $label,
                        expected: $len,
                        got: raw.len(),
                    });
                }
                bs58::decode(raw)
                    .into_vec()
                    .map_err(|_| CryptoError::InvalidBase58(raw.to_string()))?;
                Ok($name(raw.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = CryptoError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::parse(s)
            }
        }
    };
}

base58_hash!(BlockHash, BLOCK_HASH_LEN, "block hash");
base58_hash!(OperationHash, OPERATION_HASH_LEN, "operation hash");
base58_hash!(ProposalHash, PROPOSAL_HASH_LEN, "proposal hash");

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_base58(len: usize) -> String {
        // '1' through '9' are valid base58 symbols; repeating one is still
        // decodable and lets tests build hashes of an exact target length.
        "A".repeat(len)
    }

    #[test]
    fn block_hash_rejects_wrong_length() {
        let short = fake_base58(BLOCK_HASH_LEN - 1);
        assert!(BlockHash::parse(&short).is_err());
    }

    #[test]
    fn block_hash_accepts_exact_length() {
        let valid = fake_base58(BLOCK_HASH_LEN);
        assert!(BlockHash::parse(&valid).is_ok());
    }

    #[test]
    fn operation_hash_len_is_54() {
        assert_eq!(OPERATION_HASH_LEN, 54);
        let valid = fake_base58(OPERATION_HASH_LEN);
        assert!(OperationHash::parse(&valid).is_ok());
    }
}
