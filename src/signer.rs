use base64::{prelude::BASE64_URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha512;

/// A token signer.
pub trait Signer {
    /// The header placed in front of every token this signer produces.
    fn header(&self) -> &JwtHeader;

    /// Sign the given message, returning the raw signature bytes.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SigningError>;

    /// Encode and sign a claim set, producing a compact `header.payload.signature` token.
    fn sign_token<T>(&self, claims: &T) -> Result<String, SigningError>
    where
        T: Serialize,
        Self: Sized,
    {
        let header_b64 = to_base64_json(self.header()).map_err(|e| SigningError::Encoding("header", e.to_string()))?;
        let payload_b64 = to_base64_json(claims).map_err(|e| SigningError::Encoding("claims", e.to_string()))?;

        let message_to_sign = format!("{header_b64}.{payload_b64}");
        let signature = self.sign(message_to_sign.as_bytes())?;
        let signature_b64 = to_base64(&signature);
        Ok(format!("{message_to_sign}.{signature_b64}"))
    }
}

/// An error that can occur when signing a token.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    #[error("encoding {0}: {1}")]
    Encoding(&'static str, String),
}

/// A signer that uses HMAC-SHA512 over a shared secret.
pub struct Hs512Signer {
    mac: Hmac<Sha512>,
    header: JwtHeader,
}

impl Hs512Signer {
    /// Create a new signer keyed with the given secret.
    pub fn new(secret: &[u8]) -> Result<Self, SigningError> {
        let mac = Hmac::<Sha512>::new_from_slice(secret).map_err(|e| SigningError::InvalidKey(e.to_string()))?;
        Ok(Self { mac, header: JwtHeader { algorithm: JwtAlgorithm::Hs512, token_type: JwtType::Jwt } })
    }
}

impl Signer for Hs512Signer {
    fn header(&self) -> &JwtHeader {
        &self.header
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SigningError> {
        let mut mac = self.mac.clone();
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// A JWT header.
///
/// Field order matters: it is the order the header is encoded in.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JwtHeader {
    #[serde(rename = "alg")]
    pub algorithm: JwtAlgorithm,

    #[serde(rename = "typ")]
    pub token_type: JwtType,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JwtAlgorithm {
    Hs512,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JwtType {
    Jwt,
}

pub(crate) fn to_base64<T: AsRef<[u8]>>(input: T) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(input)
}

pub(crate) fn to_base64_json<T: Serialize>(input: &T) -> Result<String, serde_json::Error> {
    let input = serde_json::to_vec(input)?;
    Ok(to_base64(&input))
}
