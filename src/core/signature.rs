//! RSA PKCS#1 v1.5 signing and verification.
//!
//! Key material is accepted in any of the shapes vendors and merchants hand around:
//! PEM armored PKCS#1 or PKCS#8/SPKI, bare base64 of the DER body (the form the
//! Alipay console exports), or raw DER bytes. Everything goes through
//! [`load_private_key`] / [`load_public_key`] so call sites never care which one
//! they were given.

use base64::prelude::*;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::signature::{RandomizedSigner, SignatureEncoding, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha512};

use super::error::{AppError, Result};

/// Digest used underneath the PKCS#1 v1.5 padding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha256,
    Sha512,
}

const PEM_PREFIX: &str = "-----BEGIN";

/// Decoded form of user supplied key bytes
enum KeyMaterial<'a> {
    Pem(&'a str),
    Der(Vec<u8>),
}

fn classify(bytes: &[u8]) -> Result<KeyMaterial<'_>> {
    match std::str::from_utf8(bytes) {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(AppError::key_parse("key material is empty"));
            }
            if text.starts_with(PEM_PREFIX) {
                return Ok(KeyMaterial::Pem(text));
            }
            let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            BASE64_STANDARD
                .decode(compact.as_bytes())
                .map(KeyMaterial::Der)
                .map_err(|e| AppError::key_parse(format!("key is neither PEM nor base64 DER: {}", e)))
        }
        // Not text, so it can only be raw DER
        Err(_) => Ok(KeyMaterial::Der(bytes.to_vec())),
    }
}

/// Parse an RSA private key from PKCS#1 or PKCS#8, PEM or DER.
pub fn load_private_key(bytes: &[u8]) -> Result<RsaPrivateKey> {
    match classify(bytes)? {
        KeyMaterial::Pem(pem) => RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| AppError::key_parse(format!("invalid PEM private key: {}", e))),
        KeyMaterial::Der(der) => RsaPrivateKey::from_pkcs8_der(&der)
            .or_else(|_| RsaPrivateKey::from_pkcs1_der(&der))
            .map_err(|e| AppError::key_parse(format!("invalid DER private key: {}", e))),
    }
}

/// Parse an RSA public key from PKIX (SPKI) or PKCS#1, PEM or DER.
pub fn load_public_key(bytes: &[u8]) -> Result<RsaPublicKey> {
    match classify(bytes)? {
        KeyMaterial::Pem(pem) => RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map_err(|e| AppError::key_parse(format!("invalid PEM public key: {}", e))),
        KeyMaterial::Der(der) => RsaPublicKey::from_public_key_der(&der)
            .or_else(|_| RsaPublicKey::from_pkcs1_der(&der))
            .map_err(|e| AppError::key_parse(format!("invalid DER public key: {}", e))),
    }
}

/// Sign `content` with key bytes in any supported encoding.
pub fn sign(content: &[u8], private_key: &[u8], algorithm: DigestAlgorithm) -> Result<Vec<u8>> {
    let key = load_private_key(private_key)?;
    sign_with_key(content, &key, algorithm)
}

/// Verify `signature` over `content` with key bytes in any supported encoding.
pub fn verify(
    content: &[u8],
    signature: &[u8],
    public_key: &[u8],
    algorithm: DigestAlgorithm,
) -> Result<()> {
    let key = load_public_key(public_key)?;
    verify_with_key(content, signature, &key, algorithm)
}

pub fn sign_with_key(
    content: &[u8],
    key: &RsaPrivateKey,
    algorithm: DigestAlgorithm,
) -> Result<Vec<u8>> {
    let mut rng = rand::thread_rng();
    let signature = match algorithm {
        DigestAlgorithm::Sha256 => SigningKey::<Sha256>::new(key.clone())
            .try_sign_with_rng(&mut rng, content)
            .map(|s| s.to_vec()),
        DigestAlgorithm::Sha512 => SigningKey::<Sha512>::new(key.clone())
            .try_sign_with_rng(&mut rng, content)
            .map(|s| s.to_vec()),
    };
    signature.map_err(|e| AppError::Signing(e.to_string()))
}

pub fn verify_with_key(
    content: &[u8],
    signature: &[u8],
    key: &RsaPublicKey,
    algorithm: DigestAlgorithm,
) -> Result<()> {
    let signature = Signature::try_from(signature)
        .map_err(|e| AppError::signature_mismatch(format!("malformed signature: {}", e)))?;

    let verified = match algorithm {
        DigestAlgorithm::Sha256 => VerifyingKey::<Sha256>::new(key.clone()).verify(content, &signature),
        DigestAlgorithm::Sha512 => VerifyingKey::<Sha512>::new(key.clone()).verify(content, &signature),
    };
    verified.map_err(|_| AppError::signature_mismatch("signature does not match content"))
}

/// Sign and encode with standard base64, the vendor wire form.
pub fn sign_base64(content: &str, key: &RsaPrivateKey, algorithm: DigestAlgorithm) -> Result<String> {
    let raw = sign_with_key(content.as_bytes(), key, algorithm)?;
    Ok(BASE64_STANDARD.encode(raw))
}

/// Verify a standard base64 signature. Undecodable input is a mismatch.
pub fn verify_base64(
    content: &str,
    signature: &str,
    key: &RsaPublicKey,
    algorithm: DigestAlgorithm,
) -> Result<()> {
    let raw = BASE64_STANDARD
        .decode(signature.trim())
        .map_err(|e| AppError::signature_mismatch(format!("signature is not base64: {}", e)))?;
    verify_with_key(content.as_bytes(), &raw, key, algorithm)
}
