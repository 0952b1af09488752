// Key and client fixtures
//
// Two RSA key pairs stand in for the merchant (signs requests) and the vendor
// (signs callbacks). They are generated once per test binary.

use alipay_gateway::channels::{AlipayClient, AlipaySettings, CallbackParams};
use alipay_gateway::core::canonical;
use alipay_gateway::core::signature::{self, DigestAlgorithm};
use base64::prelude::*;
use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::sync::OnceLock;

pub const TEST_APP_ID: &str = "2021000000000001";
pub const TEST_NOTIFY_URL: &str = "https://merchant.example.com/api/notify";

pub struct KeyPair {
    pub private: RsaPrivateKey,
    pub public: RsaPublicKey,
}

impl KeyPair {
    fn generate() -> Self {
        let private =
            RsaPrivateKey::new(&mut rand::thread_rng(), 1024).expect("RSA key generation");
        let public = RsaPublicKey::from(&private);
        Self { private, public }
    }

    pub fn private_pkcs1_pem(&self) -> String {
        self.private
            .to_pkcs1_pem(LineEnding::LF)
            .expect("PKCS#1 PEM")
            .to_string()
    }

    pub fn private_pkcs8_pem(&self) -> String {
        self.private
            .to_pkcs8_pem(LineEnding::LF)
            .expect("PKCS#8 PEM")
            .to_string()
    }

    pub fn private_pkcs8_der(&self) -> Vec<u8> {
        self.private
            .to_pkcs8_der()
            .expect("PKCS#8 DER")
            .as_bytes()
            .to_vec()
    }

    pub fn private_pkcs1_der(&self) -> Vec<u8> {
        self.private
            .to_pkcs1_der()
            .expect("PKCS#1 DER")
            .as_bytes()
            .to_vec()
    }

    /// Bare base64 of the PKCS#8 DER, the form the vendor console exports
    pub fn private_base64(&self) -> String {
        BASE64_STANDARD.encode(self.private_pkcs8_der())
    }

    pub fn public_spki_pem(&self) -> String {
        self.public
            .to_public_key_pem(LineEnding::LF)
            .expect("SPKI PEM")
    }

    pub fn public_pkcs1_pem(&self) -> String {
        self.public
            .to_pkcs1_pem(LineEnding::LF)
            .expect("PKCS#1 public PEM")
    }

    pub fn public_spki_der(&self) -> Vec<u8> {
        self.public
            .to_public_key_der()
            .expect("SPKI DER")
            .as_bytes()
            .to_vec()
    }

    pub fn public_base64(&self) -> String {
        BASE64_STANDARD.encode(self.public_spki_der())
    }
}

pub struct TestKeys {
    pub merchant: KeyPair,
    pub vendor: KeyPair,
    /// Belongs to nobody; signatures from it must never verify
    pub stranger: KeyPair,
}

pub fn test_keys() -> &'static TestKeys {
    static KEYS: OnceLock<TestKeys> = OnceLock::new();
    KEYS.get_or_init(|| TestKeys {
        merchant: KeyPair::generate(),
        vendor: KeyPair::generate(),
        stranger: KeyPair::generate(),
    })
}

/// Settings for a client holding the merchant private key and vendor public key
pub fn test_settings(gateway_url: &str) -> AlipaySettings {
    let keys = test_keys();
    let mut settings = AlipaySettings::new(
        TEST_APP_ID,
        keys.merchant.private_pkcs1_pem(),
        keys.vendor.public_base64(),
        TEST_NOTIFY_URL,
    );
    settings.gateway_url = Some(gateway_url.to_string());
    settings
}

pub fn test_client(gateway_url: &str) -> AlipayClient {
    AlipayClient::new(test_settings(gateway_url)).expect("test client")
}

/// Client for tests that never reach the network
pub fn offline_client() -> AlipayClient {
    test_client("http://127.0.0.1:1/gateway.do")
}

/// Notification fields as the vendor would post them, unsigned
pub fn callback_fields(out_trade_no: &str, trade_status: &str) -> CallbackParams {
    [
        ("notify_time", "2024-05-20 13:14:15"),
        ("notify_type", "trade_status_sync"),
        ("notify_id", "ac05099524730693a8b330c5ecf72da9786"),
        ("app_id", TEST_APP_ID),
        ("charset", "utf-8"),
        ("version", "1.0"),
        ("trade_no", "2024052022001400001000000001"),
        ("out_trade_no", out_trade_no),
        ("trade_status", trade_status),
        ("total_amount", "10.00"),
        ("subject", "Test Item"),
        ("gmt_payment", "2024-05-20 13:14:10"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Sign callback fields with `signer`, attaching `sign` and `sign_type`
pub fn sign_callback(mut fields: CallbackParams, signer: &KeyPair) -> CallbackParams {
    let content = canonical::callback_content(&fields);
    let sign = signature::sign_base64(&content, &signer.private, DigestAlgorithm::Sha256)
        .expect("callback signature");
    fields.insert("sign".to_string(), sign);
    fields.insert("sign_type".to_string(), "RSA2".to_string());
    fields
}

/// A callback genuinely signed by the vendor
pub fn vendor_callback(out_trade_no: &str, trade_status: &str) -> CallbackParams {
    sign_callback(callback_fields(out_trade_no, trade_status), &test_keys().vendor)
}
