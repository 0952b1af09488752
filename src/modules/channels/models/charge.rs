use crate::core::canonical::{self, SIGN_FIELD};
use crate::core::{AppError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

const MAX_OUT_TRADE_NO_LEN: usize = 64;
const MAX_SUBJECT_LEN: usize = 256;
const SUBJECT_FORBIDDEN: [char; 3] = ['/', '=', '&'];

/// Validated charge request
///
/// Construct through [`ChargeRequest::new`]; the fields cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChargeRequest {
    out_trade_no: String,
    total_amount: String,
    subject: String,
    specified_channel: Option<String>,
}

impl ChargeRequest {
    /// Validate and normalize a charge.
    ///
    /// * `out_trade_no` - merchant order number, 1..=64 of `[A-Za-z0-9_]`
    /// * `total_amount` - yuan amount with at most two decimals, in `[0.01, 100000000]`
    /// * `subject` - order title, no `/`, `=` or `&`
    pub fn new(
        out_trade_no: impl Into<String>,
        total_amount: &str,
        subject: impl Into<String>,
    ) -> Result<Self> {
        let out_trade_no = out_trade_no.into();
        let subject = subject.into();

        validate_out_trade_no(&out_trade_no)?;
        let total_amount = normalize_amount(total_amount)?;
        validate_subject(&subject)?;

        Ok(Self {
            out_trade_no,
            total_amount,
            subject,
            specified_channel: None,
        })
    }

    /// Route this charge to a specific funding channel, overriding the client default.
    pub fn with_specified_channel(mut self, channel: impl Into<String>) -> Self {
        let channel = channel.into();
        self.specified_channel = if channel.trim().is_empty() {
            None
        } else {
            Some(channel)
        };
        self
    }

    pub fn out_trade_no(&self) -> &str {
        &self.out_trade_no
    }

    /// Amount as sent to the vendor, always with two decimals
    pub fn total_amount(&self) -> &str {
        &self.total_amount
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn specified_channel(&self) -> Option<&str> {
        self.specified_channel.as_deref()
    }
}

fn validate_out_trade_no(value: &str) -> Result<()> {
    if value.is_empty() || value.len() > MAX_OUT_TRADE_NO_LEN {
        return Err(AppError::validation(format!(
            "out_trade_no must be 1 to {} characters",
            MAX_OUT_TRADE_NO_LEN
        )));
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(AppError::validation(
            "out_trade_no may only contain letters, digits and underscores",
        ));
    }
    Ok(())
}

fn normalize_amount(value: &str) -> Result<String> {
    let mut amount = Decimal::from_str(value.trim())
        .map_err(|_| AppError::validation(format!("total_amount '{}' is not a decimal", value)))?;

    if amount.scale() > 2 {
        return Err(AppError::validation(
            "total_amount must have at most 2 decimal places",
        ));
    }

    let min = Decimal::new(1, 2);
    let max = Decimal::from(100_000_000u32);
    if amount < min || amount > max {
        return Err(AppError::validation(format!(
            "total_amount must be between {} and {}",
            min, max
        )));
    }

    amount.rescale(2);
    Ok(amount.to_string())
}

fn validate_subject(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation("subject is required"));
    }
    if value.chars().count() > MAX_SUBJECT_LEN {
        return Err(AppError::validation(format!(
            "subject must be at most {} characters",
            MAX_SUBJECT_LEN
        )));
    }
    if value.contains(&SUBJECT_FORBIDDEN[..]) {
        return Err(AppError::validation(
            "subject must not contain '/', '=' or '&'",
        ));
    }
    Ok(())
}

/// Parameter set with its `sign` field attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedParameters {
    fields: BTreeMap<String, String>,
}

impl SignedParameters {
    /// Attach `sign` to an unsigned field set.
    pub(crate) fn new(mut fields: BTreeMap<String, String>, sign: String) -> Self {
        fields.insert(SIGN_FIELD.to_string(), sign);
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn sign(&self) -> &str {
        self.get(SIGN_FIELD).unwrap_or_default()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.fields
    }

    /// Content the signature covers
    pub fn signed_content(&self) -> String {
        canonical::request_content(&self.fields)
    }

    /// Encoded query string, `sign` included, handed to the mobile SDK
    pub fn to_order_string(&self) -> String {
        canonical::canonical_content(&self.fields, &[])
    }
}
