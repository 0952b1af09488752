// Property-based tests for canonical signed content
//
// - content is identical for the same fields whatever the insertion order
// - `sign` never contributes to request content
// - `sign` and `sign_type` never contribute to callback content
// - a signature over the content survives reordering of the fields
//
// Uses proptest to validate the properties across many field sets

#[path = "../helpers/mod.rs"]
mod helpers;

use alipay_gateway::core::canonical::{callback_content, request_content};
use alipay_gateway::core::signature::{self, DigestAlgorithm};
use helpers::*;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

fn field_sets() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map("[a-z_]{1,12}", "\\PC{0,24}", 0..12)
        .prop_map(|fields| fields.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_content_is_order_independent(
        fields in field_sets(),
        seed in any::<u64>()
    ) {
        let forward: HashMap<String, String> = fields.iter().cloned().collect();

        let mut shuffled = fields.clone();
        // deterministic reorder driven by the seed
        shuffled.sort_by_key(|(key, _)| {
            key.bytes().fold(seed, |acc, b| acc.rotate_left(7) ^ u64::from(b))
        });
        let backward: BTreeMap<String, String> = shuffled.into_iter().collect();

        prop_assert_eq!(request_content(&forward), request_content(&backward));
        prop_assert_eq!(callback_content(&forward), callback_content(&backward));
    }

    #[test]
    fn test_content_is_deterministic(fields in field_sets()) {
        let map: HashMap<String, String> = fields.into_iter().collect();
        prop_assert_eq!(request_content(&map), request_content(&map.clone()));
    }

    #[test]
    fn test_sign_never_contributes(
        fields in field_sets(),
        sign in "[A-Za-z0-9+/=]{0,32}",
        sign_type in "RSA2?"
    ) {
        let mut map: BTreeMap<String, String> = fields.into_iter().collect();
        map.remove("sign");
        map.remove("sign_type");
        let unsigned_request = request_content(&map);
        let unsigned_callback = callback_content(&map);

        map.insert("sign".to_string(), sign);
        prop_assert_eq!(request_content(&map), unsigned_request);

        map.insert("sign_type".to_string(), sign_type);
        prop_assert_eq!(callback_content(&map), unsigned_callback);
    }

    #[test]
    fn test_content_has_one_pair_per_field(fields in field_sets()) {
        let map: BTreeMap<String, String> = fields
            .into_iter()
            .filter(|(key, _)| key != "sign")
            .collect();
        let content = request_content(&map);

        // encoded values never contain a raw '&' or '='
        let pairs: Vec<&str> = if content.is_empty() {
            Vec::new()
        } else {
            content.split('&').collect()
        };
        prop_assert_eq!(pairs.len(), map.len());
        for pair in pairs {
            prop_assert_eq!(pair.matches('=').count(), 1);
        }
    }
}

#[test]
fn test_request_content_matches_reference_vector() {
    assert_eq!(
        request_content(&reference_request_fields()),
        REFERENCE_REQUEST_CONTENT
    );
}

#[test]
fn test_callback_content_matches_reference_vector() {
    let mut fields = reference_callback_fields();
    fields.insert("sign".to_string(), "c2lnbg==".to_string());
    fields.insert("sign_type".to_string(), "RSA2".to_string());

    assert_eq!(callback_content(&fields), REFERENCE_CALLBACK_CONTENT);
}

#[test]
fn test_signature_survives_reordering() {
    let keys = test_keys();
    let mut ordered = BTreeMap::new();
    ordered.insert("timestamp".to_string(), "2024-05-20 13:14:15".to_string());
    ordered.insert("app_id".to_string(), TEST_APP_ID.to_string());
    ordered.insert("method".to_string(), "alipay.trade.query".to_string());
    ordered.insert(
        "biz_content".to_string(),
        r#"{"out_trade_no":"ORDER123"}"#.to_string(),
    );

    let sig = signature::sign_base64(
        &request_content(&ordered),
        &keys.merchant.private,
        DigestAlgorithm::Sha256,
    )
    .unwrap();

    let unordered: HashMap<String, String> = ordered.into_iter().rev().collect();
    signature::verify_base64(
        &request_content(&unordered),
        &sig,
        &keys.merchant.public,
        DigestAlgorithm::Sha256,
    )
    .unwrap();
}
