// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT session token tests.
//!
//! These verify that tokens minted at sign-in decode into the claims the
//! middleware expects, catching compatibility drift early.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use terraguess_api::identity::Identity;
use terraguess_api::middleware::auth::{create_jwt, Claims};

const SIGNING_KEY: &[u8] = b"test_jwt_key_32_bytes_minimum!!";

#[test]
fn test_jwt_roundtrip() {
    let identity = Identity::normalize(" Player@Example.COM ").unwrap();
    let token = create_jwt(&identity, "Player One", SIGNING_KEY).expect("Failed to create JWT");

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(&token, &key, &validation).expect("Failed to decode JWT");

    // The subject is the normalized identity, not the raw email
    assert_eq!(data.claims.sub, "player@example.com");
    assert_eq!(data.claims.name, "Player One");
    assert!(data.claims.exp > data.claims.iat);
}

#[test]
fn test_jwt_rejects_wrong_key() {
    let identity = Identity::normalize("player@example.com").unwrap();
    let token = create_jwt(&identity, "Player", SIGNING_KEY).expect("Failed to create JWT");

    let key = DecodingKey::from_secret(b"a_completely_different_key!!!!!");
    let validation = Validation::new(Algorithm::HS256);

    assert!(decode::<Claims>(&token, &key, &validation).is_err());
}
