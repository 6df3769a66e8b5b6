//! # Identity Codec
//!
//! Converts identities to and from their stored form, compact JSON carrying a `type`
//! discriminator. Decoding is done in two phases: the bytes are first parsed as a generic JSON
//! object so the discriminator can be read, then the object is decoded as the kind it names.
//! Nothing is constructed unless both phases succeed.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Err;
use crate::identity::{
    DidIdentity, Identity, IdentityType, RawIdentity, RawKeyIdentity, X509Identity,
};
use crate::{tracerr, Result};

/// Serialize an identity to its stored form.
///
/// # Errors
///
/// * `SerializationError` if the identity cannot be serialized.
pub fn marshal(identity: &Identity) -> Result<Vec<u8>> {
    match identity {
        Identity::Raw(x) => to_bytes(x),
        Identity::RawKey(x) => to_bytes(x),
        Identity::X509(x) => to_bytes(x),
        Identity::Did(x) => to_bytes(x),
    }
}

/// Deserialize stored bytes into the identity kind named by their `type` discriminator.
///
/// Records without a discriminator are accepted only when they carry both `master_key` and
/// `slave_key`, the shape of DID identities written before the discriminator existed.
///
/// # Errors
///
/// * `MalformedIdentity` if the bytes are not a JSON object or do not decode as the kind named
///   by the discriminator.
/// * `MissingTypeTag` if there is no discriminator.
/// * `UnsupportedIdentityType` if the discriminator names no known kind.
pub fn unmarshal(data: &[u8]) -> Result<Identity> {
    let envelope = match serde_json::from_slice::<Value>(data) {
        Ok(Value::Object(obj)) => obj,
        Ok(other) => tracerr!(
            Err::MalformedIdentity,
            "identity must be a JSON object, found {}",
            kind_of(&other)
        ),
        Err(e) => tracerr!(Err::MalformedIdentity, "issue parsing identity: {}", e),
    };

    let identity_type = match envelope.get("type") {
        None | Some(Value::Null) => {
            if is_legacy_did(&envelope) {
                IdentityType::Did
            } else {
                tracerr!(Err::MissingTypeTag, "identity has no type");
            }
        }
        Some(Value::String(tag)) => match IdentityType::from_tag(tag) {
            Some(t) => t,
            None => tracerr!(Err::UnsupportedIdentityType, "unsupported identity type: {}", tag),
        },
        Some(other) => tracerr!(
            Err::UnsupportedIdentityType,
            "identity type must be a string, found {}",
            kind_of(other)
        ),
    };

    let value = Value::Object(envelope);
    let identity = match identity_type {
        IdentityType::Raw => Identity::Raw(decode::<RawIdentity>(value, identity_type)?),
        IdentityType::RawKey => Identity::RawKey(decode::<RawKeyIdentity>(value, identity_type)?),
        IdentityType::X509 => Identity::X509(decode::<X509Identity>(value, identity_type)?),
        IdentityType::Did => Identity::Did(decode::<DidIdentity>(value, identity_type)?),
    };
    Ok(identity)
}

// Serialize any identity kind to compact JSON.
pub(crate) fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    match serde_json::to_vec(value) {
        Ok(data) => Ok(data),
        Err(e) => tracerr!(Err::SerializationError, "issue serializing identity: {}", e),
    }
}

fn decode<T: DeserializeOwned>(value: Value, identity_type: IdentityType) -> Result<T> {
    match serde_json::from_value(value) {
        Ok(x) => Ok(x),
        Err(e) => tracerr!(
            Err::MalformedIdentity,
            "issue decoding {} identity: {}",
            identity_type,
            e
        ),
    }
}

fn is_legacy_did(envelope: &Map<String, Value>) -> bool {
    envelope.contains_key("master_key") && envelope.contains_key("slave_key")
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::identity::IdentityRecord;

    const DID: &str = "did:example:fafdecaa29934fde9dcc5adaea8ea82b";

    fn key(n: u32) -> Value {
        json!({
            "id": format!("{DID}#keys-{n}"),
            "type": "Ed25519",
            "privateKeyHex": "a889f4da49ff8dd6b03d4334723fe3e5ff55ae6a2483de1627bec873b0b73e1e86eabd6abce2f96553251de61def0265784688ff712ce583621a5b181ef21639",
            "publicKeyHex": "86eabd6abce2f96553251de61def0265784688ff712ce583621a5b181ef21639"
        })
    }

    fn bytes(value: &Value) -> Vec<u8> {
        serde_json::to_vec(value).expect("should serialize")
    }

    #[test]
    fn dispatch_on_type() {
        let raw = json!({"version": 1, "id": DID, "type": "Raw", "key": key(1)});
        let identity = unmarshal(&bytes(&raw)).expect("should decode");
        assert_eq!(identity.identity_type(), IdentityType::Raw);
        assert_eq!(identity.did(), DID);

        let x509 = json!({
            "version": 1,
            "id": DID,
            "type": "X.509",
            "credentials": {"certificate": "cert", "privateKey": "key"}
        });
        let identity = unmarshal(&bytes(&x509)).expect("should decode");
        let Identity::X509(x) = identity else {
            panic!("expected X.509 identity");
        };
        assert_eq!(x.certificate(), "cert");
        assert_eq!(x.private_key_pem(), "key");
    }

    #[test]
    fn not_json() {
        let err = unmarshal(b"{not json").expect_err("should fail");
        assert!(err.is(Err::MalformedIdentity));

        let err = unmarshal(b"").expect_err("should fail");
        assert!(err.is(Err::MalformedIdentity));
    }

    #[test]
    fn not_an_object() {
        let err = unmarshal(b"[1, 2, 3]").expect_err("should fail");
        assert!(err.is(Err::MalformedIdentity));
        let err = unmarshal(br#""Raw""#).expect_err("should fail");
        assert!(err.is(Err::MalformedIdentity));
    }

    #[test]
    fn missing_type() {
        let value = json!({"version": 1, "id": DID, "key": key(1)});
        let err = unmarshal(&bytes(&value)).expect_err("should fail");
        assert!(err.is(Err::MissingTypeTag));

        let value = json!({"version": 1, "id": DID, "type": null, "key": key(1)});
        let err = unmarshal(&bytes(&value)).expect_err("should fail");
        assert!(err.is(Err::MissingTypeTag));
    }

    #[test]
    fn unknown_type() {
        let value = json!({"version": 1, "id": DID, "type": "PGP"});
        let err = unmarshal(&bytes(&value)).expect_err("should fail");
        assert!(err.is(Err::UnsupportedIdentityType));

        let value = json!({"version": 1, "id": DID, "type": 7});
        let err = unmarshal(&bytes(&value)).expect_err("should fail");
        assert!(err.is(Err::UnsupportedIdentityType));
    }

    #[test]
    fn tag_and_shape_disagree() {
        // tagged as Raw but shaped like X.509
        let value = json!({
            "version": 1,
            "id": DID,
            "type": "Raw",
            "credentials": {"certificate": "cert", "privateKey": "key"}
        });
        let err = unmarshal(&bytes(&value)).expect_err("should fail");
        assert!(err.is(Err::MalformedIdentity));

        // field of the wrong type
        let value = json!({"version": "one", "id": DID, "type": "Raw", "key": key(1)});
        let err = unmarshal(&bytes(&value)).expect_err("should fail");
        assert!(err.is(Err::MalformedIdentity));
    }

    #[test]
    fn legacy_did() {
        let value = json!({"id": DID, "master_key": key(1), "slave_key": key(2)});
        let identity = unmarshal(&bytes(&value)).expect("should decode");

        let Identity::Did(did) = &identity else {
            panic!("expected DID identity");
        };
        assert_eq!(did.did(), DID);
        assert_eq!(did.version(), 1);
        assert_eq!(did.standby_key_id(), format!("{DID}#keys-2"));

        // re-written with its discriminator
        let data = identity.marshal().expect("should marshal");
        let rewritten: Value = serde_json::from_slice(&data).expect("should parse");
        assert_eq!(rewritten["type"], "DID");
        assert_eq!(unmarshal(&data).expect("should decode"), identity);
    }

    #[test]
    fn compact_output() {
        let raw = json!({"version": 1, "id": DID, "type": "Raw", "key": key(1)});
        let identity = unmarshal(&bytes(&raw)).expect("should decode");
        let data = marshal(&identity).expect("should marshal");
        assert!(!data.contains(&b' '));
        assert!(!data.contains(&b'\n'));
    }
}
