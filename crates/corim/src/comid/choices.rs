//! Type-choice families used by CoMID.

use crate::types::{CoseKey, ImplId, Oid, PkixCert, PkixCertPath, PkixKey, TaggedBytes, TaggedInt, Thumbprint, Ueid, Uuid};

corim_core::choice_family! {
    /// Identifies a class of environment.
    pub enum ClassId = "class id" {
        Oid(Oid),
        Uuid(Uuid),
        ImplId(ImplId),
        Int(TaggedInt),
    }
}

corim_core::choice_family! {
    /// Identifies one instance of an environment.
    pub enum InstanceId = "instance" {
        Ueid(Ueid),
        Uuid(Uuid),
    }
}

corim_core::choice_family! {
    /// Identifies a group of environments.
    pub enum GroupId = "group" {
        Uuid(Uuid),
        Bytes(TaggedBytes),
    }
}

corim_core::choice_family! {
    /// Keys one measurement within an environment.
    pub enum Mkey = "measurement key" {
        Uuid(Uuid),
        Oid(Oid),
    }
}

corim_core::choice_family! {
    /// A verification key, certificate or reference to one.
    pub enum CryptoKey = "crypto key" {
        PkixKey(PkixKey),
        PkixCert(PkixCert),
        PkixCertPath(PkixCertPath),
        Thumbprint(Thumbprint),
        CoseKey(CoseKey),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corim_core::{
        choice::{ChoiceInput, Registries, TypeChoice},
        codec::{Cbor, Context, FieldValue, Json},
        error::ErrorKind,
    };
    use serde_json::json;

    fn registries() -> Registries {
        let mut registries = Registries::new();
        crate::builtins::register_comid_choices(&mut registries).unwrap();
        registries
    }

    #[test]
    fn oid_class_id_in_both_forms() {
        let registries = registries();
        let cx = Context::new(&registries);
        let class_id = ClassId::from("1.2.3.4".parse::<Oid>().unwrap());

        let cbor = class_id.encode::<Cbor>(&cx).unwrap();
        assert_eq!(serde_cbor::to_vec(&cbor).unwrap(), hex::decode("d86f432a0304").unwrap());
        let back = ClassId::decode::<Cbor>(cbor, &cx).unwrap();
        assert_eq!(back.type_name(), "oid");
        assert_eq!(back.to_string(), "1.2.3.4");

        let text = class_id.encode::<Json>(&cx).unwrap();
        assert_eq!(text, json!({"type": "oid", "value": "1.2.3.4"}));
        assert_eq!(ClassId::decode::<Json>(text, &cx).unwrap(), class_id);
    }

    #[test]
    fn families_do_not_share_names() {
        let registries = registries();
        let cx = Context::new(&registries);

        let err = InstanceId::decode::<Json>(json!({"type": "oid", "value": "1.2.3"}), &cx).unwrap_err();
        assert_eq!(err.to_string(), "unknown instance type: \"oid\"");
        assert_eq!(err.kind(), ErrorKind::Discriminator);

        // the same uuid tag resolves per family
        let uuid = Uuid::parse("31fb5abf-023e-4992-aa4e-95f9c1503bfa").unwrap();
        let cbor = GroupId::from(uuid).encode::<Cbor>(&cx).unwrap();
        assert_eq!(Mkey::decode::<Cbor>(cbor, &cx).unwrap(), Mkey::Uuid(uuid));
    }

    #[test]
    fn missing_type_is_an_error() {
        let registries = registries();
        let cx = Context::new(&registries);

        let err = ClassId::decode::<Json>(json!({"value": "1.2.3"}), &cx).unwrap_err();
        assert_eq!(err.to_string(), "class id type not set");
    }

    #[test]
    fn factory_validates() {
        let registries = registries();
        let classes = registries.family::<ClassId>().unwrap();

        let err = classes
            .resolve_by_name("psa.impl-id", ChoiceInput::Text("YWNtZQ=="))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid psa.impl-id: expected 32 bytes, got 4");
    }

    #[test]
    fn crypto_key_thumbprint_text() {
        let registries = registries();
        let cx = Context::new(&registries);
        let value = json!({"type": "thumbprint", "value": "sha-256-32;3q2+7w=="});

        let key = CryptoKey::decode::<Json>(value.clone(), &cx).unwrap();
        assert!(matches!(key, CryptoKey::Thumbprint(_)));
        assert_eq!(key.encode::<Json>(&cx).unwrap(), value);
    }
}
