//! Built-in variant payloads and shared value types.

mod bytes;
mod digest;
mod identity;
mod int;
mod oid;
mod pkix;
mod tag_id;
mod uuid;

pub use self::{
    bytes::{COSE_KEY_TAG, CoseKey, IMPL_ID_TAG, ImplId, TAGGED_BYTES_TAG, TaggedBytes, UEID_TAG, Ueid},
    digest::{Digest, HashAlg, THUMBPRINT_TAG, Thumbprint},
    identity::EntityIdentity,
    int::{TAGGED_INT_TAG, TaggedInt},
    oid::{OID_TAG, Oid},
    pkix::{PKIX_CERT_PATH_TAG, PKIX_CERT_TAG, PKIX_KEY_TAG, PkixCert, PkixCertPath, PkixKey},
    tag_id::TagId,
    uuid::{UUID_TAG, Uuid},
};

pub(crate) use self::{bytes::decode_base64, identity::check_absolute_uri, identity::IDENTITY_SCHEMA};
