use crate::codec::{Cbor, CodecError, Context, FieldWriter, Json, RawMap, Record};

///
/// FieldExtension
///
/// Extra fields a hook contributes to its entity's map. The fields are
/// flattened next to the entity's own; on decode the hook claims them
/// from the entries the entity left behind.
///
/// Any [`Record`] is a field extension.
///

pub trait FieldExtension: Send + Sync {
    fn encode_cbor(&self, out: &mut FieldWriter<Cbor>, cx: &Context<'_>) -> Result<(), CodecError>;

    fn encode_json(&self, out: &mut FieldWriter<Json>, cx: &Context<'_>) -> Result<(), CodecError>;

    fn decode_cbor(&mut self, raw: &mut RawMap<Cbor>, cx: &Context<'_>) -> Result<(), CodecError>;

    fn decode_json(&mut self, raw: &mut RawMap<Json>, cx: &Context<'_>) -> Result<(), CodecError>;
}

impl<R: Record + Send + Sync> FieldExtension for R {
    fn encode_cbor(&self, out: &mut FieldWriter<Cbor>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.encode_fields(out, cx)
    }

    fn encode_json(&self, out: &mut FieldWriter<Json>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.encode_fields(out, cx)
    }

    fn decode_cbor(&mut self, raw: &mut RawMap<Cbor>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.decode_fields(raw, cx)
    }

    fn decode_json(&mut self, raw: &mut RawMap<Json>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.decode_fields(raw, cx)
    }
}
