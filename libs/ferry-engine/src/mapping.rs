use std::collections::HashMap;

use ferry_api::{HostKey, HostValue, Kind, TypeDesc, WireValue};

use crate::dispatch::Converter;
use crate::error::{ConvertError, key_repr};

/// Convert a wire map entry by entry, in wire order.
///
/// Keys and values are converted with their own descriptors. When two wire
/// keys convert to the same host key, the later entry wins. Any failure
/// aborts the whole conversion.
pub(crate) fn convert(
    conv: &Converter,
    value: &WireValue,
    desc: &TypeDesc,
    depth: usize,
) -> Result<HostValue, ConvertError> {
    let WireValue::Map(entries) = value else {
        return Err(ConvertError::mismatch(Kind::Mapping, value));
    };
    let TypeDesc::Mapping(Some(kv)) = desc else {
        return Err(ConvertError::MissingElementDescriptor);
    };
    let (key_desc, value_desc) = (&kv.0, &kv.1);
    if let Some(kind) = key_desc.kind().filter(|k| k.is_structural()) {
        return Err(ConvertError::UnsupportedKind(kind));
    }

    let mut out = HashMap::with_capacity(entries.len());
    for (wire_key, wire_value) in entries {
        let key = conv
            .convert_at(wire_key, Some(key_desc), depth + 1)
            .map_err(|e| ConvertError::key(wire_key, e))?;
        let key = HostKey::from_value(key).map_err(|v| {
            let kind = match v {
                HostValue::Seq(_) => Kind::Sequence,
                _ => Kind::Mapping,
            };
            ConvertError::key(wire_key, ConvertError::UnsupportedKind(kind))
        })?;

        let v = conv
            .convert_at(wire_value, Some(value_desc), depth + 1)
            .map_err(|e| ConvertError::value(wire_key, e))?;

        if out.insert(key, v).is_some() {
            tracing::trace!(key = %key_repr(wire_key), "duplicate map key, later entry wins");
        }
    }
    Ok(HostValue::Map(out))
}
