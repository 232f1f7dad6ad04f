use ferry_api::{HostValue, Kind, TypeDesc, WireValue};

use crate::dispatch::Converter;
use crate::error::ConvertError;

/// Convert a wire list element by element, in order.
///
/// The first failing element aborts the whole conversion; nothing built so
/// far is returned.
pub(crate) fn convert(
    conv: &Converter,
    value: &WireValue,
    desc: &TypeDesc,
    depth: usize,
) -> Result<HostValue, ConvertError> {
    let WireValue::List(items) = value else {
        return Err(ConvertError::mismatch(Kind::Sequence, value));
    };
    let TypeDesc::Sequence(Some(elem)) = desc else {
        return Err(ConvertError::MissingElementDescriptor);
    };

    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let v = conv
            .convert_at(item, Some(elem), depth + 1)
            .map_err(|e| ConvertError::element(index, e))?;
        out.push(v);
    }
    Ok(HostValue::Seq(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_api::{IntWidth, WireTag};

    fn ints(values: &[i64]) -> WireValue {
        WireValue::List(values.iter().copied().map(WireValue::Int).collect())
    }

    #[test]
    fn preserves_order_and_length() {
        let desc = TypeDesc::sequence(TypeDesc::Int(IntWidth::W32));
        let out = convert(&Converter::default(), &ints(&[3, 1, 2]), &desc, 0).unwrap();
        assert_eq!(
            out,
            HostValue::Seq(vec![HostValue::I32(3), HostValue::I32(1), HostValue::I32(2)])
        );
    }

    #[test]
    fn empty_list() {
        let desc = TypeDesc::sequence(TypeDesc::String);
        let out = convert(&Converter::default(), &ints(&[]), &desc, 0).unwrap();
        assert_eq!(out, HostValue::Seq(vec![]));
    }

    #[test]
    fn element_failure_carries_index() {
        let desc = TypeDesc::sequence(TypeDesc::Uint(IntWidth::W8));
        let err = convert(&Converter::default(), &ints(&[1, 2, -3, -4]), &desc, 0).unwrap_err();
        assert_eq!(err, ConvertError::element(2, ConvertError::NegativeForUnsigned(-3)));
    }

    #[test]
    fn requires_list_tag() {
        let desc = TypeDesc::sequence(TypeDesc::Bool);
        let err = convert(&Converter::default(), &WireValue::Map(vec![]), &desc, 0).unwrap_err();
        assert_eq!(
            err,
            ConvertError::TypeMismatch { expected: Kind::Sequence, actual: WireTag::Map }
        );
    }

    #[test]
    fn bare_descriptor_is_rejected() {
        let err = convert(&Converter::default(), &ints(&[1]), &TypeDesc::Sequence(None), 0)
            .unwrap_err();
        assert_eq!(err, ConvertError::MissingElementDescriptor);
    }

    #[test]
    fn any_elements_are_inferred_one_by_one() {
        let list = WireValue::List(vec![
            WireValue::Int(1),
            WireValue::from("a"),
            WireValue::Bool(true),
        ]);
        let out = convert(&Converter::default(), &list, &TypeDesc::sequence(TypeDesc::Any), 0)
            .unwrap();
        assert_eq!(
            out,
            HostValue::Seq(vec![
                HostValue::I64(1),
                HostValue::String("a".into()),
                HostValue::Bool(true),
            ])
        );
    }
}
