use ferry_api::{IntWidth, Kind, TypeDesc, WireTag};

use crate::error::ConvertError;

// ═══════════════════════════════════════════════════════════════
//  Canonical defaults
// ═══════════════════════════════════════════════════════════════

pub const DEFAULT_BOOL: TypeDesc = TypeDesc::Bool;
pub const DEFAULT_INT: TypeDesc = TypeDesc::Int(IntWidth::W64);
pub const DEFAULT_FLOAT: TypeDesc = TypeDesc::Float64;
pub const DEFAULT_STRING: TypeDesc = TypeDesc::String;

/// Canonical descriptor for a kind that inference can produce.
///
/// Structural kinds have none: an element type cannot be made up.
pub fn default_descriptor(kind: Kind) -> Option<&'static TypeDesc> {
    match kind {
        Kind::Bool => Some(&DEFAULT_BOOL),
        Kind::Int(IntWidth::W64) => Some(&DEFAULT_INT),
        Kind::Float64 => Some(&DEFAULT_FLOAT),
        Kind::String => Some(&DEFAULT_STRING),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════
//  Resolution
// ═══════════════════════════════════════════════════════════════

/// Effective target of a conversion: which converter runs, with which
/// descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<'a> {
    pub kind: Kind,
    pub desc: &'a TypeDesc,
}

/// Decide what to produce for a value tagged `tag`.
///
/// A concrete descriptor wins regardless of the tag; mismatches surface
/// later in the converter. `None` and `Any` infer a scalar kind from the
/// tag and fall back to its canonical descriptor.
pub fn resolve_kind(desc: Option<&TypeDesc>, tag: WireTag) -> Result<Resolved<'_>, ConvertError> {
    if let Some(desc) = desc {
        if let Some(kind) = desc.kind() {
            return Ok(Resolved { kind, desc });
        }
    }

    let kind = infer_kind(tag)?;
    let desc = default_descriptor(kind).ok_or(ConvertError::CannotInferKind(tag))?;
    Ok(Resolved { kind, desc })
}

/// Scalar kind implied by a wire tag.
pub fn infer_kind(tag: WireTag) -> Result<Kind, ConvertError> {
    match tag {
        WireTag::Bool => Ok(Kind::Bool),
        WireTag::Int => Ok(Kind::Int(IntWidth::W64)),
        WireTag::Float => Ok(Kind::Float64),
        WireTag::String => Ok(Kind::String),
        WireTag::List | WireTag::Map => Err(ConvertError::CannotInferKind(tag)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_descriptor_ignores_tag() {
        let desc = TypeDesc::Uint(IntWidth::W16);
        let resolved = resolve_kind(Some(&desc), WireTag::String).unwrap();
        assert_eq!(resolved.kind, Kind::Uint(IntWidth::W16));
        assert_eq!(resolved.desc, &desc);

        let list = TypeDesc::sequence(TypeDesc::Bool);
        let resolved = resolve_kind(Some(&list), WireTag::Int).unwrap();
        assert_eq!(resolved.kind, Kind::Sequence);
    }

    #[test]
    fn bare_structural_descriptor_still_resolves() {
        let desc = TypeDesc::Sequence(None);
        let resolved = resolve_kind(Some(&desc), WireTag::List).unwrap();
        assert_eq!(resolved.kind, Kind::Sequence);
    }

    #[test]
    fn infer_scalars_with_canonical_defaults() {
        let cases = [
            (WireTag::Bool, Kind::Bool, TypeDesc::Bool),
            (WireTag::Int, Kind::Int(IntWidth::W64), TypeDesc::Int(IntWidth::W64)),
            (WireTag::Float, Kind::Float64, TypeDesc::Float64),
            (WireTag::String, Kind::String, TypeDesc::String),
        ];
        for (tag, kind, desc) in cases {
            for given in [None, Some(&TypeDesc::Any)] {
                let resolved = resolve_kind(given, tag).unwrap();
                assert_eq!(resolved.kind, kind, "{tag}");
                assert_eq!(resolved.desc, &desc, "{tag}");
            }
        }
    }

    #[test]
    fn structural_tags_cannot_be_inferred() {
        for tag in [WireTag::List, WireTag::Map] {
            assert_eq!(resolve_kind(None, tag), Err(ConvertError::CannotInferKind(tag)));
            assert_eq!(
                resolve_kind(Some(&TypeDesc::Any), tag),
                Err(ConvertError::CannotInferKind(tag))
            );
        }
    }

    #[test]
    fn defaults_are_static_borrows() {
        let desc: &'static TypeDesc = default_descriptor(Kind::Int(IntWidth::W64)).unwrap();
        assert_eq!(desc, &DEFAULT_INT);
        assert_eq!(default_descriptor(Kind::Bool), Some(&DEFAULT_BOOL));
        assert_eq!(default_descriptor(Kind::String), Some(&DEFAULT_STRING));
    }

    #[test]
    fn no_defaults_for_structural_or_sized_kinds() {
        assert_eq!(default_descriptor(Kind::Sequence), None);
        assert_eq!(default_descriptor(Kind::Mapping), None);
        assert_eq!(default_descriptor(Kind::Int(IntWidth::W8)), None);
        assert_eq!(default_descriptor(Kind::Float64), Some(&TypeDesc::Float64));
    }
}
