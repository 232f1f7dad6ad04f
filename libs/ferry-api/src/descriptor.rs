use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Bit width of an integer target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    #[default]
    W64,
}

impl IntWidth {
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(IntWidth::W8),
            16 => Some(IntWidth::W16),
            32 => Some(IntWidth::W32),
            64 => Some(IntWidth::W64),
            _ => None,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }
}

/// Requested host shape for a conversion.
///
/// Supplied by the call site, either built directly, derived from a Rust
/// type via [`crate::host::HostType`], or parsed from its text form:
///
/// - `any`, `bool`, `string`, `float32`, `float64`
/// - `int`, `int8` .. `int64`, `uint`, `uint8` .. `uint64` (bare = 64 bits)
/// - `list<T>`, `map<K, V>`
///
/// A bare `list` or `map` is representable (a schema may not say what the
/// elements are) but nothing can be converted into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeDesc {
    /// Infer from the wire tag. Scalars only.
    Any,
    Bool,
    Int(IntWidth),
    Uint(IntWidth),
    Float32,
    Float64,
    String,
    Sequence(Option<Box<TypeDesc>>),
    /// `(key, value)` descriptors.
    Mapping(Option<Box<(TypeDesc, TypeDesc)>>),
}

/// Resolved category of a conversion target. Drives converter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int(IntWidth),
    Uint(IntWidth),
    Float32,
    Float64,
    String,
    Sequence,
    Mapping,
}

impl Kind {
    pub fn is_structural(self) -> bool {
        matches!(self, Kind::Sequence | Kind::Mapping)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Bool => f.write_str("bool"),
            Kind::Int(w) => write!(f, "int{}", w.bits()),
            Kind::Uint(w) => write!(f, "uint{}", w.bits()),
            Kind::Float32 => f.write_str("float32"),
            Kind::Float64 => f.write_str("float64"),
            Kind::String => f.write_str("string"),
            Kind::Sequence => f.write_str("list"),
            Kind::Mapping => f.write_str("map"),
        }
    }
}

impl TypeDesc {
    pub fn sequence(element: TypeDesc) -> Self {
        TypeDesc::Sequence(Some(Box::new(element)))
    }

    pub fn mapping(key: TypeDesc, value: TypeDesc) -> Self {
        TypeDesc::Mapping(Some(Box::new((key, value))))
    }

    /// `None` for `Any`: the kind has to be inferred from the wire tag.
    pub fn kind(&self) -> Option<Kind> {
        match self {
            TypeDesc::Any => None,
            TypeDesc::Bool => Some(Kind::Bool),
            TypeDesc::Int(w) => Some(Kind::Int(*w)),
            TypeDesc::Uint(w) => Some(Kind::Uint(*w)),
            TypeDesc::Float32 => Some(Kind::Float32),
            TypeDesc::Float64 => Some(Kind::Float64),
            TypeDesc::String => Some(Kind::String),
            TypeDesc::Sequence(_) => Some(Kind::Sequence),
            TypeDesc::Mapping(_) => Some(Kind::Mapping),
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Any => f.write_str("any"),
            TypeDesc::Sequence(Some(elem)) => write!(f, "list<{elem}>"),
            TypeDesc::Mapping(Some(kv)) => write!(f, "map<{}, {}>", kv.0, kv.1),
            other => match other.kind() {
                Some(kind) => write!(f, "{kind}"),
                None => f.write_str("any"),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Text form
// ---------------------------------------------------------------------------

/// Failure to parse a descriptor from its text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    Empty,
    UnknownType(String),
    Malformed { input: String, reason: &'static str },
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorError::Empty => f.write_str("empty type descriptor"),
            DescriptorError::UnknownType(name) => write!(f, "unknown type '{name}'"),
            DescriptorError::Malformed { input, reason } => {
                write!(f, "malformed type descriptor '{input}': {reason}")
            }
        }
    }
}

impl std::error::Error for DescriptorError {}

impl FromStr for TypeDesc {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(DescriptorError::Empty);
        }
        let mut parser = Parser { input, pos: 0 };
        let desc = parser.desc()?;
        parser.skip_ws();
        if parser.pos != input.len() {
            return Err(parser.malformed("unexpected trailing input"));
        }
        Ok(desc)
    }
}

impl TryFrom<String> for TypeDesc {
    type Error = DescriptorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TypeDesc> for String {
    fn from(desc: TypeDesc) -> Self {
        desc.to_string()
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn desc(&mut self) -> Result<TypeDesc, DescriptorError> {
        self.skip_ws();
        let name = self.ident();
        if name.is_empty() {
            return Err(self.malformed("expected a type name"));
        }
        let desc = match name {
            "any" => TypeDesc::Any,
            "bool" => TypeDesc::Bool,
            "string" => TypeDesc::String,
            "float32" => TypeDesc::Float32,
            "float64" => TypeDesc::Float64,
            "int" => TypeDesc::Int(IntWidth::W64),
            "uint" => TypeDesc::Uint(IntWidth::W64),
            "list" => {
                if !self.eat('<') {
                    return Ok(TypeDesc::Sequence(None));
                }
                let elem = self.desc()?;
                self.expect('>')?;
                TypeDesc::sequence(elem)
            }
            "map" => {
                if !self.eat('<') {
                    return Ok(TypeDesc::Mapping(None));
                }
                let key = self.desc()?;
                self.expect(',')?;
                let value = self.desc()?;
                self.expect('>')?;
                TypeDesc::mapping(key, value)
            }
            other => {
                sized_int(other).ok_or_else(|| DescriptorError::UnknownType(other.to_string()))?
            }
        };
        Ok(desc)
    }

    fn ident(&mut self) -> &'a str {
        let start = self.pos;
        let rest = &self.input[start..];
        let len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        self.pos += len;
        &self.input[start..self.pos]
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.input[self.pos..].starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), DescriptorError> {
        if self.eat(c) {
            Ok(())
        } else if c == '>' {
            Err(self.malformed("expected '>'"))
        } else {
            Err(self.malformed("expected ','"))
        }
    }

    fn skip_ws(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn malformed(&self, reason: &'static str) -> DescriptorError {
        DescriptorError::Malformed {
            input: self.input.to_string(),
            reason,
        }
    }
}

fn sized_int(name: &str) -> Option<TypeDesc> {
    if let Some(bits) = name.strip_prefix("uint") {
        let width = IntWidth::from_bits(bits.parse().ok()?)?;
        return Some(TypeDesc::Uint(width));
    }
    let bits = name.strip_prefix("int")?;
    let width = IntWidth::from_bits(bits.parse().ok()?)?;
    Some(TypeDesc::Int(width))
}
