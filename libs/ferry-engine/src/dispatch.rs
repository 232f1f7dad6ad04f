use ferry_api::{HostType, HostValue, Kind, TypeDesc, WireValue};

use crate::config::ConvertConfig;
use crate::error::ConvertError;
use crate::resolve::resolve_kind;
use crate::{mapping, scalar, sequence};

/// Convert `value` with the default configuration.
///
/// `desc == None` behaves like `Some(&TypeDesc::Any)`.
pub fn convert(value: &WireValue, desc: Option<&TypeDesc>) -> Result<HostValue, ConvertError> {
    Converter::default().convert(value, desc)
}

/// Entry point of the engine. Holds no state besides its configuration, so
/// one instance can be shared across threads freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct Converter {
    config: ConvertConfig,
}

impl Converter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Convert a top-level wire value.
    pub fn convert(
        &self,
        value: &WireValue,
        desc: Option<&TypeDesc>,
    ) -> Result<HostValue, ConvertError> {
        self.convert_at(value, desc, 0).inspect_err(|e| {
            tracing::debug!(
                tag = %value.tag(),
                desc = %desc.unwrap_or(&TypeDesc::Any),
                error = %e,
                "conversion failed"
            );
        })
    }

    /// Convert into a Rust type, using the type's own descriptor.
    pub fn convert_into<T: HostType>(&self, value: &WireValue) -> Result<T, ConvertError> {
        let desc = T::descriptor();
        let host = self.convert(value, Some(&desc))?;
        T::from_host(host).ok_or(ConvertError::HostShape {
            expected: std::any::type_name::<T>(),
        })
    }

    /// Resolve the target kind and route to its converter. Structural
    /// converters call back here with `depth + 1`.
    pub(crate) fn convert_at(
        &self,
        value: &WireValue,
        desc: Option<&TypeDesc>,
        depth: usize,
    ) -> Result<HostValue, ConvertError> {
        if depth > self.config.max_depth {
            return Err(ConvertError::MaxDepthExceeded {
                limit: self.config.max_depth,
            });
        }

        let resolved = resolve_kind(desc, value.tag())?;
        tracing::trace!(tag = %value.tag(), kind = %resolved.kind, depth, "dispatch");

        match resolved.kind {
            Kind::Bool => scalar::to_bool(value),
            Kind::Int(width) => scalar::to_int(value, width),
            Kind::Uint(width) => scalar::to_uint(value, width),
            Kind::Float32 => scalar::to_float32(value),
            Kind::Float64 => scalar::to_float64(value),
            Kind::String => scalar::to_string(value),
            Kind::Sequence => sequence::convert(self, value, resolved.desc, depth),
            Kind::Mapping => mapping::convert(self, value, resolved.desc, depth),
        }
    }
}
