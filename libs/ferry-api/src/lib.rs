pub mod descriptor;
pub mod host;
pub mod value;

pub use descriptor::{DescriptorError, IntWidth, Kind, TypeDesc};
pub use host::{HostKey, HostType, HostValue};
pub use value::{WireTag, WireValue};
