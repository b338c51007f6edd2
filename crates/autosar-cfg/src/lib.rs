// crates/autosar-cfg/src/lib.rs

#![cfg_attr(not(feature = "std"), no_std)]
#![doc = "Platform-agnostic domain core for AUTOSAR CAN and NvM configuration."]
#![doc = ""]
#![doc = "This `no_std + alloc` crate holds everything that does not need an XML tree:"]
#![doc = "- typed parameter records and the fail-fast conversion from loose requests,"]
#![doc = "- the CAN bit-timing lookup table,"]
#![doc = "- the NvM write-strategy table,"]
#![doc = "- the catalog of operations offered by the configuration engine."]

// 'alloc' is used for owned strings in requests and errors
extern crate alloc;

pub mod error;
pub mod params;
pub mod timing;
pub mod tools;
pub mod types;

// --- Top-level Exports ---
pub use error::ParamError;
pub use params::{
    CanConfigParams, CanConfigRequest, NvmConfigParams, NvmConfigRequest, OsConfigParams,
    OsConfigRequest,
};
pub use timing::{resolve_timing, Baudrate, TimingParameters};
pub use tools::{find_tool, ToolDescriptor, ToolParameter, TOOLS};
pub use types::{EcuType, ModuleKind, SchedulingPolicy, WriteStrategy};
