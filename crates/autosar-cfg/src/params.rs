// crates/autosar-cfg/src/params.rs

//! Request records and the typed parameter records they are converted into.
//!
//! A `*Request` mirrors what a transport layer receives: every field is
//! optional and uses the camelCase wire names. Converting it with `TryFrom`
//! checks required fields and ranges up front and fills in the documented
//! defaults, so the generators only ever see a complete `*Params` record.

use crate::error::ParamError;
use crate::types::{EcuType, SchedulingPolicy, WriteStrategy};
use alloc::format;
use alloc::string::{String, ToString};
use core::fmt::Display;
use serde::{Deserialize, Serialize};

// --- Limits ---

/// Highest CAN baudrate accepted, in kbps.
pub const MAX_BAUDRATE_KBPS: u32 = 1000;
/// Highest number of CAN hardware objects per controller.
pub const MAX_MESSAGE_OBJECTS: u8 = 128;
/// Highest number of NvM blocks per descriptor.
pub const MAX_BLOCK_COUNT: u16 = 256;
/// Highest NvM block length in bytes.
pub const MAX_BLOCK_SIZE: u16 = u16::MAX;
/// Highest number of OS tasks.
pub const MAX_TASK_COUNT: u8 = 32;
/// OS tick duration bounds, in milliseconds.
pub const MIN_TICK_DURATION_MS: f64 = 0.1;
pub const MAX_TICK_DURATION_MS: f64 = 100.0;

// --- CAN ---

/// Loose CAN request as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanConfigRequest {
    pub ecu_type: Option<String>,
    /// Baudrate in kbps.
    pub baudrate: Option<i64>,
    pub message_objects: Option<i64>,
    pub error_handling: Option<bool>,
    pub wakeup_support: Option<bool>,
}

/// Validated CAN controller parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanConfigParams {
    pub ecu_type: EcuType,
    /// Baudrate in kbps. Rates outside the timing table are accepted and
    /// use the fallback timing row.
    #[serde(rename = "baudrate")]
    pub baudrate_kbps: u32,
    pub message_objects: u8,
    pub error_handling: bool,
    pub wakeup_support: bool,
}

impl CanConfigParams {
    /// Creates a record with the default flags (error handling on, wakeup off).
    pub fn new(ecu_type: EcuType, baudrate_kbps: u32, message_objects: u8) -> Self {
        Self {
            ecu_type,
            baudrate_kbps,
            message_objects,
            error_handling: true,
            wakeup_support: false,
        }
    }

    /// Re-checks the numeric ranges. Called by the generator as well, since
    /// the fields are public.
    pub fn validate(&self) -> Result<(), ParamError> {
        check_range("baudrate", self.baudrate_kbps, 1, MAX_BAUDRATE_KBPS)?;
        check_range("messageObjects", self.message_objects, 1, MAX_MESSAGE_OBJECTS)?;
        Ok(())
    }
}

impl TryFrom<&CanConfigRequest> for CanConfigParams {
    type Error = ParamError;

    fn try_from(request: &CanConfigRequest) -> Result<Self, Self::Error> {
        let ecu_type = required(request.ecu_type.as_deref(), "ecuType")?;
        let baudrate = required(request.baudrate, "baudrate")?;
        let message_objects = required(request.message_objects, "messageObjects")?;

        let ecu_type = EcuType::from_name(ecu_type).ok_or_else(|| ParamError::UnknownVariant {
            field: "ecuType",
            value: ecu_type.to_string(),
        })?;

        let params = Self {
            ecu_type,
            baudrate_kbps: bounded("baudrate", baudrate, 1, i64::from(MAX_BAUDRATE_KBPS))?,
            message_objects: bounded(
                "messageObjects",
                message_objects,
                1,
                i64::from(MAX_MESSAGE_OBJECTS),
            )?,
            error_handling: request.error_handling.unwrap_or(true),
            wakeup_support: request.wakeup_support.unwrap_or(false),
        };
        Ok(params)
    }
}

impl TryFrom<CanConfigRequest> for CanConfigParams {
    type Error = ParamError;

    fn try_from(request: CanConfigRequest) -> Result<Self, Self::Error> {
        Self::try_from(&request)
    }
}

// --- NvM ---

/// Loose NvM request as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NvmConfigRequest {
    pub block_count: Option<i64>,
    /// Block length in bytes.
    pub block_size: Option<i64>,
    pub write_strategy: Option<String>,
    pub crc_protection: Option<bool>,
    pub redundancy: Option<bool>,
    pub wear_leveling: Option<bool>,
}

/// Validated NvM block parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NvmConfigParams {
    pub block_count: u16,
    pub block_size: u16,
    pub write_strategy: WriteStrategy,
    pub crc_protection: bool,
    pub redundancy: bool,
    pub wear_leveling: bool,
}

impl NvmConfigParams {
    /// Creates a record with the default flags (CRC on, redundancy off,
    /// wear leveling on).
    pub fn new(block_count: u16, block_size: u16, write_strategy: WriteStrategy) -> Self {
        Self {
            block_count,
            block_size,
            write_strategy,
            crc_protection: true,
            redundancy: false,
            wear_leveling: true,
        }
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        check_range("blockCount", self.block_count, 1, MAX_BLOCK_COUNT)?;
        check_range("blockSize", self.block_size, 1, MAX_BLOCK_SIZE)?;
        Ok(())
    }
}

impl TryFrom<&NvmConfigRequest> for NvmConfigParams {
    type Error = ParamError;

    /// The write strategy is resolved with the table's fallback policy: an
    /// unknown name becomes cyclic writing instead of an error.
    fn try_from(request: &NvmConfigRequest) -> Result<Self, Self::Error> {
        let block_count = required(request.block_count, "blockCount")?;
        let block_size = required(request.block_size, "blockSize")?;
        let write_strategy = required(request.write_strategy.as_deref(), "writeStrategy")?;

        Ok(Self {
            block_count: bounded("blockCount", block_count, 1, i64::from(MAX_BLOCK_COUNT))?,
            block_size: bounded("blockSize", block_size, 1, i64::from(MAX_BLOCK_SIZE))?,
            write_strategy: WriteStrategy::resolve(write_strategy),
            crc_protection: request.crc_protection.unwrap_or(true),
            redundancy: request.redundancy.unwrap_or(false),
            wear_leveling: request.wear_leveling.unwrap_or(true),
        })
    }
}

impl TryFrom<NvmConfigRequest> for NvmConfigParams {
    type Error = ParamError;

    fn try_from(request: NvmConfigRequest) -> Result<Self, Self::Error> {
        Self::try_from(&request)
    }
}

// --- OS ---

/// Loose OS request. OS generation is not implemented yet; the record is
/// still validated so callers get consistent errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OsConfigRequest {
    pub task_count: Option<i64>,
    /// Tick duration in milliseconds.
    pub tick_duration: Option<f64>,
    pub scheduling_policy: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsConfigParams {
    pub task_count: u8,
    #[serde(rename = "tickDuration")]
    pub tick_duration_ms: f64,
    pub scheduling_policy: SchedulingPolicy,
}

impl TryFrom<&OsConfigRequest> for OsConfigParams {
    type Error = ParamError;

    fn try_from(request: &OsConfigRequest) -> Result<Self, Self::Error> {
        let task_count = required(request.task_count, "taskCount")?;
        let tick_duration = required(request.tick_duration, "tickDuration")?;

        let scheduling_policy = match request.scheduling_policy.as_deref() {
            None => SchedulingPolicy::default(),
            Some(name) => {
                SchedulingPolicy::from_name(name).ok_or_else(|| ParamError::UnknownVariant {
                    field: "schedulingPolicy",
                    value: name.to_string(),
                })?
            }
        };

        Ok(Self {
            task_count: bounded("taskCount", task_count, 1, i64::from(MAX_TASK_COUNT))?,
            tick_duration_ms: check_range(
                "tickDuration",
                tick_duration,
                MIN_TICK_DURATION_MS,
                MAX_TICK_DURATION_MS,
            )?,
            scheduling_policy,
        })
    }
}

// --- Helper Functions ---

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ParamError> {
    value.ok_or(ParamError::MissingField { field })
}

fn out_of_range<T: Display>(field: &'static str, value: T, min: T, max: T) -> ParamError {
    ParamError::OutOfRange {
        field,
        value: value.to_string(),
        range: format!("{}..={}", min, max),
    }
}

/// Returns `value` if `min <= value <= max`. NaN never passes.
fn check_range<T: PartialOrd + Display + Copy>(
    field: &'static str,
    value: T,
    min: T,
    max: T,
) -> Result<T, ParamError> {
    if value >= min && value <= max {
        Ok(value)
    } else {
        Err(out_of_range(field, value, min, max))
    }
}

/// Range-checks a wire integer and narrows it to the record's field type.
fn bounded<T: TryFrom<i64>>(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<T, ParamError> {
    check_range(field, value, min, max)?;
    T::try_from(value).map_err(|_| out_of_range(field, value, min, max))
}
