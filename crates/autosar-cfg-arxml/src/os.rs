// crates/autosar-cfg-arxml/src/os.rs

use crate::error::ArxmlError;
use autosar_cfg::{ModuleKind, OsConfigParams, OsConfigRequest};
use log::info;

/// Validates an OS request and reports that OS generation is not available.
///
/// Invalid requests still fail with `InvalidParameters`, so a caller sees the
/// same validation behavior as for the CAN and NvM generators.
pub fn generate_os_config(request: &OsConfigRequest) -> Result<String, ArxmlError> {
    let params = OsConfigParams::try_from(request)?;
    info!(
        "Generating OS config for {} tasks, {} ms tick, {}",
        params.task_count,
        params.tick_duration_ms,
        params.scheduling_policy.as_str()
    );
    Err(ArxmlError::NotImplemented {
        module: ModuleKind::Os.label(),
    })
}
