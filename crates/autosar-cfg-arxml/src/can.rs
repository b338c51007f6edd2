// crates/autosar-cfg-arxml/src/can.rs

//! CAN controller configuration generator.

use crate::document::{ArxmlDocument, AutosarVersion, DEFAULT_REVISION, ELEMENTS, SHORT_NAME};
use crate::error::ArxmlError;
use crate::tree::Element;
use autosar_cfg::{resolve_timing, CanConfigParams, CanConfigRequest, TimingParameters};
use log::{debug, info, trace};

/// Package holding the controller.
pub const CAN_PACKAGE: &str = "CanConfiguration";

/// `CAN-OBJECT-ID` of the first hardware object; the following objects count
/// up from here.
pub const HW_OBJECT_ID_BASE: u32 = 0x100;

/// Error counter level that raises the controller's warning state.
pub const ERROR_WARNING_THRESHOLD: u32 = 96;

/// Direction of a hardware message object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectDirection {
    Transmit,
    Receive,
}

impl ObjectDirection {
    /// Even objects transmit, odd objects receive.
    pub fn for_index(index: u32) -> Self {
        if index % 2 == 0 {
            ObjectDirection::Transmit
        } else {
            ObjectDirection::Receive
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectDirection::Transmit => "TRANSMIT",
            ObjectDirection::Receive => "RECEIVE",
        }
    }
}

/// Generates a complete CAN configuration document.
///
/// # Errors
/// Returns `InvalidParameters` if `params` fails validation. Nothing is
/// built in that case.
pub fn generate_can_config(params: &CanConfigParams) -> Result<String, ArxmlError> {
    info!(
        "Generating CAN config for {} ECU at {} kbps",
        params.ecu_type, params.baudrate_kbps
    );
    build_can_document(params)?.serialize(true)
}

/// Converts a loose request and generates the document, see
/// [`generate_can_config`].
pub fn generate_can_config_from_request(request: &CanConfigRequest) -> Result<String, ArxmlError> {
    let params = CanConfigParams::try_from(request)?;
    generate_can_config(&params)
}

/// Builds the CAN document tree without serializing it.
pub fn build_can_document(params: &CanConfigParams) -> Result<ArxmlDocument, ArxmlError> {
    params.validate()?;

    let mut doc = ArxmlDocument::new(AutosarVersion::default());
    doc.add_admin_data(DEFAULT_REVISION);

    let elements = doc
        .package(CAN_PACKAGE)
        .find_or_insert_child(|c| c.local_name() == ELEMENTS, || Element::new(ELEMENTS));
    elements.push_child(build_controller(params));

    Ok(doc)
}

fn build_controller(params: &CanConfigParams) -> Element {
    let mut controller = Element::new("CAN-CONTROLLER");
    controller.add_text_child(SHORT_NAME, format!("CanController_{}", params.ecu_type));

    let timing = resolve_timing(params.baudrate_kbps);
    debug!(
        "Bit timing for {} kbps: {:?}",
        params.baudrate_kbps, timing
    );
    controller.push_child(build_baudrate_config(params.baudrate_kbps, &timing));

    for index in 0..u32::from(params.message_objects) {
        controller.push_child(build_hw_object(index));
    }

    if params.error_handling {
        controller.push_child(build_error_handling());
    }
    if params.wakeup_support {
        controller.push_child(build_wakeup_support());
    }
    controller
}

fn build_baudrate_config(baudrate_kbps: u32, timing: &TimingParameters) -> Element {
    let mut config = Element::new("CAN-CONTROLLER-BAUDRATE-CONFIG");
    // Written in bit/s
    config.add_text_child("BAUDRATE", (u64::from(baudrate_kbps) * 1000).to_string());
    config.add_text_child("PROP-SEG", timing.prop_seg.to_string());
    config.add_text_child("PHASE-SEG1", timing.phase_seg1.to_string());
    config.add_text_child("PHASE-SEG2", timing.phase_seg2.to_string());
    config.add_text_child("SYNC-JUMP-WIDTH", timing.sync_jump_width.to_string());
    config
}

fn build_hw_object(index: u32) -> Element {
    let direction = ObjectDirection::for_index(index);
    let id = HW_OBJECT_ID_BASE + index;
    trace!("CanHwObject_{}: {} id {}", index, direction.as_str(), id);

    let mut object = Element::new("CAN-HW-OBJECT");
    object.add_text_child(SHORT_NAME, format!("CanHwObject_{}", index));
    object.add_text_child("OBJECT-TYPE", direction.as_str());
    object.add_text_child("ID-TYPE", "STANDARD");
    object.add_text_child("CAN-OBJECT-ID", id.to_string());
    object
}

fn build_error_handling() -> Element {
    let mut config = Element::new("CAN-ERROR-HANDLING");
    config.add_text_child("BUS-OFF-RECOVERY", "AUTOMATIC");
    config.add_text_child("ERROR-PASSIVE-MODE", "ENABLED");
    config.add_text_child("ERROR-WARNING-THRESHOLD", ERROR_WARNING_THRESHOLD.to_string());
    config
}

fn build_wakeup_support() -> Element {
    let mut config = Element::new("CAN-WAKEUP-SUPPORT");
    config.add_text_child("WAKEUP-ENABLED", "true");
    config.add_text_child("WAKEUP-FILTER-ENABLED", "true");
    config
}
