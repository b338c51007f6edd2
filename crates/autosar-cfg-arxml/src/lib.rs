// crates/autosar-cfg-arxml/src/lib.rs

#![doc = "Generates, validates and merges AUTOSAR ARXML configuration documents."]
#![doc = ""]
#![doc = "Built on the parameter records of `autosar-cfg`, this crate provides:"]
#![doc = "- `generate_can_config` / `generate_nvm_config`: complete module documents from validated parameters."]
#![doc = "- `validate_arxml`: structural checks on arbitrary ARXML text, returned as a report."]
#![doc = "- `merge_configurations`: combines module documents under one project package."]

// --- Crate Modules ---

mod can;
mod document;
mod error;
mod merger;
mod nvm;
mod os;
mod reader;
mod tree;
mod validator;
mod writer;

// --- Public API Re-exports ---

pub use can::{
    build_can_document, generate_can_config, generate_can_config_from_request, ObjectDirection,
    CAN_PACKAGE,
};
pub use document::{
    get_or_create_package, ArxmlDocument, AutosarVersion, AUTOSAR_NAMESPACE, DEFAULT_REVISION,
    TIMESTAMP_FORMAT, XSI_NAMESPACE,
};
pub use error::ArxmlError;
pub use merger::{
    extract_packages, merge_configurations, merge_configurations_with_report,
    merge_export_request, ExportRequest, MergeReport, MergedFragment, ModuleFragment, SkipReason,
    SkippedFragment, DEFAULT_ECU_NAME, DEFAULT_PROJECT_NAME,
};
pub use nvm::{build_nvm_document, generate_nvm_config, generate_nvm_config_from_request, NVM_PACKAGE};
pub use os::generate_os_config;
pub use reader::parse_element;
pub use tree::{Attribute, Descendants, Detached, Element};
pub use validator::{validate_arxml, validate_arxml_for_label, ValidationReport};
pub use writer::write_document;

// The parameter records are part of this crate's API.
pub use autosar_cfg;
