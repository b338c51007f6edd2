// crates/autosar-cfg-arxml/src/nvm.rs

//! NvM block configuration generator.
//!
//! Blocks are laid out back to back in a simulated EEPROM: block `i` starts
//! at `i * block_size` and carries the 1-based id `i + 1`.

use crate::document::{ArxmlDocument, AutosarVersion, DEFAULT_REVISION, ELEMENTS, SHORT_NAME};
use crate::error::ArxmlError;
use crate::tree::Element;
use autosar_cfg::{NvmConfigParams, NvmConfigRequest};
use log::{debug, info, trace};

pub const NVM_PACKAGE: &str = "NvMConfiguration";
pub const BLOCK_DESCRIPTOR_NAME: &str = "NvMBlockConfiguration";
pub const STORAGE_DEVICE: &str = "EEPROM";
pub const CRC_TYPE: &str = "NVM_CRC_16";
/// Write cycles before wear leveling moves a block.
pub const WEAR_LEVELING_THRESHOLD: u32 = 1000;

/// Generates a complete NvM configuration document.
///
/// # Errors
/// Returns `InvalidParameters` if `params` fails validation.
pub fn generate_nvm_config(params: &NvmConfigParams) -> Result<String, ArxmlError> {
    info!(
        "Generating NvM config with {} blocks of {} bytes",
        params.block_count, params.block_size
    );
    build_nvm_document(params)?.serialize(true)
}

/// Converts a loose request and generates the document. Unknown write
/// strategies fall back to cyclic writing.
pub fn generate_nvm_config_from_request(request: &NvmConfigRequest) -> Result<String, ArxmlError> {
    let params = NvmConfigParams::try_from(request)?;
    generate_nvm_config(&params)
}

pub fn build_nvm_document(params: &NvmConfigParams) -> Result<ArxmlDocument, ArxmlError> {
    params.validate()?;

    let mut doc = ArxmlDocument::new(AutosarVersion::default());
    doc.add_admin_data(DEFAULT_REVISION);

    let elements = doc
        .package(NVM_PACKAGE)
        .find_or_insert_child(|c| c.local_name() == ELEMENTS, || Element::new(ELEMENTS));
    elements.push_child(build_descriptor(params));

    Ok(doc)
}

fn build_descriptor(params: &NvmConfigParams) -> Element {
    let mut descriptor = Element::new("NVM-BLOCK-DESCRIPTOR");
    descriptor.add_text_child(SHORT_NAME, BLOCK_DESCRIPTOR_NAME);

    debug!(
        "NvM write strategy {} -> {}",
        params.write_strategy.as_str(),
        params.write_strategy.arxml_value()
    );
    let blocks = descriptor.add_child("NVM-BLOCKS");
    for index in 0..u32::from(params.block_count) {
        blocks.push_child(build_block(params, index));
    }

    if params.wear_leveling {
        let wear = descriptor.add_child("NVM-WEAR-LEVELING");
        wear.add_text_child("WEAR-LEVELING-ENABLED", "true");
        wear.add_text_child("WEAR-LEVELING-THRESHOLD", WEAR_LEVELING_THRESHOLD.to_string());
    }
    descriptor
}

fn build_block(params: &NvmConfigParams, index: u32) -> Element {
    // 256 blocks of at most 65535 bytes stay well inside u32.
    let address = index * u32::from(params.block_size);
    trace!("NvMBlock_{} at {:#x}", index, address);

    let mut block = Element::new("NVM-BLOCK");
    block.add_text_child(SHORT_NAME, format!("NvMBlock_{}", index));
    block.add_text_child("NVM-BLOCK-ID", (index + 1).to_string());
    block.add_text_child("NVM-BLOCK-LENGTH", params.block_size.to_string());
    block.add_text_child("NVM-WRITE-STRATEGY", params.write_strategy.arxml_value());

    if params.crc_protection {
        block
            .add_child("NVM-BLOCK-CRC-TYPE")
            .add_text_child("CRC-TYPE", CRC_TYPE);
    }
    if params.redundancy {
        block
            .add_child("NVM-REDUNDANCY")
            .add_text_child("REDUNDANT-BLOCK-COUNT", "1");
    }

    let storage = block.add_child("NVM-BLOCK-STORAGE");
    storage.add_text_child("STORAGE-DEVICE", STORAGE_DEVICE);
    storage.add_text_child("STORAGE-ADDRESS", format!("{:#x}", address));
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use autosar_cfg::{ParamError, WriteStrategy};

    fn blocks(doc: &ArxmlDocument) -> Vec<&Element> {
        doc.root().descendants_named("NVM-BLOCK").collect()
    }

    fn text<'a>(element: &'a Element, path: &[&str]) -> Option<&'a str> {
        let mut current = element;
        for name in path {
            current = current.child(name)?;
        }
        current.text()
    }

    #[test]
    fn test_block_ids_lengths_and_addresses() {
        let params = NvmConfigParams::new(4, 16, WriteStrategy::Immediate);
        let doc = build_nvm_document(&params).unwrap();
        let blocks = blocks(&doc);
        assert_eq!(blocks.len(), 4);

        let addresses: Vec<_> = blocks
            .iter()
            .filter_map(|b| text(b, &["NVM-BLOCK-STORAGE", "STORAGE-ADDRESS"]))
            .collect();
        assert_eq!(addresses, ["0x0", "0x10", "0x20", "0x30"]);

        for (i, block) in blocks.iter().enumerate() {
            assert_eq!(block.short_name(), Some(format!("NvMBlock_{}", i).as_str()));
            assert_eq!(text(block, &["NVM-BLOCK-ID"]), Some((i + 1).to_string().as_str()));
            assert_eq!(text(block, &["NVM-BLOCK-LENGTH"]), Some("16"));
            assert_eq!(text(block, &["NVM-WRITE-STRATEGY"]), Some("NVM_WRITE_BLOCK_ONCE"));
            assert_eq!(
                text(block, &["NVM-BLOCK-STORAGE", "STORAGE-DEVICE"]),
                Some("EEPROM")
            );
        }
    }

    #[test]
    fn test_default_flags() {
        let doc = build_nvm_document(&NvmConfigParams::new(1, 8, WriteStrategy::Deferred)).unwrap();
        let block = blocks(&doc)[0];
        assert_eq!(text(block, &["NVM-BLOCK-CRC-TYPE", "CRC-TYPE"]), Some("NVM_CRC_16"));
        assert!(block.child("NVM-REDUNDANCY").is_none());

        let descriptor = doc
            .root()
            .descendants_named("NVM-BLOCK-DESCRIPTOR")
            .next()
            .unwrap();
        assert_eq!(descriptor.short_name(), Some(BLOCK_DESCRIPTOR_NAME));
        assert_eq!(
            text(descriptor, &["NVM-WEAR-LEVELING", "WEAR-LEVELING-THRESHOLD"]),
            Some("1000")
        );
    }

    #[test]
    fn test_flags_toggle_sections() {
        let params = NvmConfigParams {
            crc_protection: false,
            redundancy: true,
            wear_leveling: false,
            ..NvmConfigParams::new(2, 8, WriteStrategy::Triggered)
        };
        let doc = build_nvm_document(&params).unwrap();
        let block = blocks(&doc)[1];
        assert!(block.child("NVM-BLOCK-CRC-TYPE").is_none());
        assert_eq!(
            text(block, &["NVM-REDUNDANCY", "REDUNDANT-BLOCK-COUNT"]),
            Some("1")
        );
        assert_eq!(text(block, &["NVM-WRITE-STRATEGY"]), Some("NVM_WRITE_BLOCK_TRIGGERED"));
        assert_eq!(doc.root().descendants_named("NVM-WEAR-LEVELING").count(), 0);
    }

    #[test]
    fn test_largest_layout_addresses() {
        let params = NvmConfigParams::new(256, u16::MAX, WriteStrategy::Deferred);
        let doc = build_nvm_document(&params).unwrap();
        let last = *blocks(&doc).last().unwrap();
        assert_eq!(text(last, &["NVM-BLOCK-ID"]), Some("256"));
        assert_eq!(
            text(last, &["NVM-BLOCK-STORAGE", "STORAGE-ADDRESS"]),
            Some(format!("{:#x}", 255u32 * 65535).as_str())
        );
    }

    #[test]
    fn test_unknown_strategy_from_request_is_cyclic() {
        let request = NvmConfigRequest {
            block_count: Some(1),
            block_size: Some(32),
            write_strategy: Some("whenever".into()),
            ..Default::default()
        };
        let xml = generate_nvm_config_from_request(&request).unwrap();
        assert!(xml.contains("<NVM-WRITE-STRATEGY>NVM_WRITE_BLOCK_CYCLIC</NVM-WRITE-STRATEGY>"));
    }

    #[test]
    fn test_invalid_block_count() {
        let params = NvmConfigParams::new(257, 16, WriteStrategy::Deferred);
        assert!(matches!(
            generate_nvm_config(&params),
            Err(ArxmlError::InvalidParameters(ParamError::OutOfRange { field: "blockCount", .. }))
        ));
    }
}
