// crates/autosar-cfg-arxml/src/validator.rs

//! Structural checks on arbitrary ARXML text.
//!
//! The validator never fails: every problem it finds becomes an entry in the
//! returned [`ValidationReport`]. Errors make the document invalid, warnings
//! and recommendations do not.

use crate::document::{AutosarVersion, AR_PACKAGES, AUTOSAR, AUTOSAR_NAMESPACE, SHORT_NAME};
use crate::reader::parse_element;
use crate::tree::Element;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Documents shorter than this many characters get the "minimal" hint.
pub const MINIMAL_CONTENT_CHARS: usize = 500;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// `true` iff `errors` is empty.
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    /// Number of elements below the root element.
    pub element_count: usize,
}

/// Append-only collector for the findings of one validation run.
#[derive(Debug, Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
    recommendations: Vec<String>,
}

impl Findings {
    fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("Validation error: {}", message);
        self.errors.push(message);
    }

    fn warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("Validation warning: {}", message);
        self.warnings.push(message);
    }

    fn recommend(&mut self, message: impl Into<String>) {
        self.recommendations.push(message.into());
    }

    fn into_report(self, element_count: usize) -> ValidationReport {
        ValidationReport {
            valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
            recommendations: self.recommendations,
            element_count,
        }
    }
}

/// Validates `content` against the given AUTOSAR release.
///
/// A document that fails to parse yields a single `XML syntax error` entry
/// and an element count of zero; the remaining checks only run on parsed
/// documents.
pub fn validate_arxml(content: &str, version: AutosarVersion) -> ValidationReport {
    info!("Validating ARXML against AUTOSAR {}", version);
    let mut findings = Findings::default();

    let root = match parse_element(content) {
        Ok(root) => root,
        Err(e) => {
            findings.error(format!("XML syntax error: {}", e));
            return findings.into_report(0);
        }
    };

    check_root(&root, &mut findings);
    check_packages(&root, &mut findings);
    check_namespace(&root, &mut findings);
    check_short_names(&root, &mut findings);
    recommend(content, &root, version, &mut findings);

    let report = findings.into_report(root.descendant_count());
    info!(
        "Validation finished: {} errors, {} warnings, {} elements",
        report.errors.len(),
        report.warnings.len(),
        report.element_count
    );
    report
}

/// Like [`validate_arxml`], taking the version as a label. Unknown labels are
/// validated as 4.2.2.
pub fn validate_arxml_for_label(content: &str, version_label: &str) -> ValidationReport {
    validate_arxml(content, AutosarVersion::from_label(version_label))
}

fn check_root(root: &Element, findings: &mut Findings) {
    // Any namespace is accepted for the root itself.
    if root.local_name() != AUTOSAR {
        findings.error("Root element must be <AUTOSAR>");
    }
}

fn check_packages(root: &Element, findings: &mut Findings) {
    let found = root
        .descendants()
        .any(|e| e.is(AR_PACKAGES, Some(AUTOSAR_NAMESPACE)) || e.is(AR_PACKAGES, None));
    if !found {
        findings.warning("No AR-PACKAGES found in configuration");
    }
}

fn check_namespace(root: &Element, findings: &mut Findings) {
    let declared = root
        .attribute("xmlns")
        .is_some_and(|ns| ns.contains(AUTOSAR_NAMESPACE));
    if !declared {
        findings.warning("Standard AUTOSAR namespace not declared");
    }
}

fn check_short_names(root: &Element, findings: &mut Findings) {
    let mut names = short_names(root, Some(AUTOSAR_NAMESPACE));
    if names.is_empty() {
        names = short_names(root, None);
    }

    let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
    for name in names {
        *occurrences.entry(name).or_insert(0) += 1;
    }
    let duplicates: Vec<&str> = occurrences
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name)
        .collect();

    if !duplicates.is_empty() {
        findings.warning(format!(
            "Duplicate SHORT-NAMEs found: {}",
            duplicates.join(", ")
        ));
    }
}

fn short_names<'a>(root: &'a Element, namespace: Option<&str>) -> Vec<&'a str> {
    root.descendants()
        .filter(|e| e.is(SHORT_NAME, namespace))
        .filter_map(Element::text)
        .collect()
}

fn recommend(content: &str, root: &Element, version: AutosarVersion, findings: &mut Findings) {
    if content.chars().count() < MINIMAL_CONTENT_CHARS {
        findings.recommend("Configuration seems minimal; consider adding more modules");
    }
    findings.recommend("Consider adding ADMIN-DATA section with revision history");
    findings.recommend("Verify parameter values against ECU hardware specifications");

    let schema_location = root
        .attributes()
        .iter()
        .find(|a| a.name.rsplit(':').next() == Some("schemaLocation"))
        .map(|a| a.value.as_str());
    if schema_location.is_some_and(|location| !location.contains(version.schema_file())) {
        findings.recommend(format!(
            "Schema location does not reference {}; verify the target AUTOSAR version ({})",
            version.schema_file(),
            version
        ));
    }
}
