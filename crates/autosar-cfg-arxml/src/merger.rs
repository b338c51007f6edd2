// crates/autosar-cfg-arxml/src/merger.rs

//! Combines independently generated module documents into one project
//! document.
//!
//! Each fragment is parsed into its own tree first. Only once that succeeded
//! are its packages detached and moved under the project package, so a
//! fragment that fails halfway never leaves anything behind in the result.

use crate::document::{
    get_or_create_package, ArxmlDocument, AutosarVersion, AR_PACKAGE, AUTOSAR_NAMESPACE,
    DEFAULT_REVISION, ELEMENTS, SHORT_NAME, XSI_NAMESPACE,
};
use crate::error::ArxmlError;
use crate::reader::parse_element;
use crate::tree::{Detached, Element};
use autosar_cfg::ModuleKind;
use core::fmt;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROJECT_NAME: &str = "AutosarProject";
pub const DEFAULT_ECU_NAME: &str = "ECU";
pub const UNKNOWN_MODULE: &str = "Unknown";

/// One module's serialized document, as handed to the merger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleFragment {
    #[serde(alias = "type", default = "unknown_module")]
    pub module_type: String,
    /// May be empty, in which case the fragment is skipped.
    #[serde(alias = "arxml", default)]
    pub document: String,
}

fn unknown_module() -> String {
    UNKNOWN_MODULE.to_string()
}

impl ModuleFragment {
    pub fn new(module_type: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            module_type: module_type.into(),
            document: document.into(),
        }
    }
}

/// Why a fragment contributed nothing to the merged document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// The document text was empty.
    Empty,
    /// The document could not be parsed; carries the parser's message.
    Unparsable(String),
    /// The document parsed but holds no `AR-PACKAGE`.
    NoPackages,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Empty => f.write_str("empty document"),
            SkipReason::Unparsable(message) => write!(f, "{}", message),
            SkipReason::NoPackages => f.write_str("no AR-PACKAGE found"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFragment {
    pub module_type: String,
    /// `None` when `module_type` names no known module.
    pub kind: Option<ModuleKind>,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedFragment {
    pub module_type: String,
    /// `None` when `module_type` names no known module.
    pub kind: Option<ModuleKind>,
    /// Short names of the packages moved into the project package.
    pub packages: Vec<String>,
}

/// The merged document together with what happened to each fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    pub document: String,
    pub merged: Vec<MergedFragment>,
    pub skipped: Vec<SkippedFragment>,
}

/// Export request as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportRequest {
    pub modules: Vec<ModuleFragment>,
    pub project_name: String,
    pub ecu_name: String,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            modules: Vec::new(),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            ecu_name: DEFAULT_ECU_NAME.to_string(),
        }
    }
}

/// Merges `fragments` into one document, see
/// [`merge_configurations_with_report`].
///
/// # Errors
/// Only serialization of the merged document can fail; bad fragments are
/// skipped.
pub fn merge_configurations(
    fragments: &[ModuleFragment],
    project_name: &str,
    ecu_name: &str,
) -> Result<String, ArxmlError> {
    merge_configurations_with_report(fragments, project_name, ecu_name).map(|r| r.document)
}

/// Merges an [`ExportRequest`].
pub fn merge_export_request(request: &ExportRequest) -> Result<String, ArxmlError> {
    merge_configurations(&request.modules, &request.project_name, &request.ecu_name)
}

/// Builds a document holding the project package `project_name` with an
/// `ECU-INSTANCE` named `ecu_name`, then moves the top-level packages of
/// every fragment, in order, directly into the project package.
///
/// Empty, unparsable and package-less fragments are recorded in
/// [`MergeReport::skipped`] and do not stop the merge. Duplicate short names
/// across fragments are kept as they are.
///
/// The module type of each fragment is resolved to a [`ModuleKind`]; unknown
/// and not-yet-generated kinds are logged and merged like any other.
pub fn merge_configurations_with_report(
    fragments: &[ModuleFragment],
    project_name: &str,
    ecu_name: &str,
) -> Result<MergeReport, ArxmlError> {
    info!(
        "Merging {} modules for project {}",
        fragments.len(),
        project_name
    );

    let mut doc = ArxmlDocument::new(AutosarVersion::default());
    doc.add_admin_data(DEFAULT_REVISION);

    let project = get_or_create_package(doc.root_mut(), project_name);
    project
        .find_or_insert_child(|c| c.local_name() == ELEMENTS, || Element::new(ELEMENTS))
        .add_child("ECU-INSTANCE")
        .add_text_child(SHORT_NAME, ecu_name);

    let mut merged = Vec::new();
    let mut skipped = Vec::new();

    for fragment in fragments {
        let module_type = fragment.module_type.clone();
        let kind = resolve_kind(&module_type);
        if fragment.document.trim().is_empty() {
            debug!("Skipping module {}: empty document", module_type);
            skipped.push(SkippedFragment {
                module_type,
                kind,
                reason: SkipReason::Empty,
            });
            continue;
        }

        let reason = match extract_packages(&fragment.document) {
            Ok(packages) if packages.is_empty() => SkipReason::NoPackages,
            Ok(packages) => {
                let names: Vec<String> = packages
                    .iter()
                    .map(|p| p.short_name().unwrap_or_default().to_string())
                    .collect();
                debug!("Merging module {}: {:?}", module_type, names);
                for package in packages {
                    project.push_child(package);
                }
                merged.push(MergedFragment {
                    module_type,
                    kind,
                    packages: names,
                });
                continue;
            }
            Err(e) => SkipReason::Unparsable(e.to_string()),
        };

        warn!("Failed to merge module {}: {}", module_type, reason);
        skipped.push(SkippedFragment {
            module_type,
            kind,
            reason,
        });
    }

    Ok(MergeReport {
        document: doc.serialize(true)?,
        merged,
        skipped,
    })
}

fn resolve_kind(module_type: &str) -> Option<ModuleKind> {
    let kind = ModuleKind::from_label(module_type);
    match kind {
        None => warn!("Unknown module type '{}'", module_type),
        Some(kind) if !kind.is_implemented() => {
            warn!("Module {} has no generator; merging its document as given", kind)
        }
        Some(_) => {}
    }
    kind
}

/// Parses a fragment and detaches its outermost `AR-PACKAGE` elements.
///
/// Packages bound to the AUTOSAR namespace are preferred; unbound ones are
/// only taken when there are none. Packages nested inside a taken package
/// move together with it. Every returned package is ready to be attached to
/// a document whose default namespace is the AUTOSAR one.
pub fn extract_packages(document: &str) -> Result<Vec<Element>, ArxmlError> {
    let mut root = parse_element(document)?;

    let mut detached = root.take_descendants(|e| e.is(AR_PACKAGE, Some(AUTOSAR_NAMESPACE)));
    if detached.is_empty() {
        detached = root.take_descendants(|e| e.is(AR_PACKAGE, None));
    }

    Ok(detached
        .into_iter()
        .map(|Detached { mut element, scope }| {
            adopt_into_default_namespace(&mut element, &scope);
            element
        })
        .collect())
}

/// Rewrites a detached subtree so it keeps its meaning once attached below
/// an element whose default namespace is the AUTOSAR one.
///
/// AUTOSAR-prefixed elements lose their prefix. Foreign prefixes used by the
/// subtree get their declaration (from the subtree or from `scope`, the
/// declarations of the package's former ancestors) repeated on `package`. Unprefixed elements
/// outside the AUTOSAR namespace carry an explicit `xmlns`.
pub fn adopt_into_default_namespace(package: &mut Element, scope: &[(String, String)]) {
    let mut needed = Vec::new();
    adopt_element(package, AUTOSAR_NAMESPACE, scope, &mut needed);
    for (prefix, uri) in needed {
        let name = format!("xmlns:{}", prefix);
        if package.attribute(&name).is_none() {
            package.set_attribute(name, uri);
        }
    }
}

fn adopt_element(
    element: &mut Element,
    inherited_default: &str,
    scope: &[(String, String)],
    needed: &mut Vec<(String, String)>,
) {
    if element.namespace() == Some(AUTOSAR_NAMESPACE) && element.prefix().is_some() {
        let local = element.local_name().to_string();
        element.rename(local);
    }

    let default_for_children = match element.prefix() {
        Some(prefix) => {
            if let Some(uri) = element.namespace() {
                declare(needed, prefix, uri);
            }
            element
                .attribute("xmlns")
                .unwrap_or(inherited_default)
                .to_string()
        }
        None => {
            // Unbound elements join the AUTOSAR namespace.
            let desired = element
                .namespace()
                .unwrap_or(AUTOSAR_NAMESPACE)
                .to_string();
            let stale = element.attribute("xmlns").is_some_and(|ns| ns != desired);
            if desired != inherited_default || stale {
                element.set_attribute("xmlns", desired.as_str());
            }
            desired
        }
    };

    for attribute in element.attributes() {
        let Some((prefix, _)) = attribute.name.split_once(':') else {
            continue;
        };
        if prefix == "xmlns" || prefix == "xml" {
            continue;
        }
        let own = format!("xmlns:{}", prefix);
        let uri = element.attribute(&own).or_else(|| {
            scope
                .iter()
                .rev()
                .find(|(p, _)| p == prefix)
                .map(|(_, uri)| uri.as_str())
        });
        if let Some(uri) = uri {
            declare(needed, prefix, uri);
        }
    }

    for child in &mut element.children {
        adopt_element(child, &default_for_children, scope, needed);
    }
}

fn declare(needed: &mut Vec<(String, String)>, prefix: &str, uri: &str) {
    // The target root already declares xsi.
    if prefix == "xsi" && uri == XSI_NAMESPACE {
        return;
    }
    if !needed.iter().any(|(p, _)| p == prefix) {
        needed.push((prefix.to_string(), uri.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "http://autosar.org/schema/r4.0";

    fn fragment(packages: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><AUTOSAR xmlns="{}"><ADMIN-DATA/><AR-PACKAGES>{}</AR-PACKAGES></AUTOSAR>"#,
            NS, packages
        )
    }

    fn project_package(xml: &str) -> Element {
        let mut root = parse_element(xml).unwrap();
        root.take_descendants(|e| e.local_name() == AR_PACKAGE)
            .into_iter()
            .next()
            .unwrap()
            .element
    }

    #[test]
    fn test_packages_become_children_of_project_package() {
        let fragments = [
            ModuleFragment::new("CAN", fragment("<AR-PACKAGE><SHORT-NAME>Can</SHORT-NAME></AR-PACKAGE>")),
            ModuleFragment::new("NvM", fragment("<AR-PACKAGE><SHORT-NAME>NvM</SHORT-NAME></AR-PACKAGE>")),
        ];
        let report = merge_configurations_with_report(&fragments, "Proj", "ECU1").unwrap();
        assert!(report.skipped.is_empty());
        assert_eq!(report.merged.len(), 2);
        assert_eq!(report.merged[0].packages, ["Can"]);

        let project = project_package(&report.document);
        assert_eq!(project.short_name(), Some("Proj"));
        let moved: Vec<_> = project
            .children_named(AR_PACKAGE)
            .filter_map(Element::short_name)
            .collect();
        assert_eq!(moved, ["Can", "NvM"]);
        let ecu = project.descendants_named("ECU-INSTANCE").next().unwrap();
        assert_eq!(ecu.short_name(), Some("ECU1"));
        // Only the fragment packages survive, not their admin data.
        assert_eq!(project.descendants_named("ADMIN-DATA").count(), 0);
    }

    #[test]
    fn test_bad_fragments_are_skipped() {
        let fragments = [
            ModuleFragment::new("Empty", ""),
            ModuleFragment::new("Broken", "<AUTOSAR><AR-PACKAGES>"),
            ModuleFragment::new("Bare", fragment("")),
            ModuleFragment::new("CAN", fragment("<AR-PACKAGE><SHORT-NAME>Can</SHORT-NAME></AR-PACKAGE>")),
        ];
        let report = merge_configurations_with_report(&fragments, "Proj", "ECU").unwrap();
        let reasons: Vec<_> = report
            .skipped
            .iter()
            .map(|s| (s.module_type.as_str(), &s.reason))
            .collect();
        assert_eq!(reasons.len(), 3);
        assert_eq!(reasons[0], ("Empty", &SkipReason::Empty));
        assert!(matches!(reasons[1], ("Broken", SkipReason::Unparsable(_))));
        assert_eq!(reasons[2], ("Bare", &SkipReason::NoPackages));
        assert_eq!(report.merged.len(), 1);
    }

    #[test]
    fn test_prefixed_fragment_is_adopted() {
        let xml = r#"<ar:AUTOSAR xmlns:ar="http://autosar.org/schema/r4.0" xmlns:v="urn:vendor"><ar:AR-PACKAGES><ar:AR-PACKAGE v:origin="x"><ar:SHORT-NAME>P</ar:SHORT-NAME><v:EXTRA/></ar:AR-PACKAGE></ar:AR-PACKAGES></ar:AUTOSAR>"#;
        let packages = extract_packages(xml).unwrap();
        assert_eq!(packages.len(), 1);
        let package = &packages[0];
        assert_eq!(package.name(), "AR-PACKAGE");
        assert_eq!(package.children()[0].name(), "SHORT-NAME");
        assert_eq!(package.children()[1].name(), "v:EXTRA");
        assert_eq!(package.attribute("xmlns:v"), Some("urn:vendor"));

        let merged = merge_configurations(&[ModuleFragment::new("X", xml)], "Proj", "ECU").unwrap();
        let reparsed = parse_element(&merged).unwrap();
        let extra = reparsed.descendants_named("EXTRA").next().unwrap();
        assert_eq!(extra.namespace(), Some("urn:vendor"));
        let short_names: Vec<_> = reparsed
            .descendants()
            .filter(|e| e.is(SHORT_NAME, Some(NS)))
            .filter_map(Element::text)
            .collect();
        assert_eq!(short_names, ["Proj", "ECU", "P"]);
    }

    #[test]
    fn test_ancestor_declared_prefix_is_carried() {
        let xml = format!(
            r#"<AUTOSAR xmlns="{}"><AR-PACKAGES xmlns:v="urn:v"><AR-PACKAGE v:origin="x"><SHORT-NAME>P</SHORT-NAME></AR-PACKAGE></AR-PACKAGES></AUTOSAR>"#,
            NS
        );
        let packages = extract_packages(&xml).unwrap();
        assert_eq!(packages[0].attribute("xmlns:v"), Some("urn:v"));

        let merged = merge_configurations(&[ModuleFragment::new("X", xml)], "Proj", "ECU").unwrap();
        assert!(merged.contains(r#"xmlns:v="urn:v""#));
        // The merged output must still resolve every prefix.
        let reparsed = parse_element(&merged).unwrap();
        let package = reparsed
            .descendants_named(AR_PACKAGE)
            .find(|p| p.short_name() == Some("P"))
            .unwrap();
        assert_eq!(package.attribute("v:origin"), Some("x"));
    }

    #[test]
    fn test_inner_declaration_shadows_outer_one() {
        let xml = format!(
            r#"<AUTOSAR xmlns="{}" xmlns:v="urn:outer"><AR-PACKAGES xmlns:v="urn:inner"><AR-PACKAGE v:origin="x"><SHORT-NAME>P</SHORT-NAME></AR-PACKAGE></AR-PACKAGES></AUTOSAR>"#,
            NS
        );
        let packages = extract_packages(&xml).unwrap();
        assert_eq!(packages[0].attribute("xmlns:v"), Some("urn:inner"));
    }

    #[test]
    fn test_module_kinds_are_resolved() {
        let package = fragment("<AR-PACKAGE><SHORT-NAME>M</SHORT-NAME></AR-PACKAGE>");
        let fragments = [
            ModuleFragment::new("can", package.clone()),
            ModuleFragment::new("OS", package.clone()),
            ModuleFragment::new("LIN", package),
            ModuleFragment::new("nvm", ""),
        ];
        let report = merge_configurations_with_report(&fragments, "Proj", "ECU").unwrap();
        let kinds: Vec<_> = report.merged.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, [Some(ModuleKind::Can), Some(ModuleKind::Os), None]);
        // The label is kept as the caller wrote it.
        assert_eq!(report.merged[0].module_type, "can");
        assert_eq!(report.skipped[0].kind, Some(ModuleKind::Nvm));
    }

    #[test]
    fn test_unbound_packages_are_a_fallback() {
        let xml = "<AUTOSAR><AR-PACKAGES><AR-PACKAGE><SHORT-NAME>Plain</SHORT-NAME></AR-PACKAGE></AR-PACKAGES></AUTOSAR>";
        let packages = extract_packages(xml).unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].short_name(), Some("Plain"));
    }

    #[test]
    fn test_foreign_default_namespace_is_kept_explicit() {
        let mut package = Element::new(AR_PACKAGE);
        let foreign = package.add_child("DATA");
        foreign.set_namespace(Some("urn:other".to_string()));
        let inner = foreign.add_child("SHORT-NAME");
        inner.set_namespace(Some(NS.to_string()));

        adopt_into_default_namespace(&mut package, &[]);
        assert_eq!(package.attribute("xmlns"), None);
        let foreign = &package.children()[0];
        assert_eq!(foreign.attribute("xmlns"), Some("urn:other"));
        assert_eq!(foreign.children()[0].attribute("xmlns"), Some(NS));
    }

    #[test]
    fn test_fragment_aliases_deserialize() {
        let fragment: ModuleFragment =
            serde_json::from_str(r#"{"type":"CAN","arxml":"<AUTOSAR/>"}"#).unwrap();
        assert_eq!(fragment, ModuleFragment::new("CAN", "<AUTOSAR/>"));
        let fragment: ModuleFragment = serde_json::from_str("{}").unwrap();
        assert_eq!(fragment.module_type, UNKNOWN_MODULE);
        assert!(fragment.document.is_empty());

        let request: ExportRequest = serde_json::from_str(r#"{"modules":[]}"#).unwrap();
        assert_eq!(request.project_name, DEFAULT_PROJECT_NAME);
        assert_eq!(request.ecu_name, DEFAULT_ECU_NAME);
    }

    #[test]
    fn test_export_request_defaults_reach_the_document() {
        let json = format!(
            r#"{{"modules":[{{"type":"CAN","arxml":{}}}]}}"#,
            serde_json::to_string(&fragment("<AR-PACKAGE><SHORT-NAME>Can</SHORT-NAME></AR-PACKAGE>")).unwrap()
        );
        let request: ExportRequest = serde_json::from_str(&json).unwrap();
        let merged = merge_export_request(&request).unwrap();

        let project = project_package(&merged);
        assert_eq!(project.short_name(), Some(DEFAULT_PROJECT_NAME));
        let ecu = project.descendants_named("ECU-INSTANCE").next().unwrap();
        assert_eq!(ecu.short_name(), Some(DEFAULT_ECU_NAME));
        let moved: Vec<_> = project
            .children_named(AR_PACKAGE)
            .filter_map(Element::short_name)
            .collect();
        assert_eq!(moved, ["Can"]);
    }
}
