// crates/autosar-cfg-arxml/src/document.rs

//! The `AUTOSAR` document skeleton shared by every generator and the merger.

use crate::error::ArxmlError;
use crate::tree::Element;
use crate::writer::write_document;
use chrono::{NaiveDateTime, Utc};
use core::fmt;
use log::{debug, warn};

pub const AUTOSAR_NAMESPACE: &str = "http://autosar.org/schema/r4.0";
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

// --- Element names ---
pub const AUTOSAR: &str = "AUTOSAR";
pub const ADMIN_DATA: &str = "ADMIN-DATA";
pub const DOC_REVISIONS: &str = "DOC-REVISIONS";
pub const DOC_REVISION: &str = "DOC-REVISION";
pub const REVISION_LABEL: &str = "REVISION-LABEL";
pub const DATE: &str = "DATE";
pub const AR_PACKAGES: &str = "AR-PACKAGES";
pub const AR_PACKAGE: &str = "AR-PACKAGE";
pub const SHORT_NAME: &str = "SHORT-NAME";
pub const ELEMENTS: &str = "ELEMENTS";

/// Revision label written by the generators and the merger.
pub const DEFAULT_REVISION: &str = "1.0.0";

/// Format of the `DATE` element (UTC, second precision, no zone suffix).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Supported AUTOSAR schema releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AutosarVersion {
    V4_0_3,
    #[default]
    V4_2_2,
    V4_3_1,
    V4_4_0,
}

impl AutosarVersion {
    pub const ALL: [AutosarVersion; 4] = [
        AutosarVersion::V4_0_3,
        AutosarVersion::V4_2_2,
        AutosarVersion::V4_3_1,
        AutosarVersion::V4_4_0,
    ];

    /// Exact lookup of a version label such as `"4.2.2"`.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.label() == label.trim())
    }

    /// Like [`AutosarVersion::parse`], but unknown labels resolve to the
    /// default release (4.2.2). Never fails.
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or_else(|| {
            let fallback = Self::default();
            warn!(
                "Unknown AUTOSAR version '{}', using {}",
                label,
                fallback.label()
            );
            fallback
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            AutosarVersion::V4_0_3 => "4.0.3",
            AutosarVersion::V4_2_2 => "4.2.2",
            AutosarVersion::V4_3_1 => "4.3.1",
            AutosarVersion::V4_4_0 => "4.4.0",
        }
    }

    /// Schema file name referenced from `xsi:schemaLocation`.
    pub fn schema_file(self) -> &'static str {
        match self {
            AutosarVersion::V4_0_3 => "AUTOSAR_4-0-3.xsd",
            AutosarVersion::V4_2_2 => "AUTOSAR_4-2-2.xsd",
            AutosarVersion::V4_3_1 => "AUTOSAR_00048.xsd",
            AutosarVersion::V4_4_0 => "AUTOSAR_00050.xsd",
        }
    }

    /// Full `xsi:schemaLocation` value: namespace URI and schema file.
    pub fn schema_location(self) -> String {
        format!("{} {}", AUTOSAR_NAMESPACE, self.schema_file())
    }
}

impl fmt::Display for AutosarVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An ARXML document under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ArxmlDocument {
    root: Element,
    version: AutosarVersion,
}

impl ArxmlDocument {
    /// Creates the `AUTOSAR` root with the default namespace, the XSI
    /// namespace and the schema location of `version`.
    pub fn new(version: AutosarVersion) -> Self {
        let mut root = Element::new(AUTOSAR);
        root.set_attribute("xmlns", AUTOSAR_NAMESPACE);
        root.set_attribute("xmlns:xsi", XSI_NAMESPACE);
        root.set_attribute("xsi:schemaLocation", version.schema_location());
        debug!("Created AUTOSAR {} document", version);
        Self { root, version }
    }

    pub fn version(&self) -> AutosarVersion {
        self.version
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Attaches the revision block stamped with the current UTC time.
    /// See [`ArxmlDocument::add_admin_data_at`].
    pub fn add_admin_data(&mut self, revision: &str) {
        self.add_admin_data_at(revision, Utc::now().naive_utc());
    }

    /// Attaches `ADMIN-DATA/DOC-REVISIONS/DOC-REVISION` with the given label
    /// and timestamp as the first child of the root.
    ///
    /// A document holds exactly one such block: calling this again replaces
    /// the existing one in place.
    pub fn add_admin_data_at(&mut self, revision: &str, timestamp: NaiveDateTime) {
        let mut doc_revision = Element::new(DOC_REVISION);
        doc_revision.add_text_child(REVISION_LABEL, revision);
        doc_revision.add_text_child(DATE, timestamp.format(TIMESTAMP_FORMAT).to_string());

        let mut admin = Element::new(ADMIN_DATA);
        admin.add_child(DOC_REVISIONS).push_child(doc_revision);

        let children = &mut self.root.children;
        match children.iter().position(|c| c.local_name() == ADMIN_DATA) {
            Some(index) => children[index] = admin,
            None => children.insert(0, admin),
        }
    }

    /// Resolves a top-level package, see [`get_or_create_package`].
    pub fn package(&mut self, short_name: &str) -> &mut Element {
        get_or_create_package(&mut self.root, short_name)
    }

    /// Serializes the document with its XML declaration. `pretty` toggles
    /// indentation only.
    pub fn serialize(&self, pretty: bool) -> Result<String, ArxmlError> {
        write_document(&self.root, pretty)
    }
}

/// Returns the `AR-PACKAGE` named `short_name` inside `parent`'s
/// `AR-PACKAGES` container, creating the container and the package as
/// needed.
///
/// Only direct children are searched, so packages with the same name under
/// different parents stay distinct.
pub fn get_or_create_package<'a>(parent: &'a mut Element, short_name: &str) -> &'a mut Element {
    let packages = parent.find_or_insert_child(
        |c| c.local_name() == AR_PACKAGES,
        || Element::new(AR_PACKAGES),
    );
    packages.find_or_insert_child(
        |c| c.local_name() == AR_PACKAGE && c.short_name() == Some(short_name),
        || {
            debug!("Creating package {}", short_name);
            let mut package = Element::new(AR_PACKAGE);
            package.add_text_child(SHORT_NAME, short_name);
            package
        },
    )
}
