// crates/autosar-cfg/src/tools.rs

//! Static catalog of the operations the configuration engine offers.
//!
//! A transport layer publishes this list so clients can discover the
//! operations, their parameters and which of those are mandatory. The
//! constraints here are the same ones enforced by the request conversions in
//! [`crate::params`].

use serde::Serialize;

/// JSON-schema style type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    String,
    Integer,
    Number,
    Boolean,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolParameter {
    pub name: &'static str,
    pub kind: ParameterKind,
    pub description: &'static str,
    /// Allowed values or range, in human readable form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: &'static [ToolParameter],
    pub required: &'static [&'static str],
    /// `false` for operations that only validate their input and then report
    /// "not yet implemented".
    pub implemented: bool,
}

impl ToolDescriptor {
    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| *r == name)
    }
}

const fn param(
    name: &'static str,
    kind: ParameterKind,
    description: &'static str,
    constraint: Option<&'static str>,
) -> ToolParameter {
    ToolParameter {
        name,
        kind,
        description,
        constraint,
    }
}

/// Every operation exposed by the engine.
pub const TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: "generateCanConfig",
        description: "Generate an AUTOSAR CAN controller configuration: baudrate and bit timing, \
                      message objects, error handling and wakeup support.",
        parameters: &[
            param(
                "ecuType",
                ParameterKind::String,
                "ECU type",
                Some("powertrain | body | chassis | telematics | gateway"),
            ),
            param(
                "baudrate",
                ParameterKind::Integer,
                "CAN baudrate in kbps",
                Some("125 | 250 | 500 | 1000"),
            ),
            param(
                "messageObjects",
                ParameterKind::Integer,
                "Number of CAN message objects",
                Some("1..=128"),
            ),
            param(
                "errorHandling",
                ParameterKind::Boolean,
                "Enable bus-off recovery and error-passive handling (default true)",
                None,
            ),
            param(
                "wakeupSupport",
                ParameterKind::Boolean,
                "Enable CAN bus wakeup (default false)",
                None,
            ),
        ],
        required: &["ecuType", "baudrate", "messageObjects"],
        implemented: true,
    },
    ToolDescriptor {
        name: "generateNvmConfig",
        description: "Generate an AUTOSAR NvM configuration: block count and size, write \
                      strategy, CRC protection, redundancy and wear leveling.",
        parameters: &[
            param(
                "blockCount",
                ParameterKind::Integer,
                "Number of NvM blocks",
                Some("1..=256"),
            ),
            param(
                "blockSize",
                ParameterKind::Integer,
                "Size per block in bytes",
                Some("1..=65535"),
            ),
            param(
                "writeStrategy",
                ParameterKind::String,
                "Write strategy for data persistence",
                Some("immediate | deferred | triggered"),
            ),
            param(
                "crcProtection",
                ParameterKind::Boolean,
                "Attach a CRC16 to every block (default true)",
                None,
            ),
            param(
                "redundancy",
                ParameterKind::Boolean,
                "Store a redundant copy of every block (default false)",
                None,
            ),
            param(
                "wearLeveling",
                ParameterKind::Boolean,
                "Enable wear leveling for EEPROM (default true)",
                None,
            ),
        ],
        required: &["blockCount", "blockSize", "writeStrategy"],
        implemented: true,
    },
    ToolDescriptor {
        name: "generateOsConfig",
        description: "Generate an AUTOSAR OS configuration (tasks, alarms, scheduling).",
        parameters: &[
            param(
                "taskCount",
                ParameterKind::Integer,
                "Number of tasks",
                Some("1..=32"),
            ),
            param(
                "tickDuration",
                ParameterKind::Number,
                "OS tick duration in milliseconds",
                Some("0.1..=100.0"),
            ),
            param(
                "schedulingPolicy",
                ParameterKind::String,
                "Task scheduling policy",
                Some("FULL_PREEMPTIVE | NON_PREEMPTIVE | MIXED"),
            ),
        ],
        required: &["taskCount", "tickDuration"],
        implemented: false,
    },
    ToolDescriptor {
        name: "validateConfig",
        description: "Validate an ARXML document: root element, packages, namespace and \
                      SHORT-NAME uniqueness, plus recommendations.",
        parameters: &[
            param(
                "arxmlContent",
                ParameterKind::String,
                "ARXML content to validate",
                None,
            ),
            param(
                "autosarVersion",
                ParameterKind::String,
                "AUTOSAR version to validate against (default 4.2.2)",
                Some("4.0.3 | 4.2.2 | 4.3.1 | 4.4.0"),
            ),
        ],
        required: &["arxmlContent"],
        implemented: true,
    },
    ToolDescriptor {
        name: "exportArxml",
        description: "Merge module configurations into one ARXML document under a project \
                      package with an ECU instance.",
        parameters: &[
            param(
                "modules",
                ParameterKind::Array,
                "Module fragments ({moduleType, document})",
                None,
            ),
            param(
                "projectName",
                ParameterKind::String,
                "Name of the top-level project package",
                None,
            ),
            param(
                "ecuName",
                ParameterKind::String,
                "Short name of the ECU instance (default ECU)",
                None,
            ),
        ],
        required: &["modules", "projectName"],
        implemented: true,
    },
];

/// Looks up a tool by its exact name.
pub fn find_tool(name: &str) -> Option<&'static ToolDescriptor> {
    TOOLS.iter().find(|t| t.name == name)
}
