// crates/autosar-cfg/src/types.rs

//! Enumerations shared by the generators and the request layer.

use core::fmt;
use log::warn;
use serde::{Deserialize, Serialize};

/// The ECU families a CAN controller configuration can be generated for.
///
/// The lowercase name ends up verbatim in the controller's short name
/// (`CanController_<name>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EcuType {
    Powertrain,
    Body,
    Chassis,
    Telematics,
    Gateway,
}

impl EcuType {
    pub const ALL: [EcuType; 5] = [
        EcuType::Powertrain,
        EcuType::Body,
        EcuType::Chassis,
        EcuType::Telematics,
        EcuType::Gateway,
    ];

    /// Parses the lowercase wire name. Matching is exact.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EcuType::Powertrain => "powertrain",
            EcuType::Body => "body",
            EcuType::Chassis => "chassis",
            EcuType::Telematics => "telematics",
            EcuType::Gateway => "gateway",
        }
    }
}

impl fmt::Display for EcuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// NvM write strategy, as requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStrategy {
    /// Written once (`NVM_WRITE_BLOCK_ONCE`).
    Immediate,
    /// Written cyclically (`NVM_WRITE_BLOCK_CYCLIC`).
    Deferred,
    /// Written on explicit trigger (`NVM_WRITE_BLOCK_TRIGGERED`).
    Triggered,
}

impl WriteStrategy {
    /// Strategy used for names outside the table.
    pub const FALLBACK: WriteStrategy = WriteStrategy::Deferred;

    /// Exact lookup of a wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "immediate" => Some(WriteStrategy::Immediate),
            "deferred" => Some(WriteStrategy::Deferred),
            "triggered" => Some(WriteStrategy::Triggered),
            _ => None,
        }
    }

    /// Lookup with the fallback policy applied: unknown names map to
    /// [`WriteStrategy::FALLBACK`] (cyclic writes).
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            warn!(
                "Unknown NvM write strategy '{}', falling back to '{}'",
                name,
                Self::FALLBACK.as_str()
            );
            Self::FALLBACK
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WriteStrategy::Immediate => "immediate",
            WriteStrategy::Deferred => "deferred",
            WriteStrategy::Triggered => "triggered",
        }
    }

    /// The `NVM-WRITE-STRATEGY` enumeration literal.
    pub fn arxml_value(self) -> &'static str {
        match self {
            WriteStrategy::Immediate => "NVM_WRITE_BLOCK_ONCE",
            WriteStrategy::Deferred => "NVM_WRITE_BLOCK_CYCLIC",
            WriteStrategy::Triggered => "NVM_WRITE_BLOCK_TRIGGERED",
        }
    }
}

/// Module families known to the engine.
///
/// Only CAN and NvM have generators; the remaining kinds are recognised so a
/// caller gets a "not yet implemented" answer instead of an unknown-module one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    #[serde(rename = "CAN")]
    Can,
    #[serde(rename = "NvM")]
    Nvm,
    #[serde(rename = "OS")]
    Os,
}

impl ModuleKind {
    /// Case-insensitive lookup (`"CAN"`, `"can"`, `"NvM"`, `"NVM"`, `"OS"` ...).
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("can") {
            Some(ModuleKind::Can)
        } else if label.eq_ignore_ascii_case("nvm") {
            Some(ModuleKind::Nvm)
        } else if label.eq_ignore_ascii_case("os") {
            Some(ModuleKind::Os)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ModuleKind::Can => "CAN",
            ModuleKind::Nvm => "NvM",
            ModuleKind::Os => "OS",
        }
    }

    pub fn is_implemented(self) -> bool {
        matches!(self, ModuleKind::Can | ModuleKind::Nvm)
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// OS task scheduling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchedulingPolicy {
    #[default]
    FullPreemptive,
    NonPreemptive,
    Mixed,
}

impl SchedulingPolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "FULL_PREEMPTIVE" => Some(SchedulingPolicy::FullPreemptive),
            "NON_PREEMPTIVE" => Some(SchedulingPolicy::NonPreemptive),
            "MIXED" => Some(SchedulingPolicy::Mixed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SchedulingPolicy::FullPreemptive => "FULL_PREEMPTIVE",
            SchedulingPolicy::NonPreemptive => "NON_PREEMPTIVE",
            SchedulingPolicy::Mixed => "MIXED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ecu_type_names_round_trip() {
        for ecu in EcuType::ALL {
            assert_eq!(EcuType::from_name(ecu.as_str()), Some(ecu));
        }
        assert_eq!(EcuType::from_name("Powertrain"), None);
        assert_eq!(EcuType::from_name("infotainment"), None);
    }

    #[test]
    fn test_write_strategy_table() {
        assert_eq!(
            WriteStrategy::resolve("immediate").arxml_value(),
            "NVM_WRITE_BLOCK_ONCE"
        );
        assert_eq!(
            WriteStrategy::resolve("deferred").arxml_value(),
            "NVM_WRITE_BLOCK_CYCLIC"
        );
        assert_eq!(
            WriteStrategy::resolve("triggered").arxml_value(),
            "NVM_WRITE_BLOCK_TRIGGERED"
        );
    }

    #[test]
    fn test_unknown_write_strategy_falls_back_to_cyclic() {
        assert_eq!(WriteStrategy::from_name("sometimes"), None);
        let resolved = WriteStrategy::resolve("sometimes");
        assert_eq!(resolved, WriteStrategy::FALLBACK);
        assert_eq!(resolved.arxml_value(), "NVM_WRITE_BLOCK_CYCLIC");
    }

    #[test]
    fn test_module_kind_labels() {
        assert_eq!(ModuleKind::from_label("CAN"), Some(ModuleKind::Can));
        assert_eq!(ModuleKind::from_label("nvm"), Some(ModuleKind::Nvm));
        assert_eq!(ModuleKind::from_label(" OS "), Some(ModuleKind::Os));
        assert_eq!(ModuleKind::from_label("LIN"), None);
        assert!(ModuleKind::Can.is_implemented());
        assert!(!ModuleKind::Os.is_implemented());
    }

    #[test]
    fn test_scheduling_policy_names() {
        assert_eq!(
            SchedulingPolicy::from_name("MIXED"),
            Some(SchedulingPolicy::Mixed)
        );
        assert_eq!(SchedulingPolicy::from_name("mixed"), None);
        assert_eq!(SchedulingPolicy::default().as_str(), "FULL_PREEMPTIVE");
    }
}
