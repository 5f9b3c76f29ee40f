//! Host identity facts for the `sysDescr` line
//!
//! Facts are decorative. A failed lookup is logged and leaves its field empty;
//! collection itself never fails.

use anyhow::Result;
use tracing::warn;

use crate::error::GenerateError;

/// One host identity value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostFact {
    Arch,
    Model,
    ClockRate,
    OsType,
    OsRelease,
    OsRevision,
}

impl HostFact {
    pub const ALL: [HostFact; 6] = [
        Self::Arch,
        Self::Model,
        Self::ClockRate,
        Self::OsType,
        Self::OsRelease,
        Self::OsRevision,
    ];

    /// Kernel variable the fact is read from.
    pub fn sysctl_name(self) -> &'static str {
        match self {
            Self::Arch => "hw.machine",
            Self::Model => "hw.model",
            Self::ClockRate => "hw.clockrate",
            Self::OsType => "kern.ostype",
            Self::OsRelease => "kern.osrelease",
            Self::OsRevision => "kern.osrevision",
        }
    }
}

/// Values describing the running machine. Any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFacts {
    pub arch: String,
    pub model: String,
    pub clock_rate: String,
    pub os_type: String,
    pub os_release: String,
    pub os_revision: String,
}

impl HostFacts {
    fn slot(&mut self, fact: HostFact) -> &mut String {
        match fact {
            HostFact::Arch => &mut self.arch,
            HostFact::Model => &mut self.model,
            HostFact::ClockRate => &mut self.clock_rate,
            HostFact::OsType => &mut self.os_type,
            HostFact::OsRelease => &mut self.os_release,
            HostFact::OsRevision => &mut self.os_revision,
        }
    }
}

/// Where host facts come from.
pub trait HostFactSource {
    fn lookup(&self, fact: HostFact) -> Result<String>;
}

/// Reads facts with `sysctl -n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysctlSource;

impl HostFactSource for SysctlSource {
    fn lookup(&self, fact: HostFact) -> Result<String> {
        common::sysctl(fact.sysctl_name())
    }
}

/// Gather every fact, tolerating individual failures.
pub fn collect_host_facts(source: &dyn HostFactSource) -> HostFacts {
    let mut facts = HostFacts::default();

    for fact in HostFact::ALL {
        match source.lookup(fact) {
            Ok(value) => *facts.slot(fact) = value.trim().to_string(),
            Err(e) => {
                let err = GenerateError::HostFactUnavailable {
                    fact,
                    reason: format!("{:#}", e),
                };
                warn!(error = %err, "Rendering host fact as empty");
            }
        }
    }

    facts
}
