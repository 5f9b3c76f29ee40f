//! snmpd configuration template rendering

use tracing::warn;

use crate::host::HostFacts;
use crate::settings::{AccessControl, SettingsRecord};

/// Listener endpoints: UDP 161 on both IP versions plus the local socket
pub const AGENT_ADDRESS: &str = "udp:161,udp6:161,unix:/var/run/snmpd.sock";

pub const DEFAULT_LOCATION: &str = "unknown";
pub const DEFAULT_CONTACT: &str = "unknown@localhost";

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

/// Generate the `sysDescr` value from host facts
fn generate_description(facts: &HostFacts) -> String {
    format!(
        "Hardware: {} {} running at {} Software: {} {} (revision {})",
        facts.arch,
        facts.model,
        facts.clock_rate,
        facts.os_type,
        facts.os_release,
        facts.os_revision
    )
}

/// Generate the access control directives for the selected mode
fn generate_access(access: &AccessControl<'_>) -> String {
    match access {
        AccessControl::Community { community } => {
            warn_on_quote("community", community);
            format!("rocommunity \"{}\" default\n", community)
        }
        AccessControl::User {
            username,
            auth_type,
            password,
            privacy,
        } => {
            warn_on_quote("v3 password", password);
            let mut directive = format!("createUser {} {} \"{}\"", username, auth_type, password);
            if let Some(privacy) = privacy {
                warn_on_quote("v3 privacy passphrase", privacy.passphrase);
                directive.push_str(&format!(" {} \"{}\"", privacy.protocol, privacy.passphrase));
            }
            format!("{}\nrwuser {}\n", directive, username)
        }
        AccessControl::Unconfigured => {
            warn!("SNMPv3 enabled without username or password; no access will be granted");
            String::new()
        }
    }
}

// Quoted values are written verbatim for compatibility with existing configs.
fn warn_on_quote(field: &str, value: &str) {
    if value.contains('"') {
        warn!(field, "Value contains a double quote; resulting directive may be malformed");
    }
}

/// Generate the complete snmpd configuration. Output depends only on the inputs.
pub fn render(record: &SettingsRecord, facts: &HostFacts) -> String {
    format!(
        r#"agentAddress {agent_address}
sysLocation {location}
sysContact {contact}
sysDescr {description}
master agentx
{access}"#,
        agent_address = AGENT_ADDRESS,
        location = or_default(&record.location, DEFAULT_LOCATION),
        contact = or_default(&record.contact, DEFAULT_CONTACT),
        description = generate_description(facts),
        access = generate_access(&record.access_control()),
    )
}
