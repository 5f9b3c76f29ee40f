//! SNMP settings record and the access mode it selects

use rusqlite::Row;

/// Table holding the SNMP service settings, one row per saved revision
pub const SETTINGS_TABLE: &str = "services_snmp";

/// The current SNMP settings as stored by the administration UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsRecord {
    pub location: String,
    pub contact: String,
    pub community: String,
    pub v3_enabled: bool,
    pub v3_username: String,
    pub v3_auth_type: String,
    pub v3_password: String,
    pub v3_priv_protocol: String,
    pub v3_priv_passphrase: String,
}

/// Optional SNMPv3 privacy (encryption) parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Privacy<'a> {
    pub protocol: &'a str,
    pub passphrase: &'a str,
}

/// Access control the rendered config grants, derived from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessControl<'a> {
    /// SNMPv2c read-only community
    Community { community: &'a str },
    /// SNMPv3 user with read/write access
    User {
        username: &'a str,
        auth_type: &'a str,
        password: &'a str,
        privacy: Option<Privacy<'a>>,
    },
    /// v3 enabled without credentials: no user and no community are configured.
    Unconfigured,
}

impl AccessControl<'_> {
    /// Short label for logging; never includes secrets.
    pub fn mode_name(&self) -> &'static str {
        match self {
            Self::Community { .. } => "community",
            Self::User { privacy: None, .. } => "v3-auth",
            Self::User { privacy: Some(_), .. } => "v3-priv",
            Self::Unconfigured => "unconfigured",
        }
    }
}

impl SettingsRecord {
    /// Column list, in the order used by `SELECT`. Rows are decoded by name.
    pub const COLUMNS: [&'static str; 9] = [
        "snmp_location",
        "snmp_contact",
        "snmp_community",
        "snmp_v3",
        "snmp_v3_username",
        "snmp_v3_authtype",
        "snmp_v3_password",
        "snmp_v3_privproto",
        "snmp_v3_privpassphrase",
    ];

    /// Decode a row selected with `COLUMNS`. NULL text reads as empty, NULL flag as false.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let text = |column: &str| -> rusqlite::Result<String> {
            Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
        };

        Ok(Self {
            location: text("snmp_location")?,
            contact: text("snmp_contact")?,
            community: text("snmp_community")?,
            v3_enabled: row.get::<_, Option<bool>>("snmp_v3")?.unwrap_or(false),
            v3_username: text("snmp_v3_username")?,
            v3_auth_type: text("snmp_v3_authtype")?,
            v3_password: text("snmp_v3_password")?,
            v3_priv_protocol: text("snmp_v3_privproto")?,
            v3_priv_passphrase: text("snmp_v3_privpassphrase")?,
        })
    }

    /// Select the access mode. The two modes are mutually exclusive on `v3_enabled`.
    pub fn access_control(&self) -> AccessControl<'_> {
        if !self.v3_enabled {
            return AccessControl::Community {
                community: &self.community,
            };
        }

        if self.v3_username.is_empty() || self.v3_password.is_empty() {
            return AccessControl::Unconfigured;
        }

        let privacy = (!self.v3_priv_protocol.is_empty() && !self.v3_priv_passphrase.is_empty())
            .then(|| Privacy {
                protocol: &self.v3_priv_protocol,
                passphrase: &self.v3_priv_passphrase,
            });

        AccessControl::User {
            username: &self.v3_username,
            auth_type: &self.v3_auth_type,
            password: &self.v3_password,
            privacy,
        }
    }
}
