// End-to-end generation against real SQLite stores in temporary directories.

use anyhow::{anyhow, Result};
use rusqlite::Connection;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

use snmpd_config::{
    generate, CleanupRegistry, Config, GenerateError, HostFact, HostFactSource, SettingsRecord,
};

struct FixedHost;

impl HostFactSource for FixedHost {
    fn lookup(&self, fact: HostFact) -> Result<String> {
        Ok(match fact {
            HostFact::Arch => "amd64",
            HostFact::Model => "Generic",
            HostFact::ClockRate => "2400",
            HostFact::OsType => "myos",
            HostFact::OsRelease => "13.0",
            HostFact::OsRevision => "1300000",
        }
        .to_string())
    }
}

struct NoHost;

impl HostFactSource for NoHost {
    fn lookup(&self, fact: HostFact) -> Result<String> {
        Err(anyhow!("{} not available", fact.sysctl_name()))
    }
}

struct Fixture {
    _root: TempDir,
    config: Config,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let snapshots = root.path().join("snapshots");
        fs::create_dir(&snapshots).unwrap();

        let config = Config {
            database: root.path().join("freenas-v1.db"),
            output: root.path().join("etc").join("snmpd.conf"),
            snapshot_dir: snapshots,
            snapshot_timeout: Duration::from_secs(2),
        };

        let conn = Connection::open(&config.database).unwrap();
        conn.execute_batch(
            "CREATE TABLE services_snmp (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                snmp_location VARCHAR(255) NOT NULL DEFAULT '',
                snmp_contact VARCHAR(120) NOT NULL DEFAULT '',
                snmp_community VARCHAR(120) NOT NULL DEFAULT '',
                snmp_v3 BOOLEAN NOT NULL DEFAULT 0,
                snmp_v3_username VARCHAR(20) NOT NULL DEFAULT '',
                snmp_v3_authtype VARCHAR(3) NOT NULL DEFAULT 'SHA',
                snmp_v3_password VARCHAR(50) NOT NULL DEFAULT '',
                snmp_v3_privproto VARCHAR(3),
                snmp_v3_privpassphrase VARCHAR(100)
            )",
        )
        .unwrap();

        Self {
            _root: root,
            config,
        }
    }

    fn insert(&self, id: i64, record: &SettingsRecord) {
        let conn = Connection::open(&self.config.database).unwrap();
        conn.execute(
            "INSERT INTO services_snmp (
                id, snmp_location, snmp_contact, snmp_community, snmp_v3,
                snmp_v3_username, snmp_v3_authtype, snmp_v3_password,
                snmp_v3_privproto, snmp_v3_privpassphrase
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                id,
                record.location,
                record.contact,
                record.community,
                record.v3_enabled,
                record.v3_username,
                record.v3_auth_type,
                record.v3_password,
                Some(&record.v3_priv_protocol).filter(|s| !s.is_empty()),
                Some(&record.v3_priv_passphrase).filter(|s| !s.is_empty()),
            ],
        )
        .unwrap();
    }

    fn run(&self) -> Result<PathBuf, GenerateError> {
        self.run_with(&FixedHost)
    }

    fn run_with(&self, host: &dyn HostFactSource) -> Result<PathBuf, GenerateError> {
        generate(&self.config, host, &CleanupRegistry::new())
    }

    fn output(&self) -> String {
        fs::read_to_string(&self.config.output).unwrap()
    }

    fn snapshot_dir_is_empty(&self) -> bool {
        fs::read_dir(&self.config.snapshot_dir).unwrap().next().is_none()
    }
}

fn community(value: &str) -> SettingsRecord {
    SettingsRecord {
        community: value.to_string(),
        ..Default::default()
    }
}

fn v3(username: &str, password: &str, proto: &str, phrase: &str) -> SettingsRecord {
    SettingsRecord {
        community: "public".to_string(),
        v3_enabled: true,
        v3_username: username.to_string(),
        v3_auth_type: "MD5".to_string(),
        v3_password: password.to_string(),
        v3_priv_protocol: proto.to_string(),
        v3_priv_passphrase: phrase.to_string(),
        ..Default::default()
    }
}

fn lines_starting(config: &str, prefix: &str) -> usize {
    config.lines().filter(|l| l.starts_with(prefix)).count()
}

fn mode_of(path: &Path) -> u32 {
    fs::metadata(path).unwrap().permissions().mode()
}

#[test]
fn end_to_end_community_example() {
    let fx = Fixture::new();
    fx.insert(1, &community("public"));

    let written = fx.run().unwrap();

    assert_eq!(written, fx.config.output);
    assert_eq!(
        fx.output(),
        "agentAddress udp:161,udp6:161,unix:/var/run/snmpd.sock\n\
         sysLocation unknown\n\
         sysContact unknown@localhost\n\
         sysDescr Hardware: amd64 Generic running at 2400 Software: myos 13.0 (revision 1300000)\n\
         master agentx\n\
         rocommunity \"public\" default\n"
    );
    assert!(fx.snapshot_dir_is_empty());
}

#[test]
fn newest_row_is_used() {
    let fx = Fixture::new();
    for id in 1..=3 {
        let record = SettingsRecord {
            location: format!("room-{id}"),
            ..community(&format!("community-{id}"))
        };
        fx.insert(id, &record);
    }

    fx.run().unwrap();
    let config = fx.output();

    assert!(config.contains("sysLocation room-3\n"));
    assert!(config.contains("rocommunity \"community-3\" default\n"));
    assert!(!config.contains("community-1"));
    assert!(!config.contains("community-2"));
}

#[test]
fn output_is_owner_only() {
    let fx = Fixture::new();
    fx.insert(1, &v3("admin", "authpass", "AES", "privpass"));

    fx.run().unwrap();

    assert_eq!(mode_of(&fx.config.output) & 0o077, 0);
}

#[test]
fn repeated_runs_are_byte_identical() {
    let fx = Fixture::new();
    fx.insert(1, &v3("admin", "authpass", "DES", "privpass"));

    fx.run().unwrap();
    let first = fs::read(&fx.config.output).unwrap();
    fx.run().unwrap();
    let second = fs::read(&fx.config.output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn v3_auth_only_from_store() {
    let fx = Fixture::new();
    fx.insert(1, &v3("admin", "authpass", "", ""));

    fx.run().unwrap();
    let config = fx.output();

    assert!(config.contains("createUser admin MD5 \"authpass\"\n"));
    assert!(config.contains("rwuser admin\n"));
    assert_eq!(lines_starting(&config, "rocommunity"), 0);
}

#[test]
fn v3_auth_and_privacy_from_store() {
    let fx = Fixture::new();
    fx.insert(1, &v3("admin", "authpass", "AES", "privpass"));

    fx.run().unwrap();
    let config = fx.output();

    assert!(config.contains("createUser admin MD5 \"authpass\" AES \"privpass\"\n"));
    assert!(config.contains("rwuser admin\n"));
    assert_eq!(lines_starting(&config, "rocommunity"), 0);
}

#[test]
fn v3_without_credentials_configures_no_access() {
    let fx = Fixture::new();
    fx.insert(1, &v3("admin", "", "AES", "privpass"));

    fx.run().unwrap();
    let config = fx.output();

    assert_eq!(lines_starting(&config, "rocommunity"), 0);
    assert_eq!(lines_starting(&config, "createUser"), 0);
    assert_eq!(lines_starting(&config, "rwuser"), 0);
    assert!(config.ends_with("master agentx\n"));
}

#[test]
fn empty_table_leaves_previous_config() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.config.output.parent().unwrap()).unwrap();
    fs::write(&fx.config.output, "previous\n").unwrap();

    let err = fx.run().unwrap_err();

    assert!(matches!(err, GenerateError::NoSettingsRecord));
    assert_eq!(fx.output(), "previous\n");
    assert!(fx.snapshot_dir_is_empty());
}

#[test]
fn missing_store_is_fatal_and_writes_nothing() {
    let fx = Fixture::new();
    fs::remove_file(&fx.config.database).unwrap();

    let err = fx.run().unwrap_err();

    assert!(matches!(err, GenerateError::SnapshotAcquisitionFailed { .. }));
    assert!(!fx.config.output.exists());
    assert!(fx.snapshot_dir_is_empty());
}

#[test]
fn host_fact_failures_do_not_block_generation() {
    let fx = Fixture::new();
    fx.insert(
        1,
        &SettingsRecord {
            location: "lab".to_string(),
            contact: "noc@example.org".to_string(),
            ..community("s3cret")
        },
    );

    fx.run_with(&NoHost).unwrap();
    let config = fx.output();

    assert!(config.contains("sysDescr Hardware:   running at  Software:   (revision )\n"));
    assert!(config.contains("sysLocation lab\n"));
    assert!(config.contains("sysContact noc@example.org\n"));
    assert!(config.contains("rocommunity \"s3cret\" default\n"));
}
