// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Option catalogs
//!
//! The fixed, ordered list of directives each file may contain. Render
//! order is always catalog order. `VERBOSE` deliberately precedes
//! `PCAP_INTF` in the daemon catalog; existing deployments rely on it.

use std::collections::BTreeMap;

use super::error::{ConfigError, Result};
use super::option::{OptionKind, OptionSet, OptionSpec, OptionValue, RawValue};

pub const PCAP_INTF: &str = "pcap_intf";
pub const SOURCE: &str = "source";
pub const KEY: &str = "key";
pub const KEY_BASE64: &str = "key_base64";
pub const GPG_DECRYPT_ID: &str = "gpg_decrypt_id";
pub const GPG_DECRYPT_PW: &str = "gpg_decrypt_pw";
pub const GPG_ALLOW_NO_PW: &str = "gpg_allow_no_pw";

/// `SOURCE` value used when an access block does not set one.
pub const DEFAULT_SOURCE: &str = "ANY";

pub const SYSLOG_FACILITIES: &[&str] = &[
    "LOG_DAEMON",
    "LOG_LOCAL0",
    "LOG_LOCAL1",
    "LOG_LOCAL2",
    "LOG_LOCAL3",
    "LOG_LOCAL4",
    "LOG_LOCAL5",
    "LOG_LOCAL6",
    "LOG_LOCAL7",
];

pub const ENCRYPTION_MODES: &[&str] = &["CBC", "CTR", "PCBC", "OFB", "CFB", "ECB", "legacy"];

pub const HMAC_DIGEST_TYPES: &[&str] = &[
    "MD5", "SHA1", "SHA256", "SHA384", "SHA512", "SHA3_256", "SHA3_512",
];

/// Column layout of one rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStyle {
    /// Width the directive token is left-padded to before the separating space
    pub keyword_width: usize,
    pub terminator: &'static str,
}

#[derive(Debug)]
pub struct Catalog {
    name: &'static str,
    options: &'static [OptionSpec],
    line_style: LineStyle,
}

impl Catalog {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn options(&self) -> &'static [OptionSpec] {
        self.options
    }

    pub fn line_style(&self) -> LineStyle {
        self.line_style
    }

    pub fn get(&self, name: &str) -> Option<&'static OptionSpec> {
        self.options.iter().find(|spec| spec.name == name)
    }

    /// Check every value in `set` against this catalog.
    pub fn typecheck(&self, context: &str, set: &OptionSet) -> Result<()> {
        for (name, value) in set.iter() {
            let spec = self.get(name).ok_or_else(|| ConfigError::UnknownOption {
                context: context.to_string(),
                option: name.to_string(),
            })?;
            if !spec.accepts(value) {
                return Err(match (spec.kind, value) {
                    (OptionKind::Enum(allowed), OptionValue::Str(s)) => ConfigError::InvalidEnumValue {
                        context: context.to_string(),
                        option: name.to_string(),
                        value: s.clone(),
                        allowed: allowed.iter().map(|v| v.to_string()).collect(),
                    },
                    (kind, _) => ConfigError::InvalidOptionType {
                        context: context.to_string(),
                        option: name.to_string(),
                        expected: kind.describe().to_string(),
                        found: value.type_name().to_string(),
                    },
                });
            }
        }
        Ok(())
    }

    /// Build a typed option set from raw manifest values.
    pub fn coerce(&self, context: &str, raw: &BTreeMap<String, RawValue>) -> Result<OptionSet> {
        let mut set = OptionSet::new();
        for (name, value) in raw {
            let spec = self.get(name).ok_or_else(|| ConfigError::UnknownOption {
                context: context.to_string(),
                option: name.clone(),
            })?;
            set.set(spec.name, spec.coerce(context, value)?);
        }
        Ok(set)
    }
}

use OptionKind::{Boolean, Integer, List, SensitiveString};

const STRING: OptionKind = OptionKind::String;

/// Directives of `fwknopd.conf`.
pub static MAIN_CATALOG: Catalog = Catalog {
    name: "fwknopd.conf",
    line_style: LineStyle {
        keyword_width: 25,
        terminator: ";",
    },
    options: &[
        OptionSpec::keyword("verbose", Integer, "VERBOSE"),
        OptionSpec::keyword(PCAP_INTF, STRING, "PCAP_INTF"),
        OptionSpec::keyword("enable_pcap_promisc", Boolean, "ENABLE_PCAP_PROMISC"),
        OptionSpec::keyword("pcap_filter", SensitiveString, "PCAP_FILTER"),
        OptionSpec::keyword("enable_spa_packet_aging", Boolean, "ENABLE_SPA_PACKET_AGING"),
        OptionSpec::keyword("max_spa_packet_age_seconds", Integer, "MAX_SPA_PACKET_AGE"),
        OptionSpec::keyword("enable_digest_persistence", Boolean, "ENABLE_DIGEST_PERSISTENCE"),
        OptionSpec::keyword("rules_check_threshold", Integer, "RULES_CHECK_THRESHOLD"),
        OptionSpec::keyword("enable_ipt_forwarding", Boolean, "ENABLE_IPT_FORWARDING"),
        OptionSpec::keyword("enable_ipt_local_nat", Boolean, "ENABLE_IPT_LOCAL_NAT"),
        OptionSpec::keyword("enable_ipt_snat", Boolean, "ENABLE_IPT_SNAT"),
        OptionSpec::keyword("snat_translate_ip", STRING, "SNAT_TRANSLATE_IP"),
        OptionSpec::keyword("enable_ipt_output", Boolean, "ENABLE_IPT_OUTPUT"),
        OptionSpec::keyword("max_sniff_bytes", Integer, "MAX_SNIFF_BYTES"),
        OptionSpec::keyword("flush_ipt_at_init", Boolean, "FLUSH_IPT_AT_INIT"),
        OptionSpec::keyword("flush_ipt_at_exit", Boolean, "FLUSH_IPT_AT_EXIT"),
        OptionSpec::keyword("exit_at_intf_down", Boolean, "EXIT_AT_INTF_DOWN"),
        OptionSpec::keyword("enable_rule_prepend", Boolean, "ENABLE_RULE_PREPEND"),
        OptionSpec::keyword("enable_nat_dns", Boolean, "ENABLE_NAT_DNS"),
        OptionSpec::keyword("gpg_home_dir", STRING, "GPG_HOME_DIR"),
        OptionSpec::keyword("gpg_exe", STRING, "GPG_EXE"),
        OptionSpec::keyword("locale", STRING, "LOCALE"),
        OptionSpec::keyword("enable_spa_over_http", Boolean, "ENABLE_SPA_OVER_HTTP"),
        OptionSpec::keyword("enable_x_forwarded_for", Boolean, "ENABLE_X_FORWARDED_FOR"),
        OptionSpec::keyword("enable_tcp_server", Boolean, "ENABLE_TCP_SERVER"),
        OptionSpec::keyword("tcpserv_port", Integer, "TCPSERV_PORT"),
        OptionSpec::keyword("enable_udp_server", Boolean, "ENABLE_UDP_SERVER"),
        OptionSpec::keyword("udpserv_port", Integer, "UDPSERV_PORT"),
        OptionSpec::keyword("pcap_dispatch_count", Integer, "PCAP_DISPATCH_COUNT"),
        OptionSpec::keyword("pcap_loop_sleep_microseconds", Integer, "PCAP_LOOP_SLEEP"),
        OptionSpec::keyword("enable_pcap_any_direction", Boolean, "ENABLE_PCAP_ANY_DIRECTION"),
        OptionSpec::keyword("syslog_identity", STRING, "SYSLOG_IDENTITY"),
        OptionSpec::keyword("syslog_facility", OptionKind::Enum(SYSLOG_FACILITIES), "SYSLOG_FACILITY"),
        OptionSpec::keyword("enable_destination_rule", Boolean, "ENABLE_DESTINATION_RULE"),
        OptionSpec::keyword("fwknop_run_dir", STRING, "FWKNOP_RUN_DIR"),
    ],
};

/// Directives of one `access.conf` stanza.
pub static ACCESS_CATALOG: Catalog = Catalog {
    name: "access.conf",
    line_style: LineStyle {
        keyword_width: 27,
        terminator: "",
    },
    options: &[
        OptionSpec::keyword(SOURCE, List, "SOURCE"),
        OptionSpec::keyword("destination", List, "DESTINATION"),
        OptionSpec::keyword("open_ports", List, "OPEN_PORTS"),
        OptionSpec::keyword("restrict_ports", List, "RESTRICT_PORTS"),
        OptionSpec::keyword(KEY, SensitiveString, "KEY"),
        OptionSpec::keyword(KEY_BASE64, SensitiveString, "KEY_BASE64"),
        OptionSpec::keyword(GPG_DECRYPT_ID, STRING, "GPG_DECRYPT_ID"),
        OptionSpec::keyword(GPG_DECRYPT_PW, SensitiveString, "GPG_DECRYPT_PW"),
        OptionSpec::keyword("hmac_key", SensitiveString, "HMAC_KEY"),
        OptionSpec::keyword("hmac_key_base64", SensitiveString, "HMAC_KEY_BASE64"),
        OptionSpec::keyword("fw_access_timeout_seconds", Integer, "FW_ACCESS_TIMEOUT"),
        OptionSpec::pragma("include", STRING, "%include"),
        OptionSpec::pragma("include_folder", STRING, "%include_folder"),
        OptionSpec::keyword("encryption_mode", OptionKind::Enum(ENCRYPTION_MODES), "ENCRYPTION_MODE"),
        OptionSpec::keyword("hmac_digest_type", OptionKind::Enum(HMAC_DIGEST_TYPES), "HMAC_DIGEST_TYPE"),
        OptionSpec::keyword("access_expire", STRING, "ACCESS_EXPIRE"),
        OptionSpec::keyword("access_expire_epoch", Integer, "ACCESS_EXPIRE_EPOCH"),
        OptionSpec::keyword("enable_cmd_exec", Boolean, "ENABLE_CMD_EXEC"),
        OptionSpec::keyword("enable_cmd_sudo_exec", Boolean, "ENABLE_CMD_SUDO_EXEC"),
        OptionSpec::keyword("cmd_exec_user", STRING, "CMD_EXEC_USER"),
        OptionSpec::keyword("cmd_sudo_exec_user", STRING, "CMD_SUDO_EXEC_USER"),
        OptionSpec::keyword("cmd_exec_group", STRING, "CMD_EXEC_GROUP"),
        OptionSpec::keyword("cmd_sudo_exec_group", STRING, "CMD_SUDO_EXEC_GROUP"),
        OptionSpec::keyword("cmd_cycle_open", STRING, "CMD_CYCLE_OPEN"),
        OptionSpec::keyword("cmd_cycle_close", STRING, "CMD_CYCLE_CLOSE"),
        OptionSpec::keyword("cmd_cycle_timer_seconds", Integer, "CMD_CYCLE_TIMER"),
        OptionSpec::keyword("sudo_exe", STRING, "SUDO_EXE"),
        OptionSpec::keyword("require_username", STRING, "REQUIRE_USERNAME"),
        OptionSpec::keyword("require_source_address", Boolean, "REQUIRE_SOURCE_ADDRESS"),
        OptionSpec::keyword("force_nat", STRING, "FORCE_NAT"),
        OptionSpec::keyword("force_snat", STRING, "FORCE_SNAT"),
        OptionSpec::keyword("force_masquerade", Boolean, "FORCE_MASQUERADE"),
        OptionSpec::keyword("forward_all", Boolean, "FORWARD_ALL"),
        OptionSpec::keyword("disable_dnat", Boolean, "DISABLE_DNAT"),
        OptionSpec::keyword(GPG_ALLOW_NO_PW, Boolean, "GPG_ALLOW_NO_PW"),
        OptionSpec::keyword("gpg_require_sig", Boolean, "GPG_REQUIRE_SIG"),
        OptionSpec::keyword("gpg_disable_sig", Boolean, "GPG_DISABLE_SIG"),
        OptionSpec::keyword("gpg_ignore_sig_verify_error", Boolean, "GPG_IGNORE_SIG_VERIFY_ERROR"),
        OptionSpec::keyword("gpg_remote_id", STRING, "GPG_REMOTE_ID"),
        OptionSpec::keyword("gpg_fingerprint_id", STRING, "GPG_FINGERPRINT_ID"),
        OptionSpec::keyword("gpg_home_dir", STRING, "GPG_HOME_DIR"),
        OptionSpec::keyword("gpg_exe", STRING, "GPG_EXE"),
    ],
};
