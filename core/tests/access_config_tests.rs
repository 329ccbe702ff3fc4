// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Access block rendering and validation.
//!
//! Every option of the access catalog is exercised on its own against the
//! exact fragment text the daemon expects, followed by the validation rules
//! and multi-block assembly.

use std::collections::BTreeMap;

use fwknop_core::domain::access::{AccessBlock, Order};
use fwknop_core::domain::assembler::{assemble, FragmentAssembler};
use fwknop_core::domain::error::ConfigError;
use fwknop_core::domain::option::RawValue;

fn block(title: &str, params: &str) -> Result<AccessBlock, ConfigError> {
    let raw: BTreeMap<String, RawValue> = serde_yaml::from_str(params).unwrap();
    AccessBlock::from_raw(title, Order::default(), &raw)
}

fn fragment(title: &str, lines: &[&str]) -> String {
    let mut out = format!("\n# {}\n", title);
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// (parameters as YAML, expected directive lines)
const SINGLE_OPTION_CASES: &[(&str, &[&str])] = &[
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, source: '10.0.0.0/8' }"#,
        &[
            "SOURCE                      10.0.0.0/8",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, destination: '10.1.2.3' }"#,
        &[
            "SOURCE                      ANY",
            "DESTINATION                 10.1.2.3",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, open_ports: 'tcp/22' }"#,
        &[
            "SOURCE                      ANY",
            "OPEN_PORTS                  tcp/22",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, restrict_ports: 'udp/67' }"#,
        &[
            "SOURCE                      ANY",
            "RESTRICT_PORTS              udp/67",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, hmac_key: 'wk5w6pac5rxzw9euj98bc7z94h16shnfgnnw86ff1atuukdridww7uq85ez556py' }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "HMAC_KEY                    wk5w6pac5rxzw9euj98bc7z94h16shnfgnnw86ff1atuukdridww7uq85ez556py",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, hmac_key: { sensitive: 'gxpqf5ctz3sa469qdfsbee6h17zi16egaofom9ces4gqqd78rc4beaz48qmz8oi7' } }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "HMAC_KEY                    gxpqf5ctz3sa469qdfsbee6h17zi16egaofom9ces4gqqd78rc4beaz48qmz8oi7",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, hmac_key_base64: 'yZCbmQbzphgpmo7KmwiJsIXNTttwf4Gjk/5jLqr95Sq0MUE79RZLOR1SJMpxJIctrbHXH1IT9u9+VvWvBOG0yw==' }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "HMAC_KEY_BASE64             yZCbmQbzphgpmo7KmwiJsIXNTttwf4Gjk/5jLqr95Sq0MUE79RZLOR1SJMpxJIctrbHXH1IT9u9+VvWvBOG0yw==",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, hmac_key_base64: { sensitive: 'MyIkbucl9iGS6Mo6tNMx7WO2V78YxmcJw5vkbQ6tRdRZSp5u1/UIJaFgU1R6XZ3940X5bvG/1LRMqxDhuLPF4Q==' } }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "HMAC_KEY_BASE64             MyIkbucl9iGS6Mo6tNMx7WO2V78YxmcJw5vkbQ6tRdRZSp5u1/UIJaFgU1R6XZ3940X5bvG/1LRMqxDhuLPF4Q==",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, fw_access_timeout_seconds: 30 }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "FW_ACCESS_TIMEOUT           30",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, include: '/home/cooldude/.access.conf' }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "%include                    /home/cooldude/.access.conf",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, include_folder: '/usr/local/fwknop_access' }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "%include_folder             /usr/local/fwknop_access",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, encryption_mode: 'CBC' }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "ENCRYPTION_MODE             CBC",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, hmac_digest_type: 'SHA256' }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "HMAC_DIGEST_TYPE            SHA256",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, access_expire: '01/01/1999' }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "ACCESS_EXPIRE               01/01/1999",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, access_expire_epoch: 915166800 }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "ACCESS_EXPIRE_EPOCH         915166800",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, enable_cmd_exec: true }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "ENABLE_CMD_EXEC             Y",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, enable_cmd_exec: false }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "ENABLE_CMD_EXEC             N",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, enable_cmd_sudo_exec: true }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "ENABLE_CMD_SUDO_EXEC        Y",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, enable_cmd_sudo_exec: false }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "ENABLE_CMD_SUDO_EXEC        N",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, cmd_exec_user: 'eg_username' }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "CMD_EXEC_USER               eg_username",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, cmd_sudo_exec_user: 'eg_username' }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "CMD_SUDO_EXEC_USER          eg_username",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, cmd_exec_group: 'eg_group' }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "CMD_EXEC_GROUP              eg_group",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, cmd_sudo_exec_group: 'eg_group' }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "CMD_SUDO_EXEC_GROUP         eg_group",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, cmd_cycle_open: 'echo open $DST:$PROTO/$PORT to $SRC for $TIMEOUT seconds thanks to $PKT_SRC' }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "CMD_CYCLE_OPEN              echo open $DST:$PROTO/$PORT to $SRC for $TIMEOUT seconds thanks to $PKT_SRC",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, cmd_cycle_close: 'NONE' }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "CMD_CYCLE_CLOSE             NONE",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, cmd_cycle_timer_seconds: 45 }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "CMD_CYCLE_TIMER             45",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, sudo_exe: '/usr/local/bin/sudo' }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "SUDO_EXE                    /usr/local/bin/sudo",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, require_username: 'cooldude' }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "REQUIRE_USERNAME            cooldude",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, require_source_address: true }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "REQUIRE_SOURCE_ADDRESS      Y",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, require_source_address: false }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "REQUIRE_SOURCE_ADDRESS      N",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, force_nat: '10.1.2.3 25' }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "FORCE_NAT                   10.1.2.3 25",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, force_snat: '10.4.5.6' }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "FORCE_SNAT                  10.4.5.6",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, force_masquerade: true }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "FORCE_MASQUERADE            Y",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, force_masquerade: false }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "FORCE_MASQUERADE            N",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, forward_all: true }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "FORWARD_ALL                 Y",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, forward_all: false }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "FORWARD_ALL                 N",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, disable_dnat: true }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "DISABLE_DNAT                Y",
        ],
    ),
    (
        r#"{ key: { sensitive: 'gbonnczh9sxe8xkzzdy3waqwb6qb7uxr' }, disable_dnat: false }"#,
        &[
            "SOURCE                      ANY",
            "KEY                         gbonnczh9sxe8xkzzdy3waqwb6qb7uxr",
            "DISABLE_DNAT                N",
        ],
    ),
    (
        r#"{ gpg_decrypt_id: 'bcd35d73e538b5b5a53bee711b567de9c5eaa20b', gpg_decrypt_pw: 'r6k9sctpq7sftt37pp6urer6g8' }"#,
        &[
            "SOURCE                      ANY",
            "GPG_DECRYPT_ID              bcd35d73e538b5b5a53bee711b567de9c5eaa20b",
            "GPG_DECRYPT_PW              r6k9sctpq7sftt37pp6urer6g8",
        ],
    ),
    (
        r#"{ gpg_decrypt_id: 'bcd35d73e538b5b5a53bee711b567de9c5eaa20b', gpg_decrypt_pw: { sensitive: 'n1ots9rgrbmmeuzewditpbw7xo' } }"#,
        &[
            "SOURCE                      ANY",
            "GPG_DECRYPT_ID              bcd35d73e538b5b5a53bee711b567de9c5eaa20b",
            "GPG_DECRYPT_PW              n1ots9rgrbmmeuzewditpbw7xo",
        ],
    ),
    (
        r#"{ gpg_decrypt_id: 'bcd35d73e538b5b5a53bee711b567de9c5eaa20b', gpg_allow_no_pw: true }"#,
        &[
            "SOURCE                      ANY",
            "GPG_DECRYPT_ID              bcd35d73e538b5b5a53bee711b567de9c5eaa20b",
            "GPG_ALLOW_NO_PW             Y",
        ],
    ),
    (
        r#"{ gpg_decrypt_id: 'bcd35d73e538b5b5a53bee711b567de9c5eaa20b', gpg_allow_no_pw: true, gpg_require_sig: true }"#,
        &[
            "SOURCE                      ANY",
            "GPG_DECRYPT_ID              bcd35d73e538b5b5a53bee711b567de9c5eaa20b",
            "GPG_ALLOW_NO_PW             Y",
            "GPG_REQUIRE_SIG             Y",
        ],
    ),
    (
        r#"{ gpg_decrypt_id: 'bcd35d73e538b5b5a53bee711b567de9c5eaa20b', gpg_allow_no_pw: true, gpg_require_sig: false }"#,
        &[
            "SOURCE                      ANY",
            "GPG_DECRYPT_ID              bcd35d73e538b5b5a53bee711b567de9c5eaa20b",
            "GPG_ALLOW_NO_PW             Y",
            "GPG_REQUIRE_SIG             N",
        ],
    ),
    (
        r#"{ gpg_decrypt_id: 'bcd35d73e538b5b5a53bee711b567de9c5eaa20b', gpg_allow_no_pw: true, gpg_disable_sig: true }"#,
        &[
            "SOURCE                      ANY",
            "GPG_DECRYPT_ID              bcd35d73e538b5b5a53bee711b567de9c5eaa20b",
            "GPG_ALLOW_NO_PW             Y",
            "GPG_DISABLE_SIG             Y",
        ],
    ),
    (
        r#"{ gpg_decrypt_id: 'bcd35d73e538b5b5a53bee711b567de9c5eaa20b', gpg_allow_no_pw: true, gpg_disable_sig: false }"#,
        &[
            "SOURCE                      ANY",
            "GPG_DECRYPT_ID              bcd35d73e538b5b5a53bee711b567de9c5eaa20b",
            "GPG_ALLOW_NO_PW             Y",
            "GPG_DISABLE_SIG             N",
        ],
    ),
    (
        r#"{ gpg_decrypt_id: 'bcd35d73e538b5b5a53bee711b567de9c5eaa20b', gpg_allow_no_pw: true, gpg_ignore_sig_verify_error: true }"#,
        &[
            "SOURCE                      ANY",
            "GPG_DECRYPT_ID              bcd35d73e538b5b5a53bee711b567de9c5eaa20b",
            "GPG_ALLOW_NO_PW             Y",
            "GPG_IGNORE_SIG_VERIFY_ERROR Y",
        ],
    ),
    (
        r#"{ gpg_decrypt_id: 'bcd35d73e538b5b5a53bee711b567de9c5eaa20b', gpg_allow_no_pw: true, gpg_ignore_sig_verify_error: false }"#,
        &[
            "SOURCE                      ANY",
            "GPG_DECRYPT_ID              bcd35d73e538b5b5a53bee711b567de9c5eaa20b",
            "GPG_ALLOW_NO_PW             Y",
            "GPG_IGNORE_SIG_VERIFY_ERROR N",
        ],
    ),
    (
        r#"{ gpg_decrypt_id: 'bcd35d73e538b5b5a53bee711b567de9c5eaa20b', gpg_allow_no_pw: true, gpg_remote_id: '1a952919b7a7bc497f38378092f9241b2aa0945f' }"#,
        &[
            "SOURCE                      ANY",
            "GPG_DECRYPT_ID              bcd35d73e538b5b5a53bee711b567de9c5eaa20b",
            "GPG_ALLOW_NO_PW             Y",
            "GPG_REMOTE_ID               1a952919b7a7bc497f38378092f9241b2aa0945f",
        ],
    ),
    (
        r#"{ gpg_decrypt_id: 'bcd35d73e538b5b5a53bee711b567de9c5eaa20b', gpg_allow_no_pw: true, gpg_fingerprint_id: 'e4a8dae22083ab7e0ca16d290cf78d9d66d751c9' }"#,
        &[
            "SOURCE                      ANY",
            "GPG_DECRYPT_ID              bcd35d73e538b5b5a53bee711b567de9c5eaa20b",
            "GPG_ALLOW_NO_PW             Y",
            "GPG_FINGERPRINT_ID          e4a8dae22083ab7e0ca16d290cf78d9d66d751c9",
        ],
    ),
    (
        r#"{ gpg_decrypt_id: 'bcd35d73e538b5b5a53bee711b567de9c5eaa20b', gpg_allow_no_pw: true, gpg_home_dir: '/home/cooldude/.gnupg' }"#,
        &[
            "SOURCE                      ANY",
            "GPG_DECRYPT_ID              bcd35d73e538b5b5a53bee711b567de9c5eaa20b",
            "GPG_ALLOW_NO_PW             Y",
            "GPG_HOME_DIR                /home/cooldude/.gnupg",
        ],
    ),
    (
        r#"{ gpg_decrypt_id: 'bcd35d73e538b5b5a53bee711b567de9c5eaa20b', gpg_allow_no_pw: true, gpg_exe: '/usr/local/bin/gpg' }"#,
        &[
            "SOURCE                      ANY",
            "GPG_DECRYPT_ID              bcd35d73e538b5b5a53bee711b567de9c5eaa20b",
            "GPG_ALLOW_NO_PW             Y",
            "GPG_EXE                     /usr/local/bin/gpg",
        ],
    ),
    (
        r#"{ gpg_decrypt_id: 'bcd35d73e538b5b5a53bee711b567de9c5eaa20b', gpg_allow_no_pw: false, gpg_decrypt_pw: 'anscxk7aeu8ystoz1gtuere7zh' }"#,
        &[
            "SOURCE                      ANY",
            "GPG_DECRYPT_ID              bcd35d73e538b5b5a53bee711b567de9c5eaa20b",
            "GPG_DECRYPT_PW              anscxk7aeu8ystoz1gtuere7zh",
            "GPG_ALLOW_NO_PW             N",
        ],
    ),
];

#[test]
fn test_each_option_renders_expected_fragment() {
    for (params, lines) in SINGLE_OPTION_CASES {
        let block = block("checking each parameter", params)
            .unwrap_or_else(|e| panic!("{} rejected: {}", params, e));
        assert_eq!(
            block.fragment(),
            fragment("checking each parameter", lines),
            "params: {}",
            params
        );
    }
}

#[test]
fn test_required_fields() {
    let title = "testing required fields";

    assert!(matches!(
        block(title, "{}"),
        Err(ConfigError::MissingAuthMethod { .. })
    ));

    let key = block(title, "{ key: example }").unwrap();
    assert_eq!(key.order(), &Order::Numeric(10));
    assert_eq!(
        key.fragment(),
        fragment(title, &["SOURCE                      ANY", "KEY                         example"])
    );

    let key_base64 = block(title, "{ key_base64: 'example=' }").unwrap();
    assert_eq!(
        key_base64.fragment(),
        fragment(title, &["SOURCE                      ANY", "KEY_BASE64                  example="])
    );

    let gpg = block(title, "{ gpg_decrypt_id: abcd1234, gpg_decrypt_pw: efgh5678 }").unwrap();
    assert_eq!(
        gpg.fragment(),
        fragment(
            title,
            &[
                "SOURCE                      ANY",
                "GPG_DECRYPT_ID              abcd1234",
                "GPG_DECRYPT_PW              efgh5678",
            ]
        )
    );
}

#[test]
fn test_auth_methods_are_mutually_exclusive() {
    for params in [
        "{ key: example, key_base64: 'example=' }",
        "{ key: example, gpg_decrypt_id: acbd1234 }",
        "{ key_base64: 'example=', gpg_decrypt_id: acbd1234 }",
        "{ gpg_decrypt_id: abcd1234, gpg_decrypt_pw: efgh5678, key: example }",
    ] {
        assert!(
            matches!(
                block("t", params),
                Err(ConfigError::ConflictingAuthMethod { .. })
            ),
            "{}",
            params
        );
    }
}

#[test]
fn test_gpg_password_rules() {
    let id = "gpg_decrypt_id: bcd35d73e538b5b5a53bee711b567de9c5eaa20b";
    assert!(matches!(
        block("t", &format!("{{ {} }}", id)),
        Err(ConfigError::MissingGpgPassword { .. })
    ));
    assert!(matches!(
        block("t", &format!("{{ {}, gpg_allow_no_pw: false }}", id)),
        Err(ConfigError::MissingGpgPassword { .. })
    ));
    assert!(matches!(
        block("t", &format!("{{ {}, gpg_allow_no_pw: true, gpg_decrypt_pw: x }}", id)),
        Err(ConfigError::ConflictingGpgPassword { .. })
    ));
}

#[test]
fn test_type_errors_name_the_block() {
    let err = block("typed", "{ key: example, fw_access_timeout_seconds: thirty }").unwrap_err();
    match err {
        ConfigError::InvalidOptionType {
            context, option, ..
        } => {
            assert!(context.contains("typed"));
            assert_eq!(option, "fw_access_timeout_seconds");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    assert!(matches!(
        block("t", "{ key: example, encryption_mode: XTS }"),
        Err(ConfigError::InvalidEnumValue { .. })
    ));
    assert!(matches!(
        block("t", "{ key: example, not_an_option: 1 }"),
        Err(ConfigError::UnknownOption { .. })
    ));
}

#[test]
fn test_list_values_join_with_comma() {
    let b = block(
        "lists",
        "{ key: example, source: [10.0.0.0/8, 192.168.1.0/24], open_ports: [tcp/22, udp/53] }",
    )
    .unwrap();
    assert_eq!(
        b.body_lines(),
        &[
            "SOURCE                      10.0.0.0/8, 192.168.1.0/24",
            "OPEN_PORTS                  tcp/22, udp/53",
            "KEY                         example",
        ]
    );
}

#[test]
fn test_empty_list_is_rejected() {
    let err = block("empty", "{ key: k, source: [] }").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidOptionType { ref option, ref found, .. }
            if option == "source" && found == "empty list"
    ));
    assert!(block("empty", "{ key: k, open_ports: [] }").is_err());
}

#[test]
fn test_order_string_is_parsed() {
    let raw: BTreeMap<String, RawValue> = serde_yaml::from_str("{ key: example }").unwrap();
    let b = AccessBlock::from_raw("t", Order::parse("111"), &raw).unwrap();
    assert_eq!(b.order(), &Order::Numeric(111));
}

#[test]
fn test_assembly_is_independent_of_declaration_order() {
    let blocks = || {
        vec![
            block("web", "{ key: w, open_ports: tcp/443 }").unwrap(),
            block("admins", "{ key: a }").unwrap(),
            AccessBlock::from_raw(
                "early",
                Order::from(5),
                &serde_yaml::from_str("{ key: e }").unwrap(),
            )
            .unwrap(),
        ]
    };

    let forward = assemble("# Managed by fwknop-manager.", blocks()).unwrap();
    let mut reversed = blocks();
    reversed.reverse();
    let backward = assemble("# Managed by fwknop-manager.", reversed).unwrap();

    assert_eq!(forward, backward);
    assert_eq!(
        forward,
        "# Managed by fwknop-manager.\n\
         \n# early\nSOURCE                      ANY\nKEY                         e\n\
         \n# admins\nSOURCE                      ANY\nKEY                         a\n\
         \n# web\nSOURCE                      ANY\nOPEN_PORTS                  tcp/443\nKEY                         w\n"
    );
}

#[test]
fn test_duplicate_title_keeps_first() {
    let mut assembler = FragmentAssembler::default();
    assembler.declare(block("same", "{ key: first }").unwrap()).unwrap();
    let err = assembler
        .declare(block("same", "{ key: second }").unwrap())
        .unwrap_err();
    assert_eq!(err.block_title(), Some("same"));
    assert!(assembler.assemble().contains("KEY                         first"));
    assert!(!assembler.assemble().contains("second"));
}
