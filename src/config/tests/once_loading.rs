//! Tests for parsing `once` through the derived command line.

use std::ffi::OsString;

use ortho_config::OrthoConfig;
use rstest::rstest;

use crate::KudosConfig;

/// Loads configuration from `cli_args` with an empty home directory.
///
/// `ortho_config` does not load boolean values from the environment, so the
/// flag is only exercised through the command line.
fn load_with_args(cli_args: &[&str]) -> KudosConfig {
    let temp_dir = tempfile::TempDir::new().expect("temp dir should be created");
    let home = temp_dir.path().to_string_lossy().to_string();

    let _guard = env_lock::lock_env([
        ("HOME", Some(home.as_str())),
        ("XDG_CONFIG_HOME", Some(home.as_str())),
    ]);

    let mut args = vec![OsString::from("kudos")];
    args.extend(cli_args.iter().map(OsString::from));

    KudosConfig::load_from_iter(args).expect("config should load")
}

#[rstest]
#[case::absent(&[], false)]
#[case::long_flag(&["--once"], true)]
#[case::short_flag(&["-O"], true)]
fn once_is_read_from_the_command_line(#[case] cli_args: &[&str], #[case] expected: bool) {
    let config = load_with_args(cli_args);

    assert_eq!(config.once, expected);
}

#[rstest]
fn lowercase_short_flag_still_sets_the_bonus_tag() {
    let config = load_with_args(&["-o", "teamwork", "--once"]);

    assert_eq!(config.bonus_tag.as_deref(), Some("teamwork"));
    assert!(config.once);
}
