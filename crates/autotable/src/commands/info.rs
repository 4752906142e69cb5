//! `info` command

use std::path::Path;

use autotable_core::ConnectionProfile;
use serde_json::{Value, json};

use crate::error::CliError;
use crate::output::print_json;

fn describe(config: &Path, profile_name: &str, profile: &ConnectionProfile) -> Value {
    json!({
        "config": config.display().to_string(),
        "profile": profile_name,
        "connection": profile.redacted(),
    })
}

/// Handle the `info` command
pub fn handle_info(
    config: &Path,
    profile_name: &str,
    profile: &ConnectionProfile,
    pretty: bool,
) -> Result<(), CliError> {
    print_json(&describe(config, profile_name, profile), pretty)
}
