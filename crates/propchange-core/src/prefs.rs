// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved operator defaults for the repair command.

use serde::{Deserialize, Serialize};

/// Defaults applied to `repair` when the matching flag is not given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepairPrefs {
    /// Workspace to backfill.
    pub workspace: String,
    /// Count intended updates without writing them.
    pub dry_run: bool,
    /// Forwarded to the repair plugin; the property-change task ignores it.
    pub cleanup: bool,
}

impl RepairPrefs {
    /// Config key the prefs are stored under.
    pub const KEY: &'static str = "repair-prefs";
}

impl Default for RepairPrefs {
    fn default() -> Self {
        Self {
            workspace: "live".to_owned(),
            dry_run: false,
            cleanup: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let prefs: RepairPrefs = serde_json::from_str(r#"{"workspace":"user-admin"}"#).unwrap();
        assert_eq!(prefs.workspace, "user-admin");
        assert!(!prefs.dry_run);
        assert!(prefs.cleanup);
    }
}
