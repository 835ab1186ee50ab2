// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `repair` sub-command wrapper around the backfill.

use tracing::debug;

use crate::backfill::{Backfill, BackfillReport, BackfillRequest};
use crate::error::RepairError;

/// Identifier used in `--skip` / `--only` to address this task.
pub const SUB_COMMAND: &str = "createPropertyChangeState";

/// The only command this plugin contributes to.
pub const REPAIR_COMMAND: &str = "repair";

const SHORT_DESCRIPTION: &str = "Run integrity checks related to Neos features";

const DESCRIPTION: &str = "
Add initial state for PropertyChangesUi
createPropertyChangeState

All nodes' text properties' values will be set as last known and accepted value.
";

/// Arguments of the `repair` command as seen by this plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOptions {
    /// Restrict to this node type (and its concrete descendants).
    pub node_type: Option<String>,
    /// Workspace to repair.
    pub workspace: String,
    /// Count without writing.
    pub dry_run: bool,
    /// Accepted for interface compatibility; unused by this task.
    pub cleanup: bool,
    /// Comma-separated task names to skip.
    pub skip: Option<String>,
    /// Comma-separated task names to run exclusively.
    pub only: Option<String>,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            node_type: None,
            workspace: "live".to_owned(),
            dry_run: false,
            cleanup: true,
            skip: None,
            only: None,
        }
    }
}

impl RepairOptions {
    /// Whether the skip/only lists select this task.
    pub fn selects(&self, task: &str) -> bool {
        let skip = split_list(self.skip.as_deref());
        let only = split_list(self.only.as_deref());
        !skip.contains(&task) && (only.is_empty() || only.contains(&task))
    }
}

/// Trimmed, non-blank entries of a comma-separated list.
fn split_list(raw: Option<&str>) -> Vec<&str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Property-change task of the node `repair` command.
pub struct PropertyChangesRepair<'a> {
    backfill: Backfill<'a>,
}

impl<'a> PropertyChangesRepair<'a> {
    /// Wrap a wired backfill engine.
    pub fn new(backfill: Backfill<'a>) -> Self {
        Self { backfill }
    }

    /// One-line summary for `command`; empty for commands this plugin ignores.
    pub fn short_description(command: &str) -> &'static str {
        if command == REPAIR_COMMAND {
            SHORT_DESCRIPTION
        } else {
            ""
        }
    }

    /// Help text for `command`; empty for commands this plugin ignores.
    pub fn description(command: &str) -> &'static str {
        if command == REPAIR_COMMAND {
            DESCRIPTION
        } else {
            ""
        }
    }

    /// Run the task for `command`.
    ///
    /// Returns `Ok(None)` when the command is not `repair` or the task is
    /// deselected by `skip`/`only`.
    pub fn invoke(
        &self,
        command: &str,
        options: &RepairOptions,
    ) -> Result<Option<BackfillReport>, RepairError> {
        if command != REPAIR_COMMAND {
            return Ok(None);
        }
        if !options.selects(SUB_COMMAND) {
            debug!(task = SUB_COMMAND, "task deselected");
            return Ok(None);
        }
        let request = BackfillRequest {
            node_type: options.node_type.clone(),
            workspace: options.workspace.clone(),
            dry_run: options.dry_run,
        };
        self.backfill.run(&request).map(Some)
    }
}
