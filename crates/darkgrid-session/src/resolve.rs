//! Night-action records and the round resolution rules.
//!
//! Resolution is a pure function of the round's records and the current
//! roster: protections first, then attacks in chronological submission
//! order, scans not at all (they are answered at submission time). The
//! session applies the returned report; re-running resolution on the same
//! inputs yields the same report.

use std::collections::HashSet;

use darkgrid_protocol::{ActionKind, ActionOutcome};

use crate::Player;

// ---------------------------------------------------------------------------
// Action records
// ---------------------------------------------------------------------------

/// One submitted night action, pending resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    /// Identity of the submitting player.
    pub issuer: String,
    pub kind: ActionKind,
    /// Identity of the target.
    pub target: String,
    /// Round the action was submitted in.
    pub round: u32,
}

/// The per-round pending-action table.
///
/// At most one record per issuer: a resubmission in the same round
/// overwrites the earlier record and takes its place at the end of the
/// chronological order. Last-write-wins on purpose — it makes client
/// retries against `submit_action` idempotent.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    records: Vec<ActionRecord>,
}

impl ActionTable {
    /// Records an action, replacing any earlier record by the same issuer.
    pub fn record(&mut self, record: ActionRecord) {
        self.records.retain(|r| r.issuer != record.issuer);
        self.records.push(record);
    }

    /// The records in chronological submission order.
    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Empties the table. Called when a new round opens.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// The outcome resolution computed for one submitted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAction {
    pub issuer: String,
    pub kind: ActionKind,
    pub target: String,
    pub outcome: ActionOutcome,
}

/// What one round of resolution decided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Per-issuer outcomes, in the order the actions were submitted.
    pub actions: Vec<ResolvedAction>,
    /// Identities to mark offline, in elimination order.
    pub eliminated: Vec<String>,
}

/// Resolves one round's action table against the roster.
///
/// Order: protections mark their targets; attacks then land in
/// chronological order — a protected target survives (outcome
/// `Protected`), an unprotected online target goes offline (outcome
/// `Eliminated`), and any later attack on an already-resolved target is
/// reported back as `AlreadyResolved` without touching state. Scans were
/// answered at submission and are skipped here.
pub fn resolve(table: &ActionTable, roster: &[Player]) -> Resolution {
    let protected: HashSet<&str> = table
        .records()
        .iter()
        .filter(|r| r.kind == ActionKind::Protect)
        .map(|r| r.target.as_str())
        .collect();

    let mut resolved_targets: HashSet<&str> = HashSet::new();
    let mut report = Resolution::default();

    for record in table.records() {
        let outcome = match record.kind {
            ActionKind::Protect => ActionOutcome::Protected,
            ActionKind::Scan => continue,
            ActionKind::Target => {
                if resolved_targets.contains(record.target.as_str()) {
                    ActionOutcome::AlreadyResolved
                } else {
                    resolved_targets.insert(record.target.as_str());
                    if protected.contains(record.target.as_str()) {
                        ActionOutcome::Protected
                    } else if roster
                        .iter()
                        .any(|p| p.name == record.target && p.is_online())
                    {
                        report.eliminated.push(record.target.clone());
                        ActionOutcome::Eliminated
                    } else {
                        // Target went offline between submission and
                        // resolution (disconnect). Nothing to do.
                        ActionOutcome::AlreadyResolved
                    }
                }
            }
        };

        report.actions.push(ResolvedAction {
            issuer: record.issuer.clone(),
            kind: record.kind,
            target: record.target.clone(),
            outcome,
        });
    }

    report
}

// =========================================================================
// Tests
// =========================================================================
