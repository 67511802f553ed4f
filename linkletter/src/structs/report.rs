/// Outcome of one delivered (or skipped) digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub user_id: i64,
    pub email: String,
    pub link_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchFailure {
    pub user_id: i64,
    pub email: String,
    pub reason: String,
}

/// Aggregate result of one digest run. The run itself always completes;
/// per-user failures only show up here, they never abort the batch.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub sent: Vec<DispatchOutcome>,
    pub failed: Vec<DispatchFailure>,
    /// Candidates whose digest for the week was already delivered
    pub skipped: Vec<DispatchOutcome>,
}

impl DispatchReport {
    pub fn summary(&self) -> String {
        format!(
            "sent {} digests ({} failed, {} already delivered)",
            self.sent.len(),
            self.failed.len(),
            self.skipped.len()
        )
    }
}

/// One payload item that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSkip {
    /// Index of the item within its payload section; the reason names
    /// the section ("user ..." / "link ...")
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: usize,
    pub users_upserted: usize,
    pub skipped: Vec<ImportSkip>,
}

#[derive(Debug, Default)]
pub struct BulkReport {
    pub affected: usize,
    /// Ids that were missing or owned by someone else
    pub skipped: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let mut report = DispatchReport::default();
        report.sent.push(DispatchOutcome {
            user_id: 1,
            email: "a@example.org".to_string(),
            link_count: 3,
        });
        report.failed.push(DispatchFailure {
            user_id: 2,
            email: "b@example.org".to_string(),
            reason: "gateway returned 500".to_string(),
        });

        assert_eq!(report.summary(), "sent 1 digests (1 failed, 0 already delivered)");
    }
}
