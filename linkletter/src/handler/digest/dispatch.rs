use super::render;
use crate::errors::Result;
use crate::mailer::Mailer;
use crate::structs::{DigestCandidate, DispatchFailure, DispatchOutcome, DispatchReport};

use log::{debug, error, info, warn};
use store::structs::Digest;
use store::WriteableDb;

enum Outcome {
    Sent,
    AlreadySent,
}

/// Delivers a batch of digest candidates, one record + one gateway call
/// each. Candidates are fully independent: any failure is recorded in
/// the report and the loop moves on, so one broken mailbox can never
/// block the rest of the batch. The report is returned even when every
/// single delivery failed.
pub async fn dispatch(
    db: &impl WriteableDb,
    mailer: &dyn Mailer,
    candidates: &[DigestCandidate],
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for candidate in candidates {
        match dispatch_one(db, mailer, candidate).await {
            Ok(Outcome::Sent) => {
                info!(
                    "sent week {} digest with {} links to {}",
                    candidate.week,
                    candidate.links.len(),
                    candidate.user.email
                );
                report.sent.push(outcome_of(candidate));
            }
            Ok(Outcome::AlreadySent) => {
                debug!(
                    "week {} digest for {} already delivered, skipping",
                    candidate.week, candidate.user.email
                );
                report.skipped.push(outcome_of(candidate));
            }
            Err(why) => {
                error!("digest for {} failed: {why}", candidate.user.email);
                report.failed.push(DispatchFailure {
                    user_id: candidate.user.id,
                    email: candidate.user.email.clone(),
                    reason: why.to_string(),
                });
            }
        }
    }

    report
}

/// One candidate, in isolation. The digest record is the idempotency
/// gate: it must exist (durably) before the send is attempted, and it is
/// marked sent only after the gateway confirmed delivery. A record left
/// over from a failed earlier run is reused, never duplicated.
async fn dispatch_one(
    db: &impl WriteableDb,
    mailer: &dyn Mailer,
    candidate: &DigestCandidate,
) -> Result<Outcome> {
    let digest: Digest = match db.get_digest(candidate.user.id, candidate.year, candidate.week)? {
        Some(existing) if existing.email_sent => return Ok(Outcome::AlreadySent),
        Some(existing) => {
            info!(
                "retrying digest {} for {} (previous attempt failed)",
                existing.id, candidate.user.email
            );
            existing
        }
        None => db.create_digest(
            candidate.user.id,
            candidate.year,
            candidate.week,
            &candidate.link_ids(),
        )?,
    };

    let subject = render::digest_subject(candidate.week);
    let html = render::digest_html(
        &candidate.user,
        &candidate.links,
        candidate.year,
        candidate.week,
    );

    match mailer.send(&candidate.user.email, &subject, &html).await {
        Ok(()) => {
            db.mark_digest_sent(digest.id)?;
            Ok(Outcome::Sent)
        }
        Err(why) => {
            // the record stays unsent; flag it so a later run can tell
            // this apart from a digest that was never attempted
            if let Err(db_why) = db.mark_digest_failed(digest.id) {
                warn!("could not flag digest {} as failed: {db_why}", digest.id);
            }
            Err(why)
        }
    }
}

fn outcome_of(candidate: &DigestCandidate) -> DispatchOutcome {
    DispatchOutcome {
        user_id: candidate.user.id,
        email: candidate.user.email.clone(),
        link_count: candidate.links.len(),
    }
}
