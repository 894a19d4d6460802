use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use mirror_core::events::EventEnvelope;
use mirror_core::responses::ReplayResponse;
use mirror_db::store::IdentityStore;
use mirror_sync::SyncOutcome;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReplayArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `mirror replay`.
pub async fn handle(args: &ReplayArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = replay_file(&ctx.service, Path::new(&args.file)).await?;
    output(&response, flags.format)
}

/// Apply every envelope in a JSONL file in file order.
///
/// Stops at the first unreadable line or store failure. Events applied
/// before the failure stay applied; replaying the file again is safe.
pub async fn replay_file<S: IdentityStore>(store: &S, path: &Path) -> anyhow::Result<ReplayResponse> {
    let start = Instant::now();
    let mut response = ReplayResponse::default();

    let lines = serde_jsonlines::json_lines::<EventEnvelope, _>(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    for (index, line) in lines.enumerate() {
        let line_no = index + 1;
        let envelope =
            line.with_context(|| format!("{}:{line_no}: not an event envelope", path.display()))?;
        response.events_read += 1;

        let outcome = mirror_sync::apply(store, &envelope).await.with_context(|| {
            format!(
                "{}:{line_no}: failed to apply {} event",
                path.display(),
                envelope.kind
            )
        })?;
        tally(&mut response, outcome);
    }

    response.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    tracing::info!(
        events = response.events_read,
        applied = response.applied,
        "replay finished"
    );
    Ok(response)
}

fn tally(response: &mut ReplayResponse, outcome: SyncOutcome) {
    match outcome {
        SyncOutcome::Inserted | SyncOutcome::Patched | SyncOutcome::Deleted { .. } => {
            response.applied += 1;
        }
        SyncOutcome::Unchanged | SyncOutcome::Absent => response.unchanged += 1,
        SyncOutcome::Skipped => response.skipped += 1,
        SyncOutcome::Ignored => response.ignored += 1,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use mirror_db::service::MirrorService;
    use pretty_assertions::assert_eq;

    use super::*;

    const EVENTS: &[&str] = &[
        r#"{"type": "organizationMembership.created", "data": {"organization": {"id": "o1"}, "public_user_data": {"user_id": "u1"}, "role": "org:admin"}}"#,
        r#"{"type": "user.created", "data": {"id": "u1", "first_name": "Ada", "last_name": "Lovelace"}}"#,
        r#"{"type": "organization.created", "data": {"id": "o1", "name": "Analytical Engines"}}"#,
        r#"{"type": "organizationMembership.created", "data": {"organization": {"id": "o1"}, "public_user_data": {"user_id": "u1"}, "role": "org:admin"}}"#,
        r#"{"type": "session.created", "data": {"id": "sess_1"}}"#,
        r#"{"type": "user.updated", "data": {"first_name": "Nobody"}}"#,
        r#"{"type": "user.deleted", "data": {"id": "u404", "deleted": true}}"#,
    ];

    fn jsonl(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    async fn store() -> MirrorService {
        MirrorService::new_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn replays_in_file_order_and_counts_outcomes() {
        let store = store().await;
        let file = jsonl(EVENTS);

        let response = replay_file(&store, file.path()).await.unwrap();
        assert_eq!(response.events_read, 7);
        assert_eq!(response.applied, 3);
        assert_eq!(response.unchanged, 2);
        assert_eq!(response.skipped, 1);
        assert_eq!(response.ignored, 1);

        let user = store.find_user_by_external_id("u1").await.unwrap().unwrap();
        assert_eq!(user.name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn replaying_twice_converges() {
        let store = store().await;
        let file = jsonl(EVENTS);

        replay_file(&store, file.path()).await.unwrap();
        let second = replay_file(&store, file.path()).await.unwrap();

        assert_eq!(store.list_users(10).await.unwrap().len(), 1);
        assert_eq!(store.list_organisations(10).await.unwrap().len(), 1);
        assert_eq!(second.events_read, 7);
    }

    #[tokio::test]
    async fn stops_at_unreadable_line() {
        let store = store().await;
        let file = jsonl(&[EVENTS[1], "not json", EVENTS[2]]);

        let err = replay_file(&store, file.path()).await.unwrap_err();
        assert!(format!("{err:#}").contains(":2:"), "got {err:#}");

        // The first line was applied, the third never reached.
        assert!(store.find_user_by_external_id("u1").await.unwrap().is_some());
        assert!(
            store
                .find_organisation_by_external_id("o1")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let store = store().await;
        assert!(
            replay_file(&store, Path::new("/definitely/not/here.jsonl"))
                .await
                .is_err()
        );
    }
}
