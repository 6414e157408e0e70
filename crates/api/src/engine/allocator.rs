//! Region allocator orchestration.
//!
//! Gathers the allocation inputs from the store and delegates the decision
//! to `roilabel_core::allocation`. Every call re-reads current state: there
//! is no caching between requests, which is what makes concurrent labelers
//! safe without locking. Two labelers may legitimately be handed the same
//! near-complete region; the completion threshold tolerates that, and a
//! region going one or two labels over the threshold is not an error.

use rand::Rng;
use roilabel_core::allocation;
use roilabel_core::types::DbId;
use roilabel_db::models::region::JobRegion;
use roilabel_db::repositories::{LabelRepo, RegionRepo};
use roilabel_db::DbPool;

/// Allocation policy, derived from server configuration.
#[derive(Debug, Clone, Copy)]
pub struct AllocationPolicy {
    /// Distinct labelers required before a region is complete; `None`
    /// disables the completion cap.
    pub labelers_required_per_region: Option<i64>,
    /// Bias assignment toward regions nearest completion.
    pub prioritize_by_label_count: bool,
}

/// Select the next region for a labeler within a job.
///
/// Returns `None` once every region is either already labeled by this
/// labeler or complete -- the terminal state for this (labeler, job) pair,
/// stable on repeated calls until new data arrives.
pub async fn next_region<R: Rng + ?Sized>(
    pool: &DbPool,
    job_id: DbId,
    user_id: &str,
    policy: AllocationPolicy,
    rng: &mut R,
) -> Result<Option<JobRegion>, sqlx::Error> {
    let threshold = allocation::normalize_threshold(policy.labelers_required_per_region);

    // Exclusion set: the labeler's own submissions plus completed regions.
    let labeled = LabelRepo::user_labeled_regions(pool, job_id, user_id).await?;
    let counts = LabelRepo::label_counts(pool, job_id, None, None).await?;
    let completed = allocation::completed_regions(&counts, threshold);

    let mut excluded: Vec<DbId> = labeled.iter().map(|l| l.region_id).collect();
    excluded.extend(completed.iter().copied());
    excluded.sort_unstable();
    excluded.dedup();

    let candidates = RegionRepo::list_ids_excluding(pool, job_id, &excluded).await?;

    let chosen = allocation::select_region(
        &candidates,
        &counts,
        threshold,
        policy.prioritize_by_label_count,
        rng,
    );

    match chosen {
        Some(region_id) => RegionRepo::find_by_id(pool, region_id).await,
        None => Ok(None),
    }
}
