use crate::domain::model::{CanonicalList, ReconciliationResult};
use crate::utils::error::Result;
use serde_json::Value;

/// Splits the two sides into not-following-back, mutual and fans.
///
/// Pure and repeatable. Either side may be empty; each output list is sorted
/// ascending.
pub fn reconcile(following: &CanonicalList, followers: &CanonicalList) -> ReconciliationResult {
    let follower_set = followers.membership();
    let following_set = following.membership();

    let (mutual, not_following_back): (Vec<_>, Vec<_>) = following
        .iter()
        .cloned()
        .partition(|identifier| follower_set.contains(identifier));

    let fans: CanonicalList = followers
        .iter()
        .filter(|identifier| !following_set.contains(identifier))
        .cloned()
        .collect();

    let result = ReconciliationResult {
        not_following_back: CanonicalList::from(not_following_back).into_sorted(),
        mutual: CanonicalList::from(mutual).into_sorted(),
        fans: fans.into_sorted(),
    };

    tracing::info!(
        "reconciled {} following / {} followers: {} not following back, {} mutual, {} fans",
        following.len(),
        followers.len(),
        result.not_following_back.len(),
        result.mutual.len(),
        result.fans.len()
    );

    result
}

/// Same as [`reconcile`], for lists that arrive as raw JSON (e.g. a saved
/// session). Anything but two arrays of strings is `InvalidInput`.
pub fn reconcile_values(following: &Value, followers: &Value) -> Result<ReconciliationResult> {
    let following = CanonicalList::from_json(following)?;
    let followers = CanonicalList::from_json(followers)?;
    Ok(reconcile(&following, &followers))
}
