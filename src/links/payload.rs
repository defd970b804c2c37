use super::anchor::Anchor;
use super::types::{ArticleInfo, LinkPayload, LinkRequestItem};

/// Links ending in this suffix are never sent to the API.
pub const DO_NOT_LINK_SUFFIX: &str = "#donotlink";
/// Links ending in this suffix ask for an exclusive match.
pub const LOCK_LINK_SUFFIX: &str = "#locklink";

/// Classify anchors into request items, in anchor order.
pub fn build_link_items<A: Anchor>(anchors: &[A], exclusive_links: bool) -> Vec<LinkRequestItem> {
    let mut skipped = 0usize;
    let items: Vec<LinkRequestItem> = anchors
        .iter()
        .filter_map(|anchor| {
            let raw_url = anchor.link_value();
            if raw_url.ends_with(DO_NOT_LINK_SUFFIX) {
                skipped += 1;
                return None;
            }
            let exclusive_match_requested = exclusive_links || raw_url.ends_with(LOCK_LINK_SUFFIX);
            Some(LinkRequestItem {
                raw_url,
                exclusive_match_requested,
            })
        })
        .collect();

    tracing::debug!(
        links = items.len(),
        skipped,
        exclusive = items
            .iter()
            .filter(|item| item.exclusive_match_requested)
            .count(),
        "built smart link request items"
    );
    items
}

pub fn build_payload<A: Anchor>(
    article: &ArticleInfo,
    anchors: &[A],
    exclusive_links: bool,
) -> LinkPayload {
    LinkPayload {
        article: article.clone(),
        links: build_link_items(anchors, exclusive_links),
    }
}
