use super::anchor::Anchor;
use super::types::{Reconciliation, RedirectTemplate, SmartLink};

/// Pair every smart link with every anchor.
///
/// The result is the flattened `smart_links × anchors` matrix, response order
/// outer and anchor order inner. An entry carries a redirect URL only when the
/// anchor's link equals the smart link's `url` exactly.
pub fn map_smart_links<A: Anchor>(
    smart_links: &[SmartLink],
    anchors: &[A],
    redirect: &RedirectTemplate,
) -> Vec<Reconciliation<A>> {
    let links: Vec<String> = anchors.iter().map(Anchor::link_value).collect();
    let mut results = Vec::with_capacity(smart_links.len() * anchors.len());

    for smart_link in smart_links {
        for (anchor, link) in anchors.iter().zip(&links) {
            let replacement_url =
                (*link == smart_link.url).then(|| redirect.render(&smart_link.auction_id));
            results.push(Reconciliation {
                anchor: anchor.clone(),
                replacement_url,
            });
        }
    }

    results
}

/// Write each non-null replacement into its anchor. Returns the number of
/// anchors rewritten.
pub fn apply_replacements<A: Anchor>(results: &[Reconciliation<A>]) -> usize {
    let mut applied = 0;
    for result in results {
        if let Some(url) = &result.replacement_url {
            result.anchor.set_link_value(url);
            applied += 1;
        }
    }
    tracing::debug!(applied, total = results.len(), "applied smart link replacements");
    applied
}
