pub mod anchor;
pub mod client;
pub mod document;
pub mod mapper;
pub mod payload;
pub mod reconcile;
pub mod types;

pub use anchor::{Anchor, AnchorElement, ElementAnchor};
pub use client::{HttpTransport, SmartLinkTransport, decode_body, parse_smart_links};
pub use document::PageDocument;
pub use mapper::{LinkMapper, MapperSettings, Mapping, PendingMapping, TwoPhaseResult};
pub use payload::{DO_NOT_LINK_SUFFIX, LOCK_LINK_SUFFIX, build_link_items, build_payload};
pub use reconcile::{apply_replacements, map_smart_links};
pub use types::{
    ArticleInfo, EndpointTemplate, LinkPayload, LinkRequestItem, PublisherId, Reconciliation,
    RedirectTemplate, SmartLink,
};
