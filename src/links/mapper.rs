use super::anchor::Anchor;
use super::client::SmartLinkTransport;
use super::payload::build_payload;
use super::reconcile::map_smart_links;
use super::types::{ArticleInfo, Reconciliation, RedirectTemplate, SmartLink};
use crate::config::Config;
use crate::error::LinkMapError;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub type Mapping<A> = Vec<Reconciliation<A>>;

#[derive(Debug, Clone, Default)]
pub struct MapperSettings {
    pub exclusive_links: bool,
    pub redirect: RedirectTemplate,
}

impl MapperSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            exclusive_links: config.exclusive_links,
            redirect: config.api.redirect_template.clone(),
        }
    }
}

struct MapperState<A> {
    last_response: Option<Arc<Vec<SmartLink>>>,
    last_anchor_set: Option<Vec<A>>,
    /// Sequence number of the most recently issued request.
    issued: u64,
}

impl<A> Default for MapperState<A> {
    fn default() -> Self {
        Self {
            last_response: None,
            last_anchor_set: None,
            issued: 0,
        }
    }
}

fn lock<A>(state: &Mutex<MapperState<A>>) -> MutexGuard<'_, MapperState<A>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keeps a page's anchors in sync with the smart link API.
///
/// The last response and the anchor set it was requested for are cached so a
/// changed page can be mapped synchronously against stale data while a fresh
/// request is in flight.
pub struct LinkMapper<A: Anchor> {
    settings: MapperSettings,
    article: ArticleInfo,
    transport: Arc<dyn SmartLinkTransport>,
    state: Arc<Mutex<MapperState<A>>>,
}

impl<A: Anchor> LinkMapper<A> {
    pub fn new(
        settings: MapperSettings,
        article: ArticleInfo,
        transport: Arc<dyn SmartLinkTransport>,
    ) -> Self {
        Self {
            settings,
            article,
            transport,
            state: Arc::new(Mutex::new(MapperState::default())),
        }
    }

    pub fn article(&self) -> &ArticleInfo {
        &self.article
    }

    /// Article info for requests issued after this call.
    pub fn set_article(&mut self, article: ArticleInfo) {
        self.article = article;
    }

    pub fn has_cached_response(&self) -> bool {
        lock(&self.state).last_response.is_some()
    }

    /// Map `current_anchors` against the API.
    ///
    /// With a cached response and a changed anchor set, the stale response is
    /// mapped immediately. Without a cached response, or with a changed
    /// anchor set, a new request is spawned and its mapping becomes the
    /// pending half. Otherwise the anchor set is recorded and nothing is
    /// pending.
    ///
    /// A request needs a tokio runtime. Without one the pending half resolves
    /// to [`LinkMapError::NoRuntime`] and no sequence number is consumed.
    pub fn reconcile(&self, current_anchors: Vec<A>) -> TwoPhaseResult<A> {
        let mut state = lock(&self.state);

        let changed = state
            .last_anchor_set
            .as_ref()
            .is_some_and(|last| *last != current_anchors);

        let immediate = match &state.last_response {
            Some(response) if changed => Some(map_smart_links(
                response,
                &current_anchors,
                &self.settings.redirect,
            )),
            _ => None,
        };

        if state.last_response.is_some() && !changed {
            state.last_anchor_set = Some(current_anchors);
            return TwoPhaseResult {
                immediate,
                pending: None,
            };
        }

        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("no tokio runtime, smart link request not issued");
            return TwoPhaseResult {
                immediate,
                pending: Some(PendingMapping::failed(LinkMapError::NoRuntime)),
            };
        };

        state.issued += 1;
        let seq = state.issued;
        drop(state);

        let pending = self.spawn_request(&runtime, seq, current_anchors);
        TwoPhaseResult {
            immediate,
            pending: Some(pending),
        }
    }

    fn spawn_request(&self, runtime: &Handle, seq: u64, anchors: Vec<A>) -> PendingMapping<A> {
        let payload = build_payload(&self.article, &anchors, self.settings.exclusive_links);
        let transport = Arc::clone(&self.transport);
        let state = Arc::clone(&self.state);
        let redirect = self.settings.redirect.clone();

        tracing::debug!(seq, links = payload.links.len(), "issuing smart link request");

        let handle = runtime.spawn(async move {
            let smart_links = match transport.fetch_smart_links(&payload).await {
                Ok(links) => Arc::new(links),
                Err(e) => {
                    tracing::warn!(seq, error = %e, "smart link request failed");
                    return Err(e);
                }
            };

            {
                let mut state = lock(&state);
                if state.issued != seq {
                    tracing::debug!(
                        seq,
                        latest = state.issued,
                        "discarding superseded smart link response"
                    );
                    return Err(LinkMapError::Superseded {
                        seq,
                        latest: state.issued,
                    });
                }
                state.last_response = Some(Arc::clone(&smart_links));
                state.last_anchor_set = Some(anchors.clone());
            }

            tracing::debug!(seq, smart_links = smart_links.len(), "cached smart link response");
            Ok(map_smart_links(&smart_links, &anchors, &redirect))
        });

        PendingMapping {
            seq,
            inner: PendingInner::Running(handle),
        }
    }
}

/// Mapping available now, plus a handle to the mapping a new request will
/// produce.
#[derive(Debug)]
pub struct TwoPhaseResult<A> {
    pub immediate: Option<Mapping<A>>,
    pub pending: Option<PendingMapping<A>>,
}

impl<A: Send + 'static> TwoPhaseResult<A> {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The freshest mapping: the pending one when a request was issued,
    /// otherwise the immediate one.
    pub async fn settle(self) -> Result<Option<Mapping<A>>, LinkMapError> {
        match self.pending {
            Some(pending) => pending.await.map(Some),
            None => Ok(self.immediate),
        }
    }
}

/// Resolves to the mapping of an in-flight request.
///
/// The request runs on its own task; dropping this handle does not cancel it.
#[derive(Debug)]
pub struct PendingMapping<A> {
    seq: u64,
    inner: PendingInner<A>,
}

#[derive(Debug)]
enum PendingInner<A> {
    Running(JoinHandle<Result<Mapping<A>, LinkMapError>>),
    /// Never started; holds the error until first poll.
    Failed(Option<LinkMapError>),
}

impl<A> PendingMapping<A> {
    fn failed(error: LinkMapError) -> Self {
        Self {
            seq: 0,
            inner: PendingInner::Failed(Some(error)),
        }
    }

    /// Sequence number of the request, `0` if none was issued.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl<A: Send + 'static> Future for PendingMapping<A> {
    type Output = Result<Mapping<A>, LinkMapError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.inner {
            PendingInner::Running(handle) => match Pin::new(handle).poll(cx) {
                Poll::Ready(Ok(result)) => Poll::Ready(result),
                Poll::Ready(Err(e)) => Poll::Ready(Err(LinkMapError::Aborted(e.to_string()))),
                Poll::Pending => Poll::Pending,
            },
            PendingInner::Failed(error) => Poll::Ready(Err(error.take().unwrap_or_else(|| {
                LinkMapError::Aborted("pending mapping polled after completion".into())
            }))),
        }
    }
}
