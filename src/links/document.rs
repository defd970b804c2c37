use super::anchor::{AnchorElement, ElementAnchor};
use super::types::ArticleInfo;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// The parts of an HTML page the link mapper needs.
#[derive(Debug, Clone)]
pub struct PageDocument {
    pub title: Option<String>,
    pub canonical_url: String,
    pub anchors: Vec<ElementAnchor>,
}

impl PageDocument {
    /// Collect the title, canonical URL and every `<a>` carrying
    /// `link_attribute`, in document order. Link values are kept verbatim.
    pub fn parse(html: &str, page_url: &Url, link_attribute: &str) -> Self {
        let document = Html::parse_document(html);

        let title = Selector::parse("title")
            .ok()
            .and_then(|sel| document.select(&sel).next())
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty());

        let canonical_url = canonical_link(&document, page_url);

        let anchors: Vec<ElementAnchor> = Selector::parse("a")
            .map(|sel| {
                document
                    .select(&sel)
                    .filter(|el| el.value().attr(link_attribute).is_some())
                    .map(|el| ElementAnchor::new(anchor_element(el), link_attribute))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            title,
            canonical_url,
            anchors,
        }
    }

    pub fn article(&self) -> ArticleInfo {
        ArticleInfo::new(self.title.clone(), self.canonical_url.clone())
    }
}

fn canonical_link(document: &Html, page_url: &Url) -> String {
    Selector::parse("link[rel]")
        .ok()
        .and_then(|sel| {
            document
                .select(&sel)
                .filter(|el| {
                    el.value()
                        .attr("rel")
                        .is_some_and(|rel| {
                            rel.split_whitespace()
                                .any(|r| r.eq_ignore_ascii_case("canonical"))
                        })
                })
                .find_map(|el| {
                    el.value()
                        .attr("href")
                        .and_then(|href| page_url.join(href.trim()).ok())
                })
        })
        .map_or_else(|| page_url.to_string(), |url| url.to_string())
}

fn anchor_element(el: ElementRef<'_>) -> AnchorElement {
    let attributes = el
        .value()
        .attrs()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    let text = el.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    AnchorElement { attributes, text }
}
