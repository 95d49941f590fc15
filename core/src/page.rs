use crate::dict::{ChainedHashDictionary, Dictionary};
use serde::{Deserialize, Serialize};

pub type PageId = String;

/// A parsed page: its identity, the links it makes, and the words it contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub uri: PageId,
    #[serde(default)]
    pub links: Vec<PageId>,
    #[serde(default)]
    pub words: Vec<String>,
}

impl Page {
    pub fn new<L, W>(uri: impl Into<PageId>, links: L, words: W) -> Self
    where
        L: IntoIterator,
        L::Item: Into<PageId>,
        W: IntoIterator,
        W::Item: Into<String>,
    {
        Self {
            uri: uri.into(),
            links: links.into_iter().map(Into::into).collect(),
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

/// Collapses records that share a uri. The last record for a uri wins; pages keep the order
/// in which their uri first appeared.
pub fn unique_pages(pages: &[Page]) -> Vec<&Page> {
    let mut slots: ChainedHashDictionary<&str, usize> = ChainedHashDictionary::new();
    let mut unique: Vec<&Page> = Vec::with_capacity(pages.len());
    for page in pages {
        match slots.get(page.uri.as_str()) {
            Ok(&slot) => unique[slot] = page,
            Err(_) => {
                slots.put(page.uri.as_str(), unique.len());
                unique.push(page);
            }
        }
    }
    unique
}
