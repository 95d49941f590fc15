//! Self-built containers (array dictionary, chained hash dictionary, 4-ary heap) and the page
//! analyses built on them: link-graph ranking and TF-IDF relevance.

pub mod analyzers;
pub mod config;
pub mod corpus;
pub mod dict;
pub mod error;
pub mod heap;
pub mod page;
pub mod search;
pub mod set;
pub mod tokenizer;

pub use analyzers::{PageRankAnalyzer, TfIdfAnalyzer};
pub use config::RankConfig;
pub use dict::{ArrayDictionary, ChainedHashDictionary, Dictionary};
pub use error::{Error, Result};
pub use heap::{top_k_sort, ArrayHeap};
pub use page::{Page, PageId};
pub use search::{SearchEngine, SearchHit, SearchResults};
pub use set::ChainedHashSet;
