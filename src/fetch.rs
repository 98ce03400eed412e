use std::collections::{BTreeMap, VecDeque};

use serde_json::Value;

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(pub u64);

pub type FetchResult = Result<Value, FetchError>;

pub trait DataFetcher: std::fmt::Debug {
    /// Starts loading `url`. The result is reported through [`DataFetcher::poll`].
    fn fetch(&mut self, ticket: FetchTicket, url: &str);

    /// Completed requests since the last poll.
    fn poll(&mut self) -> Vec<(FetchTicket, FetchResult)>;
}

/// Route table answering every request on the next poll.
#[derive(Debug, Default, Clone)]
pub struct MemoryFetcher {
    routes: BTreeMap<String, Value>,
    pending: VecDeque<(FetchTicket, String)>,
    requests: Vec<String>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, url: impl Into<String>, payload: Value) -> Self {
        self.insert_route(url, payload);
        self
    }

    pub fn insert_route(&mut self, url: impl Into<String>, payload: Value) {
        self.routes.insert(url.into(), payload);
    }

    /// Every url requested so far, in order.
    pub fn requests(&self) -> &[String] {
        &self.requests
    }
}

impl DataFetcher for MemoryFetcher {
    fn fetch(&mut self, ticket: FetchTicket, url: &str) {
        self.requests.push(url.to_string());
        self.pending.push_back((ticket, url.to_string()));
    }

    fn poll(&mut self) -> Vec<(FetchTicket, FetchResult)> {
        self.pending
            .drain(..)
            .map(|(ticket, url)| {
                let result = self
                    .routes
                    .get(&url)
                    .cloned()
                    .ok_or(FetchError::NotFound(url));
                (ticket, result)
            })
            .collect()
    }
}
