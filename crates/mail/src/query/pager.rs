//! Lazy pagination over a message search

use std::collections::VecDeque;

use crate::error::{RetrievalError, Stage};
use crate::mailbox::MailAccess;
use crate::models::MessageId;

/// Largest page requested from the mailbox
pub const MAX_PAGE_SIZE: usize = 500;

/// Walks every page of a search, one request per page
///
/// Stops when a page is empty or carries no continuation token. A new pager
/// starts again from the first page. After an error the pager is exhausted.
pub struct MessagePager<'a> {
    handle: &'a dyn MailAccess,
    query: String,
    page_token: Option<String>,
    pages_fetched: usize,
    done: bool,
    buffer: VecDeque<MessageId>,
}

impl<'a> MessagePager<'a> {
    pub fn new(handle: &'a dyn MailAccess, query: impl Into<String>) -> Self {
        Self {
            handle,
            query: query.into(),
            page_token: None,
            pages_fetched: 0,
            done: false,
            buffer: VecDeque::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Number of pages requested so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Fetch the next page of message IDs
    ///
    /// Returns `Ok(None)` once the result set is exhausted.
    pub fn next_page(&mut self) -> Result<Option<Vec<MessageId>>, RetrievalError> {
        if self.done {
            return Ok(None);
        }

        let page_number = self.pages_fetched + 1;
        let page = match self.handle.list_messages(
            &self.query,
            MAX_PAGE_SIZE,
            self.page_token.as_deref(),
        ) {
            Ok(page) => page,
            Err(source) => {
                self.done = true;
                return Err(RetrievalError::from_transport(
                    Stage::Querying,
                    source,
                    |source| RetrievalError::Query {
                        page: page_number,
                        source,
                    },
                ));
            }
        };
        self.pages_fetched = page_number;

        if page.message_ids.is_empty() {
            self.done = true;
            return Ok(None);
        }

        match page.next_page_token {
            Some(token) if !token.is_empty() => self.page_token = Some(token),
            _ => self.done = true,
        }

        log::debug!(
            "Page {}: {} messages",
            page_number,
            page.message_ids.len()
        );
        Ok(Some(page.message_ids))
    }
}

impl Iterator for MessagePager<'_> {
    type Item = Result<MessageId, RetrievalError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.buffer.pop_front() {
                return Some(Ok(id));
            }
            match self.next_page() {
                Ok(Some(ids)) => self.buffer.extend(ids),
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
