//! In-memory rate sources for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::error::FetchError;
use super::source::RateSource;

/// Sample sheet quoting USD at 30.00 and EUR at 32.50.
pub const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Tarih_Date Tarih="19.10.2026" Date="10/19/2026" Bulten_No="2026/200">
    <Currency CrossOrder="0" Kod="USD" CurrencyCode="USD">
        <Unit>1</Unit>
        <CurrencyName>US DOLLAR</CurrencyName>
        <ForexBuying>29.95</ForexBuying>
        <ForexSelling>30.00</ForexSelling>
        <BanknoteBuying>29.90</BanknoteBuying>
        <BanknoteSelling>30.10</BanknoteSelling>
    </Currency>
    <Currency CrossOrder="1" Kod="EUR" CurrencyCode="EUR">
        <Unit>1</Unit>
        <CurrencyName>EURO</CurrencyName>
        <ForexBuying>32.40</ForexBuying>
        <ForexSelling>32.50</ForexSelling>
        <BanknoteBuying>32.30</BanknoteBuying>
        <BanknoteSelling>32.60</BanknoteSelling>
    </Currency>
    <Currency CrossOrder="9" Kod="XAU" CurrencyCode="XAU">
        <Unit>1</Unit>
        <CurrencyName>GOLD</CurrencyName>
        <ForexBuying>2500.00</ForexBuying>
        <ForexSelling>0</ForexSelling>
        <BanknoteBuying></BanknoteBuying>
        <BanknoteSelling></BanknoteSelling>
    </Currency>
</Tarih_Date>"#;

enum Reply {
    Document(String),
    Status(u16),
}

/// Rate source that answers from memory and counts requests.
pub struct StaticRateSource {
    reply: Mutex<Reply>,
    calls: AtomicUsize,
}

impl StaticRateSource {
    /// Serves `document` on every request.
    #[must_use]
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            reply: Mutex::new(Reply::Document(document.into())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Serves [`SAMPLE_FEED`].
    #[must_use]
    pub fn sample() -> Self {
        Self::new(SAMPLE_FEED)
    }

    /// Fails every request with the given HTTP status.
    #[must_use]
    pub fn failing(status: u16) -> Self {
        Self {
            reply: Mutex::new(Reply::Status(status)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Serves `document` from now on.
    pub fn set_document(&self, document: impl Into<String>) {
        *self.reply.lock().unwrap_or_else(PoisonError::into_inner) =
            Reply::Document(document.into());
    }

    /// Fails with `status` from now on.
    pub fn set_failing(&self, status: u16) {
        *self.reply.lock().unwrap_or_else(PoisonError::into_inner) = Reply::Status(status);
    }

    /// Number of documents requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateSource for StaticRateSource {
    fn describe(&self) -> &str {
        "memory"
    }

    async fn fetch_document(&self) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &*self.reply.lock().unwrap_or_else(PoisonError::into_inner) {
            Reply::Document(doc) => Ok(doc.clone()),
            Reply::Status(status) => Err(FetchError::Status(*status)),
        }
    }
}
