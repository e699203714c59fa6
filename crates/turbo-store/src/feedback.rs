//! Outcomes surfaced to the person using the storefront.
//!
//! Engines report one [`Feedback`] per completed operation to a
//! [`FeedbackSink`]. Rendering it (toast, banner, terminal line) is the
//! sink's business.

use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use turbo_commerce::checkout::OrderStatus;
use turbo_commerce::ids::{LineId, ListingId, OrderId};

/// Severity of a feedback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackLevel {
    Success,
    Info,
    Error,
}

/// Structured detail so a UI can point at the cause.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FeedbackDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<ListingId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_id: Option<LineId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<OrderStatus>,
}

/// A single human-readable outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    pub level: FeedbackLevel,
    /// Operation name, e.g. `cart.add`.
    pub operation: &'static str,
    pub message: String,
    pub detail: FeedbackDetail,
}

impl Feedback {
    fn new(level: FeedbackLevel, operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            operation,
            message: message.into(),
            detail: FeedbackDetail::default(),
        }
    }

    pub fn success(operation: &'static str, message: impl Into<String>) -> Self {
        Self::new(FeedbackLevel::Success, operation, message)
    }

    pub fn info(operation: &'static str, message: impl Into<String>) -> Self {
        Self::new(FeedbackLevel::Info, operation, message)
    }

    pub fn error(operation: &'static str, message: impl Into<String>) -> Self {
        Self::new(FeedbackLevel::Error, operation, message)
    }

    pub fn with_detail(mut self, detail: FeedbackDetail) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_listing(mut self, listing_id: &ListingId) -> Self {
        self.detail.listing_id = Some(listing_id.clone());
        self
    }

    pub fn with_line(mut self, line_id: &LineId) -> Self {
        self.detail.line_id = Some(line_id.clone());
        self
    }

    pub fn with_order(mut self, order_id: &OrderId) -> Self {
        self.detail.order_id = Some(order_id.clone());
        self
    }
}

/// Receives feedback from the engines.
pub trait FeedbackSink: Send + Sync {
    fn notify(&self, feedback: Feedback);
}

/// Writes feedback to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFeedback;

impl FeedbackSink for TracingFeedback {
    fn notify(&self, feedback: Feedback) {
        let detail = serde_json::to_string(&feedback.detail).unwrap_or_default();
        match feedback.level {
            FeedbackLevel::Success | FeedbackLevel::Info => tracing::info!(
                operation = feedback.operation,
                detail = %detail,
                "{}",
                feedback.message
            ),
            FeedbackLevel::Error => tracing::warn!(
                operation = feedback.operation,
                detail = %detail,
                "{}",
                feedback.message
            ),
        }
    }
}

/// Keeps every feedback in memory, newest last.
#[derive(Debug, Default)]
pub struct CollectedFeedback {
    items: Mutex<Vec<Feedback>>,
}

impl CollectedFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far.
    pub fn items(&self) -> Vec<Feedback> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return everything received so far.
    pub fn drain(&self) -> Vec<Feedback> {
        std::mem::take(&mut *self.items.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl FeedbackSink for CollectedFeedback {
    fn notify(&self, feedback: Feedback) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(feedback);
    }
}
