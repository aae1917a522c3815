//! Approval events and the channel that carries them to the dispatcher.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{Payslip, Period};

/// Published once per approval batch, after every payslip in it is PAID.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalEvent {
    /// The approved period.
    pub period: Period,
    /// The payslips approved in this batch.
    pub payslips: Vec<Payslip>,
}

/// Hands approval events to whoever sends the notifications.
pub trait EventBus: Send + Sync {
    /// Enqueues an event without waiting for it to be handled.
    fn publish(&self, event: ApprovalEvent) -> PayrollResult<()>;
}

/// Shared handle to an [`EventBus`].
pub type EventBusRef = Arc<dyn EventBus>;

/// An [`EventBus`] backed by an unbounded tokio channel.
///
/// The receiving half is handed to
/// [`NotificationDispatcher::spawn`](super::NotificationDispatcher::spawn).
#[derive(Debug, Clone)]
pub struct ChannelEventBus {
    sender: mpsc::UnboundedSender<ApprovalEvent>,
}

impl ChannelEventBus {
    /// Creates the bus and the receiver its events arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ApprovalEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventBus for ChannelEventBus {
    fn publish(&self, event: ApprovalEvent) -> PayrollResult<()> {
        self.sender
            .send(event)
            .map_err(|_| PayrollError::EventBus {
                message: "notification worker is not running".to_string(),
            })
    }
}
