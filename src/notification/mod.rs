//! Payroll approval notifications.
//!
//! The approver publishes an [`ApprovalEvent`] on an [`EventBus`]; a
//! [`NotificationDispatcher`] running on its own task turns each event into
//! one message per employee and one audit row per message.

mod dispatcher;
mod events;
mod message;

pub use dispatcher::{DispatchSummary, NotificationDispatcher};
pub use events::{ApprovalEvent, ChannelEventBus, EventBus, EventBusRef};
pub use message::{MessageSender, MessageSenderRef, PayslipMessage, SendError, TracingMessageSender};
