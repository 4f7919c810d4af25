//! The `broker` module holds the records the broker hands to the store and
//! the topic matching used when scanning retained messages.

pub mod message;
pub mod topic;

pub use message::{ClientId, PendingPublish, QoS, RetainedMessage, SubscriptionEntry, in_flight_key};
pub use topic::{MatchingCondition, TopicFilter};
