use serde::{Deserialize, Serialize};

use crate::utils::StoreError;

/// Client identifier as chosen by the connecting client.
pub type ClientId = String;

/// Delivery guarantee attached to a publish or a subscription.
///
/// The numeric values match the two QoS bits of the MQTT fixed header, so
/// a level can be converted to and from the wire byte losslessly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QoS {
    AtMostOnce,
    AtLeastOnce,
    ExactlyOnce,
}

impl TryFrom<u8> for QoS {
    type Error = StoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(QoS::AtMostOnce),
            1 => Ok(QoS::AtLeastOnce),
            2 => Ok(QoS::ExactlyOnce),
            other => Err(StoreError::InvalidQos(other)),
        }
    }
}

impl From<QoS> for u8 {
    fn from(qos: QoS) -> u8 {
        match qos {
            QoS::AtMostOnce => 0,
            QoS::AtLeastOnce => 1,
            QoS::ExactlyOnce => 2,
        }
    }
}

/// The last message retained on a topic.
///
/// The topic itself is the index key and is not repeated in the record.
///
/// # Fields
///
/// - `payload` - Raw message body. Never empty once stored: an empty
///   payload deletes the entry instead.
/// - `qos` - The QoS the message was published with.
/// - `timestamp` - UTC milliseconds at which the message was retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetainedMessage {
    pub payload: Vec<u8>,
    pub qos: QoS,
    pub timestamp: i64,
}

impl RetainedMessage {
    pub fn new(payload: Vec<u8>, qos: QoS) -> Self {
        Self {
            payload,
            qos,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// An outbound publish destined for one client.
///
/// Queued while a persistent-session client is offline, and stored in the
/// in-flight table once it has been sent with QoS 1 or 2. `message_id` is
/// only assigned when the publish is actually transmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPublish {
    pub client_id: ClientId,
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: QoS,
    pub message_id: Option<u16>,
}

impl PendingPublish {
    pub fn new(
        client_id: impl Into<ClientId>,
        topic: impl Into<String>,
        payload: impl Into<Vec<u8>>,
        qos: QoS,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            topic: topic.into(),
            payload: payload.into(),
            qos,
            message_id: None,
        }
    }

    pub fn with_message_id(mut self, message_id: u16) -> Self {
        self.message_id = Some(message_id);
        self
    }
}

/// One topic filter a client subscribed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionEntry {
    pub client_id: ClientId,
    pub topic_filter: String,
    pub qos: QoS,
}

impl SubscriptionEntry {
    pub fn new(client_id: impl Into<ClientId>, topic_filter: impl Into<String>, qos: QoS) -> Self {
        Self {
            client_id: client_id.into(),
            topic_filter: topic_filter.into(),
            qos,
        }
    }
}

/// Builds the conventional in-flight key for a delivery attempt.
pub fn in_flight_key(client_id: &str, message_id: u16) -> String {
    format!("{client_id}-{message_id}")
}
