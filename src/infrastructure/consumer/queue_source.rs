use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::application::ports::{MessageSource, Topic, TransportError};

/// In-process message source backed by per-topic queues.
///
/// `fetch` drains whatever backlog has accumulated for the topic and
/// returns it as one finite batch, mirroring the pull-based consumer
/// contract. Producers (and tests) feed it with `push`.
pub struct QueueMessageSource {
    topics: Mutex<HashMap<Topic, VecDeque<String>>>,
}

impl QueueMessageSource {
    pub fn new() -> Self {
        Self {
            topics: Mutex::new(HashMap::new()),
        }
    }

    /// Append one raw JSON message to a topic's backlog
    pub fn push(&self, topic: Topic, raw: impl Into<String>) {
        self.topics
            .lock()
            .entry(topic)
            .or_default()
            .push_back(raw.into());
    }

    /// Messages currently waiting on a topic
    pub fn backlog(&self, topic: Topic) -> usize {
        self.topics
            .lock()
            .get(&topic)
            .map(|queue| queue.len())
            .unwrap_or(0)
    }
}

impl Default for QueueMessageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageSource for QueueMessageSource {
    async fn fetch(&self, topic: Topic) -> Result<Vec<String>, TransportError> {
        let mut topics = self.topics.lock();
        let batch = topics
            .get_mut(&topic)
            .map(|queue| queue.drain(..).collect())
            .unwrap_or_default();
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_drains_the_backlog() {
        let source = QueueMessageSource::new();
        source.push(Topic::Margin, "one");
        source.push(Topic::Margin, "two");
        source.push(Topic::Orders, "other-topic");

        let batch = source.fetch(Topic::Margin).await.unwrap();
        assert_eq!(batch, vec!["one".to_string(), "two".to_string()]);

        // a second pass sees an empty backlog
        assert!(source.fetch(Topic::Margin).await.unwrap().is_empty());
        // other topics are untouched
        assert_eq!(source.backlog(Topic::Orders), 1);
    }
}
