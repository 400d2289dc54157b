mod queue_source;

pub use queue_source::QueueMessageSource;
