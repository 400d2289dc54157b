mod envelope;

pub use envelope::{
    EventBody, EventMessage, MarginUpdate, NormalizeError, OrderStatusUpdate, normalize,
    normalize_batch,
};
