pub mod payment_event;

pub use payment_event::{PaymentEvent, RecordPaymentRequest};
