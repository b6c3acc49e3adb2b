mod http;
mod provider;

pub use http::HttpArrivalMessageProvider;
pub use provider::{Arrival, ArrivalMessageProvider, MessageError, NoMessageProvider, message_or_fallback};
