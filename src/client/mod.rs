pub mod forms;
pub mod http;

pub use http::{Endpoint, ObjectHttpClient, RawResponse};
