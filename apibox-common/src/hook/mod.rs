pub mod traits;

pub use traits::{JsonBody, RawResponse, ResponseHook, TextBody};
