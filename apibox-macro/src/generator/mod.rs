pub mod accessor;
pub mod client;
pub mod declaration;

pub use accessor::generate_accessors;
pub use client::generate_api_client_impl;
pub use declaration::generate_declaration;
