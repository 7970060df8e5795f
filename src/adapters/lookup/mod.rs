//! Property lookup adapters.

mod http_lookup;
mod mock_lookup;

pub use http_lookup::{HttpLookupConfig, HttpPropertyLookup};
pub use mock_lookup::{MockLookupResponse, MockPropertyLookup};

pub(crate) use http_lookup::join_url;

#[cfg(test)]
pub(crate) use http_lookup::test_server;
