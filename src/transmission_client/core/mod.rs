mod http;

pub use http::{RpcTransport, SESSION_HEADER};
