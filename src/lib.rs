pub mod config;
pub mod file_tree;
pub mod monitor;
pub mod reconcile;
pub mod remote;
pub mod transmission_client;
pub mod types;

pub use config::Config;
pub use monitor::Monitor;
pub use remote::RemoteService;
pub use types::ClientError;
