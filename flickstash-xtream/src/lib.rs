pub mod client;
pub mod credentials;
pub mod error;
pub mod types;

pub use client::XtreamClient;
pub use credentials::{Credentials, config_path, save_to_file};
pub use error::FetchError;
pub use types::{XtreamCategory, XtreamMovie, XtreamSeries};
