pub mod clock;
pub mod config;
pub mod errors;
pub mod fetcher;
pub mod io;
pub mod logging;
pub mod lookup;
pub mod models;
pub mod pipeline;
pub mod probe;
pub mod registry;
pub mod service;
pub mod uris;
