pub mod api;
pub mod client;
pub mod page;

pub use client::NotionClient;
