mod client;

pub use client::HttpLangfuseClient;
