//! Client for the zeroc.green station API (`{base}/stations`, `{base}/stations/{id}`).

mod client;

pub use client::ZerocClient;
