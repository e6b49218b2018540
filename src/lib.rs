#![doc = include_str!("../README.md")]

pub mod cdp;
pub mod event;
pub mod logger;
pub mod platform;
pub mod track_main;
pub mod tracker;
pub mod util;

#[cfg(test)]
pub mod test_support;
