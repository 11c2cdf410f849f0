//! Runnable modules, each providing a unified configuration

pub mod options;

pub mod unsubscribe;
pub mod worker;
