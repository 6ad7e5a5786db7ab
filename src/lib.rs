pub mod app;
pub mod cmd;
pub mod config;
pub mod error;
pub mod i2gw;
pub mod input;
pub mod kube;
pub mod logging;
pub mod output;
pub mod providers;
