//! Port traits decoupling the domain from data sources, config and reports.

pub mod config_port;
pub mod data_port;
pub mod report_port;
