pub mod monitoring_api;
