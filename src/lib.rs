pub mod configuration;
pub mod dispatcher;
pub mod domain;
pub mod email_client;
pub mod email_request;
pub mod routes;
pub mod spreadsheet;
pub mod startup;
pub mod telemetry;
