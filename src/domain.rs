mod email_address;
mod html_body;
mod send_report;
mod send_request;

pub use email_address::EmailAddress;
pub use html_body::HtmlBody;
pub use send_report::{SendReport, SendResult};
pub use send_request::SendRequest;
