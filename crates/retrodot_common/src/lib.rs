pub mod app;
pub mod issue;
pub mod key;

pub use issue::{Issue, IssueCode, IssueSink, LogIssueSink, Severity};
