pub mod fetch;
pub mod init;
pub mod report;
pub mod run;
pub mod validate;
