pub mod grade;
pub mod import;
pub mod init;
pub mod list;
pub mod validate;
