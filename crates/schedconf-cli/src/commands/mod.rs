pub mod check;
pub mod conflict;
pub mod course;
pub mod faculty;
pub mod init;
pub mod resource;
pub mod show;
