pub mod admin;
pub mod admin_auth;
pub mod comments;
pub mod migrations;
