pub mod apply;
pub mod dispatch;
pub mod org;
pub mod replay;
pub mod schema;
pub mod user;
