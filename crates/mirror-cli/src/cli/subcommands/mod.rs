mod org;
mod user;

pub use org::OrgCommands;
pub use user::UserCommands;
