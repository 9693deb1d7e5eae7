pub mod home;
pub mod skills;
pub mod system;
