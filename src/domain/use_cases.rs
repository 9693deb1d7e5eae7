pub mod chat_skill;
pub mod skills;
