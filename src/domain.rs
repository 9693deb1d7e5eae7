pub mod entities;
pub mod extraction;
pub mod use_cases;
