pub mod hello;
pub mod member;
pub mod team;
