pub mod account;
pub mod alumni;
