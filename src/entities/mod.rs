pub mod prelude;

pub mod accounts;
pub mod alumni;
