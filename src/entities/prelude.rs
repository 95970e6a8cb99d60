pub use super::accounts::Entity as Accounts;
pub use super::alumni::Entity as Alumni;
