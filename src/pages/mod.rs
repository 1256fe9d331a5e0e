//! # Page objects
//!
//! One type per page of the practice site. Tests obtain them from a
//! [`PageManager`] and never embed raw selectors.

pub mod navigable;
pub mod home;
pub mod example;
pub mod manager;


pub use navigable::Navigable;
pub use home::HomePage;
pub use example::ExamplePage;
pub use manager::PageManager;
