pub mod contact;
pub mod search;
