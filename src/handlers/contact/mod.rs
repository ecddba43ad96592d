pub mod collection;
pub mod record;

// Re-export handler functions for use in routing
pub use collection::get as contact_list;
pub use collection::post as contact_post;

pub use record::delete as contact_delete;
pub use record::get as contact_get;
pub use record::put as contact_put;
