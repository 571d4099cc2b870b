pub mod handlers;

pub use handlers::redirect;
