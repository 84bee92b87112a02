pub mod http;
pub mod presenter;

pub use presenter::{OutputFormat, Presenter, create_presenter};
