pub mod loading;
pub mod models;

pub use loading::{load_matches, parse_date_string, parse_matches};
pub use models::*;
