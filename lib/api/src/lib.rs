pub mod rest;
pub mod session;
pub mod view;

pub use rest::{AppState, RestApi};
pub use session::{BrowseMode, Selection, Session, SessionStore};
pub use view::{PickerEntry, ProductCard, RecommendationCard};
