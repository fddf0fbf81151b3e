pub mod handler;
pub mod messages;
pub mod state;
pub mod view;

pub use handler::*;
pub use messages::*;
pub use state::*;
pub use view::*;
