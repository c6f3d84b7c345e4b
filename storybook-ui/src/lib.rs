pub mod api;
pub mod components;
pub mod effects;
pub mod interop;

pub use api::*;
pub use components::*;
pub use effects::*;
