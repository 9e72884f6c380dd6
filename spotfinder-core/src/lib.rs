pub mod gateways;
pub mod repositories;
pub mod usecases;
pub mod util;

pub mod entities {
    pub use spotfinder_entities::{
        favorite::*, geo::*, id::*, rating::*, report::*, subscription::*, time::*, user::*,
    };
}
