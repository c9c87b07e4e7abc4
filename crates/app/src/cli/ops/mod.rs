pub mod exchange;
pub mod groups;
pub mod params;
pub mod version;

pub use exchange::Exchange;
pub use groups::Groups;
pub use params::Params;
pub use version::Version;
