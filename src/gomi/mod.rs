pub mod config;
pub mod id;
pub mod inventory;
pub mod paths;
pub mod preview;
pub mod record;
pub mod relocate;
pub mod restore;
pub mod select;
pub mod util;
pub mod warn;
