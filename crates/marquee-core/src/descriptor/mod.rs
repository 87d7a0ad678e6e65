//! Player self-description ("user-agent") parsing.
//!
//! Players announce themselves on every check-in with a descriptor string.
//! Input comes from arbitrary network peers, so parsing is total: anything
//! that does not match a known signature yields `None`, never an error.

mod parser;
mod types;

pub use parser::{MAX_DESCRIPTOR_LEN, parse, parse_lenient};
pub use types::{DeviceDescriptor, PlayerModel};
