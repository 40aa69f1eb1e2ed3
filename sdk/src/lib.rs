//! myspltoken SDK: program ids, PDA derivation, instruction builders and
//! token-account decoding for the myspltoken Anchor program.

pub mod constants;
pub mod error;
pub mod pda;
pub mod state;
pub mod token;

pub use error::SdkError;
