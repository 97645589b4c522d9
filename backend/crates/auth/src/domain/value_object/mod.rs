//! Value Object Module

pub mod wallet_address;

pub use wallet_address::{WalletAddress, WalletAddressError};
