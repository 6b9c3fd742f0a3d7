#![allow(clippy::too_many_arguments)]

pub mod crypto;
pub mod ledger;
pub mod serializer;
