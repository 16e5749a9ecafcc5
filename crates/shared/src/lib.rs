//! Wire contract shared between the prediction client and anything that
//! speaks to the prediction service.

pub mod domain;
pub mod error;
pub mod protocol;
