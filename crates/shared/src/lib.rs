//! Survey record types shared by the transport client and the form controller.

pub mod domain;
pub mod error;
pub mod protocol;
