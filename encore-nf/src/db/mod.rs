//! Database access for encore-nf

pub mod artists;
