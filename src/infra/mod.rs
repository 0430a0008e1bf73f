//! Concrete providers behind the library's service traits.

pub mod google;
