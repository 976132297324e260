//! Container format support

pub mod amta;
