#![deny(clippy::all, clippy::pedantic)]

pub mod io;
pub mod posts;
pub mod print;
