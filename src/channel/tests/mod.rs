//! Test modules for the channel adapter

mod echo;
mod lifecycle;
