//! Test modules for the priority queue engine
//!
//! Tests are organized by functional area.
