//! Test modules for the print queue
//!
//! Tests are organised by functional area.
