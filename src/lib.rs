//! Monthly payroll processing engine
//!
//! This crate computes one payroll record per employee per month from base
//! salary and attendance, withholding progressive income tax and
//! social-security contributions, and manages the employment contracts that
//! decide who is paid.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod contracts;
pub mod error;
pub mod models;
pub mod payroll;
pub mod store;
