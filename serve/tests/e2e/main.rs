//! End-to-end tests against a server bound to 127.0.0.1:0.

mod build;
mod common;
mod health;
