#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod cli;
pub mod config;
pub mod runner;
