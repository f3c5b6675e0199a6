#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod cli;

mod config;
mod error;
mod logger;
mod pool;
mod scanner;
mod service;
mod store;
mod tracker;
mod uploader;
