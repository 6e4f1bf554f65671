//! Integration tests for chatcorpus

mod helpers;

mod cli_test;
mod pipeline_test;
mod style_test;
