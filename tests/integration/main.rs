mod common;
mod crawl_tests;
mod resume_tests;
