pub mod assign;
pub mod fetch;
pub mod form_builder;
pub mod notice;
pub mod output;
pub mod parser;
pub mod publish;
pub mod report;
pub mod roster;
pub mod scoring;
pub mod services;
pub mod unpack;
