pub mod client;
pub mod init;
pub mod print_config;
pub mod run;
