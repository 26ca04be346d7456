pub mod web_host;
