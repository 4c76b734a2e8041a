#![allow(missing_docs)]

pub(crate) mod http;
pub(crate) mod server;

pub(crate) use http::{assert_status, parse_json_body};
pub(crate) use server::{get_test_server, log_in_as};
