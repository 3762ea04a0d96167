#![doc = "The `todolist` library crate."]
#![doc = ""]
#![doc = "A server-rendered task tracker: users register and log in with a cookie"]
#![doc = "session, then create, list, edit and delete their own tasks. Every task is"]
#![doc = "linked to exactly one owner through an `ownership` association table, and"]
#![doc = "request-pipeline guards enforce that link before handlers run. The main"]
#![doc = "binary (`main.rs`) wires these modules into an actix-web application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod templates;
