#![cfg(test)]

mod coordinator;
mod support;
