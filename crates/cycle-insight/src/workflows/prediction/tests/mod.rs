mod common;
mod presenter;
