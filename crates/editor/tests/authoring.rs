#![allow(unused_crate_dependencies)]

#[path = "authoring/common/mod.rs"]
mod common;

#[path = "authoring/drag.rs"]
mod drag;

#[path = "authoring/history.rs"]
mod history;

#[path = "authoring/variants.rs"]
mod variants;

#[path = "authoring/votes.rs"]
mod votes;
