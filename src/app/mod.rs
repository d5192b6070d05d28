//! Core application logic: the store, state management, event handling, and
//! action dispatch.

pub mod action;
pub mod clock;
pub mod commands;
pub mod event;
pub mod handler;
pub mod notifications;
pub mod state;
pub mod store;
pub mod validation;
