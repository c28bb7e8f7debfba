//! Abstraction layer for Native types
//!
//! This module interacts with the Windows native types and should abstract all `unsafe` accesses.
//! It is only available on Windows, where the capture layer hands over `EVENT_RECORD`s.
pub mod event_record;
