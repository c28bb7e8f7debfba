//! The .NET runtime (CLR) event catalogue
//!
//! The CLR reports through two manifest-based providers:
//! * `Microsoft-Windows-DotNETRuntime`, for events occurring while tracing (JIT, GC, loader...),
//! * `Microsoft-Windows-DotNETRuntimeRundown`, which enumerates the state that already existed when a
//!   session started or stopped (loaded modules, jitted methods...), so that addresses seen in stacks
//!   can be resolved.
//!
//! This module holds their schemas (see [`schemas`]), the constants that identify their events, the
//! flag and value maps of their fields, and typed views over decoded events (see [`views`]).
use crate::guid::Guid;
use crate::schema::Schema;

/// Builds the [`Schema`] of a CLR event
macro_rules! clr_schema {
    (
        $provider:expr, $provider_name:expr, $event_name:literal,
        id: $id:expr,
        version: $version:expr,
        task: ($task:expr, $task_name:literal),
        opcode: ($opcode:expr, $opcode_name:literal),
        level: $level:ident,
        keyword: $keyword:expr,
        fields: $fields:expr $(,)?
    ) => {
        $crate::schema::Schema {
            provider_id: $provider,
            provider_name: $provider_name,
            event_name: $event_name,
            task_name: $task_name,
            opcode_name: $opcode_name,
            descriptor: $crate::schema::EventDescriptor {
                id: $id,
                version: $version,
                channel: 0,
                level: $crate::schema::EventLevel::$level,
                opcode: $opcode,
                task: $task,
                keyword: $keyword,
            },
            fields: $fields,
        }
    };
}

pub mod flags;
pub mod keywords;
mod layouts;
pub mod rundown;
pub mod runtime;
pub mod views;

pub use flags::*;
pub use keywords::{RundownKeywords, RuntimeKeywords};

/// Microsoft-Windows-DotNETRuntime
pub const RUNTIME_PROVIDER: Guid = Guid::from_u128(0xe13c0d23_ccbc_4e12_931b_d9cc2eee27e4);
pub const RUNTIME_PROVIDER_NAME: &str = "Microsoft-Windows-DotNETRuntime";

/// Microsoft-Windows-DotNETRuntimeRundown
pub const RUNDOWN_PROVIDER: Guid = Guid::from_u128(0xa669021c_c450_4609_a035_5af59af4df18);
pub const RUNDOWN_PROVIDER_NAME: &str = "Microsoft-Windows-DotNETRuntimeRundown";

/// Opcodes shared by every manifest
pub mod win_opcode {
    pub const INFO: u8 = 0;
    pub const START: u8 = 1;
    pub const STOP: u8 = 2;
}

/// Every schema of both CLR providers
pub fn schemas() -> impl Iterator<Item = &'static Schema> {
    rundown::SCHEMAS.iter().chain(runtime::SCHEMAS.iter())
}

/// Whether `provider` is one of the CLR providers
pub fn is_clr_provider(provider: &Guid) -> bool {
    *provider == RUNTIME_PROVIDER || *provider == RUNDOWN_PROVIDER
}
