//! Typed views over decoded CLR events
//!
//! There is one view per payload layout, shared by every version of the events that use it. Fields that an
//! older version does not carry return [`ParserError::NotFound`].
//!
//! ```
//! # use clretw::{DecodedEvent, EventRecord, SchemaLocator};
//! # use clretw::clr::views::MethodVerbose;
//! fn on_event(record: &EventRecord) {
//!     let Ok(event) = DecodedEvent::decode(SchemaLocator::global(), record) else {
//!         return;
//!     };
//!     if let Some(method) = MethodVerbose::from_event(&event) {
//!         println!("{:?}::{:?}", method.method_namespace(), method.method_name());
//!     }
//! }
//! ```
use super::rundown;
use super::runtime;
use super::{
    AppDomainFlags, AssemblyFlags, ExceptionThrownFlags, GcAllocationKind, GcReason, GcType,
    MethodExtent, MethodFlags, ModuleFlags, RuntimeSku, StartupFlags, StartupMode, ThreadFlags,
    RUNDOWN_PROVIDER, RUNTIME_PROVIDER,
};
use crate::event::DecodedEvent;
use crate::guid::Guid;
use crate::parser::{ArrayView, ParserError, ParserResult, Pointer, ValueMap};

macro_rules! event_view {
    (
        $(#[$meta:meta])*
        $name:ident: [$($provider:path => $id:path),+ $(,)?] {
            $(
                $(#[$field_meta:meta])*
                $getter:ident($field:literal) -> $T:ty;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        pub struct $name<'a, 'record> {
            event: &'a DecodedEvent<'a, 'record>,
        }

        impl<'a, 'record> $name<'a, 'record> {
            /// The (provider, event id) pairs this view applies to
            pub const EVENTS: &'static [(Guid, u16)] = &[$(($provider, $id)),+];

            /// Returns `None` if `event` does not have this layout
            pub fn from_event(event: &'a DecodedEvent<'a, 'record>) -> Option<Self> {
                let schema = event.schema();
                if Self::EVENTS.contains(&(schema.provider_id(), schema.event_id())) {
                    Some(Self { event })
                } else {
                    None
                }
            }

            pub fn event(&self) -> &'a DecodedEvent<'a, 'record> {
                self.event
            }

            pub fn version(&self) -> u8 {
                self.event.schema().event_version()
            }

            $(
                $(#[$field_meta])*
                pub fn $getter(&self) -> ParserResult<$T> {
                    self.event.try_parse($field)
                }
            )*
        }

        impl std::fmt::Debug for $name<'_, '_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("event", self.event)
                    $(.field(stringify!($getter), &self.$getter()))*
                    .finish()
            }
        }
    };
}

event_view! {
    /// A managed call stack, emitted right after the event it belongs to
    StackWalk: [RUNDOWN_PROVIDER => rundown::CLR_STACK_WALK_ID, RUNTIME_PROVIDER => runtime::CLR_STACK_WALK_ID] {
        clr_instance_id("ClrInstanceID") -> u16;
        frame_count("FrameCount") -> u32;
        /// Return addresses, innermost first
        stack("Stack") -> ArrayView<'record, Pointer>;
    }
}

event_view! {
    /// `MethodLoad`, `MethodUnload`, `MethodDCStart` and `MethodDCEnd`
    Method: [
        RUNDOWN_PROVIDER => rundown::METHOD_DC_START_ID,
        RUNDOWN_PROVIDER => rundown::METHOD_DC_END_ID,
        RUNTIME_PROVIDER => runtime::METHOD_LOAD_ID,
        RUNTIME_PROVIDER => runtime::METHOD_UNLOAD_ID,
    ] {
        method_id("MethodID") -> u64;
        module_id("ModuleID") -> u64;
        method_start_address("MethodStartAddress") -> u64;
        method_size("MethodSize") -> u32;
        method_token("MethodToken") -> u32;
        method_flags("MethodFlags") -> MethodFlags;
        /// Since version 1
        clr_instance_id("ClrInstanceID") -> u16;
        /// Since version 2
        rejit_id("ReJITID") -> u64;
    }
}

event_view! {
    /// The verbose flavor of [`Method`], which adds the method names
    MethodVerbose: [
        RUNDOWN_PROVIDER => rundown::METHOD_DC_START_VERBOSE_ID,
        RUNDOWN_PROVIDER => rundown::METHOD_DC_END_VERBOSE_ID,
        RUNTIME_PROVIDER => runtime::METHOD_LOAD_VERBOSE_ID,
        RUNTIME_PROVIDER => runtime::METHOD_UNLOAD_VERBOSE_ID,
    ] {
        method_id("MethodID") -> u64;
        module_id("ModuleID") -> u64;
        method_start_address("MethodStartAddress") -> u64;
        method_size("MethodSize") -> u32;
        method_token("MethodToken") -> u32;
        method_flags("MethodFlags") -> MethodFlags;
        method_namespace("MethodNamespace") -> String;
        method_name("MethodName") -> String;
        method_signature("MethodSignature") -> String;
        /// Since version 1
        clr_instance_id("ClrInstanceID") -> u16;
        /// Since version 2
        rejit_id("ReJITID") -> u64;
    }
}

event_view! {
    /// `DCStartInit`, `DCStartComplete`, `DCEndInit` and `DCEndComplete`
    EnumerationMarker: [
        RUNDOWN_PROVIDER => rundown::DC_START_INIT_ID,
        RUNDOWN_PROVIDER => rundown::DC_START_COMPLETE_ID,
        RUNDOWN_PROVIDER => rundown::DC_END_INIT_ID,
        RUNDOWN_PROVIDER => rundown::DC_END_COMPLETE_ID,
    ] {
        /// Since version 1
        clr_instance_id("ClrInstanceID") -> u16;
    }
}

event_view! {
    /// Maps IL offsets of a method to offsets in its native code
    MethodILToNativeMap: [
        RUNDOWN_PROVIDER => rundown::METHOD_DC_START_IL_TO_NATIVE_MAP_ID,
        RUNDOWN_PROVIDER => rundown::METHOD_DC_END_IL_TO_NATIVE_MAP_ID,
        RUNTIME_PROVIDER => runtime::METHOD_IL_TO_NATIVE_MAP_ID,
    ] {
        method_id("MethodID") -> u64;
        rejit_id("ReJITID") -> u64;
        method_extent("MethodExtent") -> ValueMap<MethodExtent>;
        count_of_map_entries("CountOfMapEntries") -> u16;
        il_offsets("ILOffsets") -> ArrayView<'record, u32>;
        native_offsets("NativeOffsets") -> ArrayView<'record, u32>;
        clr_instance_id("ClrInstanceID") -> u16;
    }
}

impl<'record> MethodILToNativeMap<'_, 'record> {
    /// (IL offset, native offset) pairs
    pub fn entries(&self) -> ParserResult<impl Iterator<Item = (u32, u32)> + 'record> {
        let il_offsets = self.il_offsets()?;
        let native_offsets = self.native_offsets()?;
        Ok(il_offsets.into_iter().zip(native_offsets))
    }
}

event_view! {
    /// `ModuleLoad`, `ModuleUnload`, `ModuleDCStart`, `ModuleDCEnd` and their `DomainModule` counterparts
    Module: [
        RUNDOWN_PROVIDER => rundown::MODULE_DC_START_ID,
        RUNDOWN_PROVIDER => rundown::MODULE_DC_END_ID,
        RUNDOWN_PROVIDER => rundown::DOMAIN_MODULE_DC_START_ID,
        RUNDOWN_PROVIDER => rundown::DOMAIN_MODULE_DC_END_ID,
        RUNTIME_PROVIDER => runtime::MODULE_LOAD_ID,
        RUNTIME_PROVIDER => runtime::MODULE_UNLOAD_ID,
    ] {
        module_id("ModuleID") -> u64;
        assembly_id("AssemblyID") -> u64;
        /// `DomainModule` events only
        app_domain_id("AppDomainID") -> u64;
        module_flags("ModuleFlags") -> ModuleFlags;
        module_il_path("ModuleILPath") -> String;
        module_native_path("ModuleNativePath") -> String;
        clr_instance_id("ClrInstanceID") -> u16;
        managed_pdb_signature("ManagedPdbSignature") -> Guid;
        managed_pdb_age("ManagedPdbAge") -> u32;
        managed_pdb_build_path("ManagedPdbBuildPath") -> String;
        native_pdb_signature("NativePdbSignature") -> Guid;
        native_pdb_age("NativePdbAge") -> u32;
        native_pdb_build_path("NativePdbBuildPath") -> String;
    }
}

event_view! {
    Assembly: [
        RUNDOWN_PROVIDER => rundown::ASSEMBLY_DC_START_ID,
        RUNDOWN_PROVIDER => rundown::ASSEMBLY_DC_END_ID,
    ] {
        assembly_id("AssemblyID") -> u64;
        app_domain_id("AppDomainID") -> u64;
        /// Since version 1
        binding_id("BindingID") -> u64;
        assembly_flags("AssemblyFlags") -> AssemblyFlags;
        fully_qualified_assembly_name("FullyQualifiedAssemblyName") -> String;
        clr_instance_id("ClrInstanceID") -> u16;
    }
}

event_view! {
    AppDomain: [
        RUNDOWN_PROVIDER => rundown::APP_DOMAIN_DC_START_ID,
        RUNDOWN_PROVIDER => rundown::APP_DOMAIN_DC_END_ID,
    ] {
        app_domain_id("AppDomainID") -> u64;
        app_domain_flags("AppDomainFlags") -> AppDomainFlags;
        app_domain_name("AppDomainName") -> String;
        app_domain_index("AppDomainIndex") -> u32;
        clr_instance_id("ClrInstanceID") -> u16;
    }
}

event_view! {
    Thread: [RUNDOWN_PROVIDER => rundown::THREAD_DC_END_ID] {
        managed_thread_id("ManagedThreadID") -> u64;
        app_domain_id("AppDomainID") -> u64;
        flags("Flags") -> ThreadFlags;
        managed_thread_index("ManagedThreadIndex") -> u32;
        os_thread_id("OSThreadID") -> u32;
        clr_instance_id("ClrInstanceID") -> u16;
    }
}

event_view! {
    /// Version and startup configuration of a runtime instance
    RuntimeInformation: [
        RUNDOWN_PROVIDER => rundown::RUNTIME_INFORMATION_DC_START_ID,
        RUNTIME_PROVIDER => runtime::RUNTIME_INFORMATION_START_ID,
    ] {
        clr_instance_id("ClrInstanceID") -> u16;
        sku("Sku") -> ValueMap<RuntimeSku>;
        bcl_major_version("BclMajorVersion") -> u16;
        bcl_minor_version("BclMinorVersion") -> u16;
        bcl_build_number("BclBuildNumber") -> u16;
        bcl_qfe_number("BclQfeNumber") -> u16;
        vm_major_version("VMMajorVersion") -> u16;
        vm_minor_version("VMMinorVersion") -> u16;
        vm_build_number("VMBuildNumber") -> u16;
        vm_qfe_number("VMQfeNumber") -> u16;
        startup_flags("StartupFlags") -> StartupFlags;
        startup_mode("StartupMode") -> StartupMode;
        command_line("CommandLine") -> String;
        com_object_guid("ComObjectGuid") -> Guid;
        runtime_dll_path("RuntimeDllPath") -> String;
    }
}

event_view! {
    GcStart: [RUNTIME_PROVIDER => runtime::GC_START_ID] {
        count("Count") -> u32;
        /// Since version 1
        depth("Depth") -> u32;
        reason("Reason") -> ValueMap<GcReason>;
        /// Since version 1
        gc_type("Type") -> ValueMap<GcType>;
        clr_instance_id("ClrInstanceID") -> u16;
        /// Since version 2
        client_sequence_number("ClientSequenceNumber") -> u64;
    }
}

event_view! {
    GcEnd: [RUNTIME_PROVIDER => runtime::GC_END_ID] {
        count("Count") -> u32;
        /// Since version 1
        clr_instance_id("ClrInstanceID") -> u16;
    }
}

impl GcEnd<'_, '_> {
    /// The collected generation
    pub fn depth(&self) -> ParserResult<u32> {
        // 16 bits wide in version 0
        match self.event.try_parse::<u32>("Depth") {
            Err(ParserError::LengthMismatch) => {
                self.event.try_parse::<u16>("Depth").map(u32::from)
            }
            depth => depth,
        }
    }
}

event_view! {
    /// Sampled roughly every 100KB of allocations
    GcAllocationTick: [RUNTIME_PROVIDER => runtime::GC_ALLOCATION_TICK_ID] {
        allocation_amount("AllocationAmount") -> u32;
        allocation_kind("AllocationKind") -> ValueMap<GcAllocationKind>;
        clr_instance_id("ClrInstanceID") -> u16;
        allocation_amount64("AllocationAmount64") -> u64;
        type_id("TypeID") -> Pointer;
        type_name("TypeName") -> String;
        heap_index("HeapIndex") -> u32;
        /// Since version 3
        address("Address") -> Pointer;
    }
}

event_view! {
    ExceptionThrown: [RUNTIME_PROVIDER => runtime::EXCEPTION_THROWN_ID] {
        exception_type("ExceptionType") -> String;
        exception_message("ExceptionMessage") -> String;
        exception_eip("ExceptionEIP") -> Pointer;
        exception_hresult("ExceptionHRESULT") -> u32;
        exception_flags("ExceptionFlags") -> ExceptionThrownFlags;
        clr_instance_id("ClrInstanceID") -> u16;
    }
}

event_view! {
    MethodJittingStarted: [RUNTIME_PROVIDER => runtime::METHOD_JITTING_STARTED_ID] {
        method_id("MethodID") -> u64;
        module_id("ModuleID") -> u64;
        method_token("MethodToken") -> u32;
        method_il_size("MethodILSize") -> u32;
        method_namespace("MethodNamespace") -> String;
        method_name("MethodName") -> String;
        method_signature("MethodSignature") -> String;
        /// Since version 1
        clr_instance_id("ClrInstanceID") -> u16;
    }
}
