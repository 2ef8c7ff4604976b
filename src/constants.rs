//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Heuristic scanner windows and word lists
pub mod scanner {
    /// Non-blank lines examined above a type declaration for its route annotation
    pub const ROUTE_LOOKBACK_LINES: usize = 10;

    /// Lines examined above a member for its annotation block
    pub const ANNOTATION_LOOKBACK_LINES: usize = 32;

    /// Continuation lines joined while a member signature has open parentheses
    pub const MAX_SIGNATURE_LINES: usize = 64;

    /// Suffix stripped from container names to derive a default route prefix
    pub const CONTROLLER_SUFFIX: &str = "Controller";

    /// Underscore-prefixed members that stay visible (engine lifecycle hooks)
    pub const LIFECYCLE_HOOKS: &[&str] = &[
        "_Ready",
        "_Process",
        "_PhysicsProcess",
        "_Input",
        "_UnhandledInput",
        "_UnhandledKeyInput",
        "_EnterTree",
        "_ExitTree",
        "_Draw",
        "_Notification",
        "_ready",
        "_process",
        "_physics_process",
        "_input",
        "_unhandled_input",
        "_unhandled_key_input",
        "_enter_tree",
        "_exit_tree",
        "_draw",
        "_notification",
        "_init",
    ];

    /// Access modifiers that open a member line in attributed syntax
    pub const ATTRIBUTED_ACCESS_MODIFIERS: &[&str] = &["public", "private", "protected", "internal"];

    /// Leading keywords that open a member line in decorated syntax
    pub const DECORATED_MEMBER_MODIFIERS: &[&str] = &[
        "public",
        "private",
        "protected",
        "readonly",
        "static",
        "async",
        "abstract",
        "override",
        "declare",
        "accessor",
        "get",
        "set",
    ];

    /// Words that can precede a member name but are never its type
    pub const MODIFIER_KEYWORDS: &[&str] = &[
        "public",
        "private",
        "protected",
        "internal",
        "static",
        "abstract",
        "virtual",
        "override",
        "sealed",
        "async",
        "readonly",
        "extern",
        "unsafe",
        "new",
        "partial",
        "const",
        "volatile",
        "required",
        "declare",
        "accessor",
        "get",
        "set",
        "init",
    ];
}

/// Endpoint extraction word lists
pub mod endpoint {
    /// Parameter and return types that are never reported as DTOs
    pub const PRIMITIVE_TYPES: &[&str] = &[
        "int",
        "uint",
        "long",
        "ulong",
        "short",
        "ushort",
        "byte",
        "sbyte",
        "string",
        "bool",
        "char",
        "double",
        "float",
        "decimal",
        "object",
        "Guid",
        "DateTime",
        "DateTimeOffset",
        "DateOnly",
        "TimeOnly",
        "TimeSpan",
        "CancellationToken",
        "number",
        "boolean",
        "bigint",
        "any",
        "unknown",
        "never",
        "undefined",
        "null",
        "void",
        "Task",
        "Promise",
    ];

    /// Return types that say nothing about the response payload
    pub const ACTION_RESULT_MARKERS: &[&str] = &["IActionResult", "ActionResult", "IResult"];

    /// Attributed parameter-binding annotations
    pub const ATTRIBUTED_BINDINGS: &[&str] =
        &["FromBody", "FromForm", "FromQuery", "FromRoute", "FromHeader"];

    /// Decorated parameter-binding annotations
    pub const DECORATED_BINDINGS: &[&str] = &["Body", "Query", "Param", "Headers"];
}

/// Workspace discovery constants
pub mod discovery {
    /// Files larger than this are skipped (1 MiB)
    pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

    /// Directory names never descended into
    pub const SKIPPED_DIRECTORIES: &[&str] = &["bin", "obj", "node_modules", ".git", ".godot"];
}

/// Output constants
pub mod output {
    /// Default output directory, relative to the scanned root
    pub const DEFAULT_OUTPUT_DIR: &str = "PROJECT_OVERVIEW";

    /// Structure document file name
    pub const PROJECT_STRUCTURE_FILE: &str = "ProjectStructure.md";

    /// Endpoint document file name
    pub const API_ENDPOINTS_FILE: &str = "ApiEndpoints.md";
}

/// Configuration file discovery
pub mod config {
    /// Candidate configuration files, searched in order in the scanned root
    pub const CONFIG_FILE_CANDIDATES: &[&str] = &[
        "ai-scan-config.json",
        "ai-scan-config.example.json",
        "ai-scan-config.toml",
    ];

    /// Prefix for environment overrides
    pub const ENV_PREFIX: &str = "OVERVIEWGEN_";
}
