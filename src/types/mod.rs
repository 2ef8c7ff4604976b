pub mod error;
pub mod metadata;

pub use error::{
    ClassificationConflict, ClassificationFailure, OverviewError, Result, ResultExt,
    ValidationError, ValidationErrorKind,
};
pub use metadata::{
    AnnotationArguments, AnnotationRecord, EndpointRecord, FileMetadata, HttpMethod, MemberKind,
    MemberRecord, SourceFile, TypeKind, TypeRecord, UNKNOWN_TYPE, extension_of, unquote,
};
