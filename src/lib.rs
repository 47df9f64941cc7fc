//! # g3dkit
//!
//! Tools for G3D morph-animated models.
//!
//! This is the umbrella crate that provides convenient access to all g3dkit
//! functionality. You can use this crate to get everything in one place, or
//! use individual crates for more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Meshes, frames, texture slots and the model container
//! - **I/O**: Version 3 and 4 G3D decoding and encoding
//! - **Analysis**: Rigid body detection across animation frames
//! - **Optimize**: Mesh joining and vertex deduplication
//! - **Report**: Compression estimates and batch processing of files
//!
//! ## Quick Start
//!
//! ```rust
//! use g3dkit::prelude::*;
//!
//! let frames = (0..3)
//!     .map(|f| {
//!         let x = f as f32;
//!         Frame::from_vertices(vec![
//!             Point3f::new(x, 0.0, 0.0),
//!             Point3f::new(x + 1.0, 0.0, 0.0),
//!             Point3f::new(x, 1.0, 0.0),
//!         ])
//!     })
//!     .collect();
//! let mesh = Mesh::from_frames(frames, vec![0, 1, 2]).with_name("slider");
//! let model = Model::from_meshes(Version::V4, vec![mesh]);
//!
//! let bytes = encode(&model).unwrap();
//! let decoded = decode(&bytes).unwrap();
//!
//! let rigidity = analyze_rigidity(&decoded.meshes[0], &RigidityOptions::default());
//! assert!(rigidity.is_fully_rigid());
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables io, analysis, optimize and report
//! - `io`: G3D codec and file access
//! - `analysis`: Rigidity and mutability analysis
//! - `optimize`: Join and deduplication passes
//! - `report`: Statistics and batch processing (pulls in the three above)
//! - `all`: Enables all features

// Re-export core functionality
pub use g3dkit_core::*;

// Re-export sub-crates
#[cfg(feature = "io")]
pub use g3dkit_io as io;

#[cfg(feature = "analysis")]
pub use g3dkit_analysis as analysis;

#[cfg(feature = "optimize")]
pub use g3dkit_optimize as optimize;

#[cfg(feature = "report")]
pub use g3dkit_report as report;

/// Convenient imports for common use cases
pub mod prelude {
    pub use g3dkit_core::*;

    #[cfg(feature = "io")]
    pub use g3dkit_io::{decode, encode, read_model, write_model, DecodeError, EncodeError, IoError, LoadedModel};

    #[cfg(feature = "analysis")]
    pub use g3dkit_analysis::*;

    #[cfg(feature = "optimize")]
    pub use g3dkit_optimize::{
        apply_dedup, deduplicate_vertices, join_compatible_meshes, join_model, DedupOptions, DedupReport,
        JoinOptions, JoinSummary, ModelOptimizer,
    };

    #[cfg(feature = "report")]
    pub use g3dkit_report::*;
}
