//! Erasure coding over GF(2^8).
//!
//! The pipeline is: build a generator ([`generator_matrix`]), expand its
//! parity rows into 32-byte nibble tables ([`expand`]), and run the data
//! plane ([`encode`]) over source buffers. To recover, describe the loss
//! with an [`ErasureSet`], derive a [`DecodePlan`] and feed its expanded
//! tables back through the same data plane.
//!
//! [`Code`] wraps all of this for a fixed geometry and caches decode
//! tables per erasure pattern.

pub mod audit;
pub mod code;
pub mod dataplane;
pub mod decode;
pub mod erasure;
pub mod expand;
pub mod generator;
pub mod kernel;

pub use audit::{audit, audit_limited, AuditReport};
pub use code::{Code, PreparedDecode};
pub use dataplane::{dot_product, encode};
pub use decode::{derive_decode, DecodePlan};
pub use erasure::ErasureSet;
pub use expand::{expand, expand_into, required_len, ExpandedTables};
pub use generator::{cauchy_matrix, generator_matrix, validate_geometry, vandermonde_matrix, Strategy};
pub use kernel::active_engine;

pub use gfec_core::{EcError, EcResult, Precondition};
