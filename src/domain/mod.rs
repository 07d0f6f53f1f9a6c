// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs, enums, and traits describing the core
// concepts of the sentiment service.
//
// Rules for this layer:
//   - NO Burn or tokenizers types allowed here
//   - NO HTTP types (actix / reqwest)
//   - NO file reads, NO network calls
//
// Everything the other layers exchange is defined here:
// the model kind tags, the normalised prediction result,
// the feedback event, the error taxonomy, and the traits
// the ML and infra layers implement.
//
// Reference: Rust Book §5 (Structs), §6 (Enums), §10 (Traits)

/// Error taxonomy shared by every layer
pub mod error;

/// The configured model kind tag and the family it selects
pub mod model_kind;

/// Normalised prediction result and the sentiment labels
pub mod prediction;

/// User correction events forwarded to analytics
pub mod feedback;

/// JSON request/response shapes of the HTTP API
pub mod wire;

/// Core abstractions (traits) that other layers implement
pub mod traits;
